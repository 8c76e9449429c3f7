pub mod debug_log;

pub use debug_log::{
    DebugLogComponent, DebugLogHandle, DebugLogWriter, global_debug_log, install_panic_hook,
    set_global_debug_log,
};
