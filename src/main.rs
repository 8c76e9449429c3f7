use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;

use term_card::clock::SystemClock;
use term_card::components::{DebugLogHandle, install_panic_hook, set_global_debug_log};
use term_card::config::{Config, Metrics, PresentationMode};
use term_card::content::CardContent;
use term_card::drivers::OutputDriver;
use term_card::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_card::error::CardError;
use term_card::layout::Size;
use term_card::runner::run_card;
use term_card::tracing_sub;
use term_card::window::WindowManager;

#[derive(Debug, Parser)]
#[command(name = "term-card", version, about = "A birthday card desktop for the terminal")]
struct Cli {
    /// PIN that unlocks the lock screen
    #[arg(long)]
    pin: Option<String>,
    /// Width in columns at or below which the compact view is used
    #[arg(long, value_name = "COLUMNS")]
    breakpoint: Option<u16>,
    /// TOML file with the card's text content
    #[arg(long, value_name = "TOML")]
    content: Option<PathBuf>,
    /// Directory holding the photo memories
    #[arg(long, value_name = "DIR")]
    photos: Option<PathBuf>,
    /// Append logs to this file instead of the in-memory debug log
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Start unlocked
    #[arg(long)]
    no_lock: bool,
    /// Skip the boot splash
    #[arg(long)]
    no_boot: bool,
    /// Always use the compact view
    #[arg(long, conflicts_with = "expanded")]
    compact: bool,
    /// Always use the expanded desktop view
    #[arg(long)]
    expanded: bool,
    /// Event loop poll interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 16)]
    tick_ms: u64,
}

impl Cli {
    fn into_config(self) -> Result<Config, CardError> {
        let mut metrics = Metrics::cells();
        if let Some(breakpoint) = self.breakpoint {
            metrics = metrics.with_breakpoint(i32::from(breakpoint));
        }
        let mut config = Config::new(metrics);
        if let Some(pin) = self.pin {
            config.pin = pin;
        }
        if let Some(path) = &self.content {
            config.content = CardContent::load(path)?;
        }
        config.photo_dir = self.photos;
        config.lock_on_start = !self.no_lock;
        config.show_boot = !self.no_boot;
        config.forced_mode = if self.compact {
            Some(PresentationMode::Compact)
        } else if self.expanded {
            Some(PresentationMode::Expanded)
        } else {
            None
        };
        config.tick = Duration::from_millis(self.tick_ms);
        config.validate()?;
        Ok(config)
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    set_global_debug_log(DebugLogHandle::default());
    tracing_sub::init(cli.log_file.as_deref())?;
    install_panic_hook();

    let config = cli.into_config()?;
    let tick = config.tick;
    let (width, height) = crossterm::terminal::size()?;
    let mut wm = WindowManager::new(
        config,
        Size::new(i32::from(width), i32::from(height)),
        Arc::new(SystemClock),
        Instant::now(),
    );

    let mut output = ConsoleOutputDriver::new()?;
    let mut input = ConsoleInputDriver::new();
    output.enter()?;
    let result = run_card(&mut output, &mut input, &mut wm, tick);
    output.exit()?;
    tracing::debug!(reinits = wm.reinit_count(), "session ended");
    result
}
