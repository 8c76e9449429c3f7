//! A desktop-metaphor birthday card for the terminal.
//!
//! The windowing core lives in [`window`]: panel lifecycle, cascade
//! placement, title-bar dragging, swipe-to-dismiss and the
//! [`WindowManager`](window::WindowManager) that ties them to overlays, the
//! lock screen and the timer table. Everything below it is plain state that
//! can be driven without a terminal.

pub mod actions;
pub mod clock;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod content;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod keybindings;
pub mod layout;
pub mod runner;
pub mod state;
pub mod term_color;
pub mod theme;
pub mod timers;
pub mod tracing_sub;
pub mod ui;
pub mod window;
