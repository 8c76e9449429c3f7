//! Shared crate-wide constants.
//!
//! Every tunable of the card lives here as a named constant. Geometry values
//! come in two flavours: the `REFERENCE_*` set is expressed in pixels and
//! mirrors the browser card the layout rules were designed around, while the
//! `CELL_*` set expresses the same policy in terminal cells.

use std::time::Duration;

/// Cascade distance added per already-open panel, in pixels.
pub const REFERENCE_CASCADE_STEP: i32 = 30;
/// The cascade offset wraps back to the origin after this distance.
pub const REFERENCE_CASCADE_WRAP: i32 = 200;
/// Base origin (both axes) of the first panel.
pub const REFERENCE_CASCADE_ORIGIN: i32 = 50;
/// Assumed panel footprint used by placement.
pub const REFERENCE_PANEL_WIDTH: i32 = 450;
pub const REFERENCE_PANEL_HEIGHT: i32 = 350;
/// Gap kept between a freshly placed panel and the right/bottom edges.
pub const REFERENCE_EDGE_MARGIN: i32 = 20;
/// Height of the taskbar strip that panels must never cover.
pub const REFERENCE_TASKBAR_HEIGHT: i32 = 50;
/// Downward swipe distance beyond which a sheet is dismissed.
pub const REFERENCE_SWIPE_DISMISS: i32 = 120;
/// Largest visual offset applied while a swipe is tracked.
pub const REFERENCE_SWIPE_MAX_OFFSET: i32 = 120;
/// Swipe distance over which opacity fades from 1.0 towards zero.
pub const REFERENCE_SWIPE_FADE_DISTANCE: i32 = 300;
/// Width at or below which the compact presentation is used.
pub const REFERENCE_BREAKPOINT: i32 = 768;

pub const CELL_CASCADE_STEP: i32 = 2;
pub const CELL_CASCADE_WRAP: i32 = 14;
pub const CELL_CASCADE_ORIGIN: i32 = 3;
pub const CELL_PANEL_WIDTH: i32 = 46;
pub const CELL_PANEL_HEIGHT: i32 = 14;
pub const CELL_EDGE_MARGIN: i32 = 1;
pub const CELL_TASKBAR_HEIGHT: i32 = 1;
pub const CELL_SWIPE_DISMISS: i32 = 6;
pub const CELL_SWIPE_MAX_OFFSET: i32 = 6;
pub const CELL_SWIPE_FADE_DISTANCE: i32 = 15;
pub const CELL_BREAKPOINT: i32 = 80;

/// Opacity never drops below this while a swipe is tracked.
pub const SWIPE_MIN_OPACITY: f32 = 0.4;

pub const CLOCK_REFRESH: Duration = Duration::from_millis(1000);
pub const COUNTDOWN_REFRESH: Duration = Duration::from_millis(30_000);
pub const GREETING_REFRESH: Duration = Duration::from_millis(60_000);
pub const DAILY_QUOTE_ROTATION: Duration = Duration::from_millis(6000);
pub const INSPIRATION_ROTATION: Duration = Duration::from_millis(10_000);

pub const BOOT_DURATION: Duration = Duration::from_millis(4000);
pub const COMPACT_BOOT_DURATION: Duration = Duration::from_millis(3000);
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);
pub const TOAST_DURATION: Duration = Duration::from_millis(2000);

/// Heart burst shown after "Send love".
pub const HEARTS_COUNT: usize = 14;
pub const HEARTS_FALL: Duration = Duration::from_millis(2200);
pub const HEARTS_LIFETIME: Duration = Duration::from_millis(2400);
pub const HEARTS_FRAME: Duration = Duration::from_millis(80);

/// Default poll interval of the event loop.
pub const DEFAULT_TICK: Duration = Duration::from_millis(16);

pub const DEFAULT_PIN: &str = "1610";
pub const PIN_MAX_LEN: usize = 6;
pub const INCORRECT_PIN_MESSAGE: &str = "Incorrect PIN";

/// Birthday month (1-based) and day used by the countdown widgets.
pub const BIRTHDAY_MONTH: u32 = 10;
pub const BIRTHDAY_DAY: u32 = 16;

/// Display zone offset (UTC+05:30). The zone observes no daylight saving, so
/// a fixed offset is exact.
pub const DISPLAY_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
pub const DISPLAY_ZONE_LABEL: &str = "IST";

pub const DEFAULT_RECIPIENT: &str = "Sakshi";
