//! Runtime configuration assembled from the command line and the optional
//! content file.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::*;
use crate::content::CardContent;
use crate::error::CardError;
use crate::layout::Size;

/// Geometry and gesture policy of the windowing core.
///
/// All values share one unit; see [`Metrics::reference`] and
/// [`Metrics::cells`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metrics {
    pub cascade_step: i32,
    pub cascade_wrap: i32,
    pub cascade_origin: i32,
    pub panel_size: Size,
    pub edge_margin: i32,
    pub taskbar_height: i32,
    pub swipe_dismiss: i32,
    pub swipe_max_offset: i32,
    pub swipe_fade_distance: i32,
    pub breakpoint: i32,
}

impl Metrics {
    /// Pixel metrics of the browser layout.
    pub const fn reference() -> Self {
        Self {
            cascade_step: REFERENCE_CASCADE_STEP,
            cascade_wrap: REFERENCE_CASCADE_WRAP,
            cascade_origin: REFERENCE_CASCADE_ORIGIN,
            panel_size: Size::new(REFERENCE_PANEL_WIDTH, REFERENCE_PANEL_HEIGHT),
            edge_margin: REFERENCE_EDGE_MARGIN,
            taskbar_height: REFERENCE_TASKBAR_HEIGHT,
            swipe_dismiss: REFERENCE_SWIPE_DISMISS,
            swipe_max_offset: REFERENCE_SWIPE_MAX_OFFSET,
            swipe_fade_distance: REFERENCE_SWIPE_FADE_DISTANCE,
            breakpoint: REFERENCE_BREAKPOINT,
        }
    }

    /// The same policy expressed in terminal cells.
    pub const fn cells() -> Self {
        Self {
            cascade_step: CELL_CASCADE_STEP,
            cascade_wrap: CELL_CASCADE_WRAP,
            cascade_origin: CELL_CASCADE_ORIGIN,
            panel_size: Size::new(CELL_PANEL_WIDTH, CELL_PANEL_HEIGHT),
            edge_margin: CELL_EDGE_MARGIN,
            taskbar_height: CELL_TASKBAR_HEIGHT,
            swipe_dismiss: CELL_SWIPE_DISMISS,
            swipe_max_offset: CELL_SWIPE_MAX_OFFSET,
            swipe_fade_distance: CELL_SWIPE_FADE_DISTANCE,
            breakpoint: CELL_BREAKPOINT,
        }
    }

    pub fn with_breakpoint(mut self, breakpoint: i32) -> Self {
        self.breakpoint = breakpoint;
        self
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::reference()
    }
}

/// Top-level presentation selected by the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    /// Phone-like home screen with full-width, swipe-dismissible sheets.
    Compact,
    /// Desktop with icons, floating panels and a taskbar.
    Expanded,
}

impl PresentationMode {
    pub fn for_width(width: i32, breakpoint: i32) -> Self {
        if width <= breakpoint {
            Self::Compact
        } else {
            Self::Expanded
        }
    }

    pub fn boot_duration(self) -> Duration {
        match self {
            Self::Compact => COMPACT_BOOT_DURATION,
            Self::Expanded => BOOT_DURATION,
        }
    }
}

/// Session configuration shared by every reinitialization.
#[derive(Debug, Clone)]
pub struct Config {
    pub metrics: Metrics,
    pub pin: String,
    pub lock_on_start: bool,
    /// Forces a presentation mode instead of following the viewport width.
    pub forced_mode: Option<PresentationMode>,
    pub content: CardContent,
    pub photo_dir: Option<PathBuf>,
    pub tick: Duration,
    /// Show the boot splash at the start of every session.
    pub show_boot: bool,
}

impl Config {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            metrics,
            pin: DEFAULT_PIN.to_string(),
            lock_on_start: true,
            forced_mode: None,
            content: CardContent::default(),
            photo_dir: None,
            tick: DEFAULT_TICK,
            show_boot: true,
        }
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.pin.is_empty() || self.pin.chars().count() > PIN_MAX_LEN {
            return Err(CardError::InvalidConfig(format!(
                "pin must be 1..={PIN_MAX_LEN} characters"
            )));
        }
        if !self.pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(CardError::InvalidConfig(
                "pin must contain digits only".to_string(),
            ));
        }
        if self.metrics.cascade_wrap <= 0 {
            return Err(CardError::InvalidConfig(
                "cascade wrap must be positive".to_string(),
            ));
        }
        if self.tick.is_zero() {
            return Err(CardError::InvalidConfig(
                "tick must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn mode_for_width(&self, width: i32) -> PresentationMode {
        self.forced_mode
            .unwrap_or_else(|| PresentationMode::for_width(width, self.metrics.breakpoint))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Metrics::reference())
    }
}
