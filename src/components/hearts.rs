use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::constants::{HEARTS_COUNT, HEARTS_FALL};
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Heart {
    /// Starting column as a fraction of the area width.
    x: f32,
    /// Total fall as a fraction of the area height.
    fall: f32,
    /// Sideways drift as a fraction of the area width.
    drift: f32,
}

/// Hearts that rain down the screen after "Send love".
///
/// Positions are a function of the time since `start`, so frames can be
/// drawn at any rate. Removal is driven by the shell's scheduler.
#[derive(Debug)]
pub struct HeartBurst {
    hearts: Vec<Heart>,
    started: Option<Instant>,
    rng: StdRng,
}

impl Default for HeartBurst {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl HeartBurst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            hearts: Vec::new(),
            started: None,
            rng,
        }
    }

    /// Start a fresh burst, replacing one still in flight.
    pub fn start(&mut self, now: Instant) {
        let rng = &mut self.rng;
        self.hearts = (0..HEARTS_COUNT)
            .map(|_| Heart {
                x: rng.gen_range(0.0..1.0),
                fall: rng.gen_range(1.1..1.7),
                drift: rng.gen_range(-0.15..0.15),
            })
            .collect();
        self.started = Some(now);
    }

    pub fn clear(&mut self) -> bool {
        self.hearts.clear();
        self.started.take().is_some()
    }

    pub fn is_active(&self) -> bool {
        self.started.is_some()
    }

    /// Cells occupied by the hearts still inside `area` at `now`.
    pub fn positions(&self, area: Rect, now: Instant) -> Vec<(u16, u16)> {
        let Some(started) = self.started else {
            return Vec::new();
        };
        if area.width == 0 || area.height == 0 {
            return Vec::new();
        }
        let progress = progress(now.saturating_duration_since(started), HEARTS_FALL);
        let width = f32::from(area.width);
        let height = f32::from(area.height);
        self.hearts
            .iter()
            .filter_map(|h| {
                // Hearts enter just above the top edge.
                let y = (h.fall * progress - 0.05) * height;
                let x = (h.x + h.drift * progress) * width;
                if y < 0.0 || y >= height || x < 0.0 || x >= width {
                    return None;
                }
                Some((area.x + x as u16, area.y + y as u16))
            })
            .collect()
    }

    pub fn render(&self, frame: &mut UiFrame<'_>, area: Rect, now: Instant) {
        let style = Style::default()
            .fg(theme::accent())
            .add_modifier(Modifier::BOLD);
        for (x, y) in self.positions(area, now) {
            frame.set_string(x, y, "♥", style);
        }
    }
}

/// Ease-in progress in `0.0..=1.0`.
fn progress(elapsed: Duration, total: Duration) -> f32 {
    let t = (elapsed.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0);
    t * t
}
