use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Gauge;

use super::{Component, ComponentContext, center_in};
use crate::theme;
use crate::ui::{UiFrame, centered};

/// Splash shown for a fixed time after start or reinitialization.
#[derive(Debug)]
pub struct BootScreen {
    recipient: String,
    started: DateTime<Utc>,
    duration: Duration,
    visible: bool,
}

impl BootScreen {
    pub fn new(recipient: impl Into<String>, started: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            recipient: recipient.into(),
            started,
            duration,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn finish(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    /// Fraction of the boot duration elapsed at `now`, in `0.0..=1.0`.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        let total = self.duration.as_millis() as f64;
        if total <= 0.0 {
            return 1.0;
        }
        let elapsed = (now - self.started).num_milliseconds().max(0) as f64;
        (elapsed / total).clamp(0.0, 1.0)
    }
}

impl Component for BootScreen {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let style = Style::default().bg(theme::desktop_bg()).fg(theme::desktop_fg());
        for y in area.y..area.y.saturating_add(area.height) {
            frame.set_string(area.x, y, &" ".repeat(area.width as usize), style);
        }
        let card = centered(area, 36, 5);
        let width = card.width as usize;
        frame.set_string(
            card.x,
            card.y,
            &center_in("♥", width),
            style.fg(theme::accent()).add_modifier(Modifier::BOLD),
        );
        frame.set_string(
            card.x,
            card.y + 1,
            &center_in(&format!("Preparing something for {}", self.recipient), width),
            style.add_modifier(Modifier::BOLD),
        );
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(theme::accent()).bg(theme::panel_bg()))
            .ratio(self.progress(ctx.now()))
            .label("");
        frame.render_widget(
            gauge,
            Rect {
                x: card.x.saturating_add(2),
                y: card.y.saturating_add(3),
                width: card.width.saturating_sub(4),
                height: 1,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn progress_tracks_elapsed_time() {
        let start = Utc::now();
        let boot = BootScreen::new("Sam", start, Duration::from_millis(4000));
        assert_eq!(boot.progress(start), 0.0);
        assert_eq!(boot.progress(start + TimeDelta::milliseconds(1000)), 0.25);
        assert_eq!(boot.progress(start + TimeDelta::milliseconds(9000)), 1.0);
    }

    #[test]
    fn finish_reports_the_first_call_only() {
        let mut boot = BootScreen::new("Sam", Utc::now(), Duration::from_millis(10));
        assert!(boot.finish());
        assert!(!boot.finish());
        assert!(!boot.is_visible());
    }
}
