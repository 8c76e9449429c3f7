use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{Birthday, PanelContent};
use crate::clock::{self, Countdown};
use crate::components::{Component, ComponentContext, center_in};
use crate::constants::COUNTDOWN_REFRESH;
use crate::theme;
use crate::ui::UiFrame;

/// Days, hours and minutes until the next birthday, refreshed on a timer.
#[derive(Debug)]
pub struct CountdownContent {
    birthday: Birthday,
    remaining: Countdown,
    refreshed: u64,
}

impl CountdownContent {
    pub fn new(birthday: Birthday) -> Self {
        Self {
            birthday,
            remaining: Countdown::default(),
            refreshed: 0,
        }
    }

    pub fn remaining(&self) -> Countdown {
        self.remaining
    }

    pub fn refresh_count(&self) -> u64 {
        self.refreshed
    }

    fn recompute(&mut self, now: DateTime<Utc>) {
        self.remaining = clock::countdown_to(self.birthday.month, self.birthday.day, now);
        self.refreshed += 1;
    }
}

impl Component for CountdownContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.height == 0 {
            return;
        }
        let width = area.width as usize;
        let base = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        let big = base.fg(theme::accent()).add_modifier(Modifier::BOLD);
        let headline = format!(
            "{:>3} days  {:>2} hours  {:>2} mins",
            self.remaining.days, self.remaining.hours, self.remaining.minutes
        );
        let footer = format!("{} days to go", self.remaining.total_days);
        let cells = [
            ("Birthday in", base),
            ("", base),
            (headline.as_str(), big),
            ("", base),
            (footer.as_str(), base.add_modifier(Modifier::ITALIC)),
        ];
        for (row, (text, style)) in cells.iter().enumerate() {
            let y = area.y.saturating_add(row as u16 + 1);
            if y >= area.y.saturating_add(area.height) {
                break;
            }
            frame.set_string(area.x, y, &center_in(text, width), *style);
        }
    }
}

impl PanelContent for CountdownContent {
    fn refresh_interval(&self) -> Option<Duration> {
        Some(COUNTDOWN_REFRESH)
    }

    fn start(&mut self, now: DateTime<Utc>) {
        self.recompute(now);
    }

    fn refresh(&mut self, now: DateTime<Utc>) {
        self.recompute(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn start_and_refresh_recompute() {
        let mut content = CountdownContent::new(Birthday { month: 10, day: 16 });
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 18, 30, 0).unwrap();
        content.start(now);
        // 18:30 UTC is midnight in the display zone
        assert_eq!(content.remaining().days, 1);
        assert_eq!(content.remaining().hours, 0);
        content.refresh(now + chrono::Duration::hours(1));
        assert_eq!(content.remaining().hours, 23);
        assert_eq!(content.remaining().days, 0);
        assert_eq!(content.refresh_count(), 2);
    }

    #[test]
    fn asks_for_a_refresh_timer() {
        let content = CountdownContent::new(Birthday::default());
        assert_eq!(content.refresh_interval(), Some(COUNTDOWN_REFRESH));
    }
}
