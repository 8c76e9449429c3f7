use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::center_in;
use crate::clock;
use crate::content::Birthday;
use crate::layout::rect_contains;
use crate::state::FocusTarget;
use crate::theme;
use crate::ui::UiFrame;

const POPUP_WIDTH: u16 = 30;
const POPUP_HEIGHT: u16 = 7;

/// Time, date and days-to-birthday card that opens from the taskbar clock.
#[derive(Debug)]
pub struct ClockPopup {
    birthday: Birthday,
    time_label: String,
    date_label: String,
    days_label: String,
    greeting: String,
    bounds: Option<Rect>,
    close_rect: Option<Rect>,
}

impl ClockPopup {
    pub fn new(birthday: Birthday) -> Self {
        Self {
            birthday,
            time_label: String::new(),
            date_label: String::new(),
            days_label: String::new(),
            greeting: String::new(),
            bounds: None,
            close_rect: None,
        }
    }

    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.time_label = clock::format_time_with_zone(now);
        self.date_label = clock::format_date(now);
        let countdown = clock::countdown_to(self.birthday.month, self.birthday.day, now);
        self.days_label = match countdown.total_days {
            0 => "Birthday is today!".to_string(),
            1 => "1 day until your birthday".to_string(),
            n => format!("{n} days until your birthday"),
        };
        self.greeting = clock::greeting(now, "beautiful");
    }

    pub fn days_label(&self) -> &str {
        &self.days_label
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn clear_hits(&mut self) {
        self.bounds = None;
        self.close_rect = None;
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.bounds.is_some_and(|r| rect_contains(r, column, row))
    }

    pub fn hit_close(&self, column: u16, row: u16) -> bool {
        self.close_rect
            .is_some_and(|r| rect_contains(r, column, row))
    }

    /// Draw right-aligned above `anchor` (the taskbar clock).
    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        anchor: Rect,
        bounds: Rect,
        focus: FocusTarget,
    ) {
        self.clear_hits();
        let width = POPUP_WIDTH.min(bounds.width);
        let height = POPUP_HEIGHT.min(anchor.y.saturating_sub(bounds.y));
        if width < 4 || height < 2 {
            return;
        }
        let right = anchor.x.saturating_add(anchor.width);
        let rect = Rect {
            x: right.saturating_sub(width).max(bounds.x),
            y: anchor.y.saturating_sub(height),
            width,
            height,
        };
        let base = Style::default().bg(theme::dialog_bg()).fg(theme::dialog_fg());
        let rows: [(&str, Style); 6] = [
            ("", base),
            (self.time_label.as_str(), base.add_modifier(Modifier::BOLD)),
            (self.date_label.as_str(), base),
            (self.days_label.as_str(), base.fg(theme::accent())),
            (self.greeting.as_str(), base.add_modifier(Modifier::ITALIC)),
            ("", base),
        ];
        for offset in 0..rect.height {
            let (text, style) = rows.get(offset as usize).copied().unwrap_or(("", base));
            frame.set_string(
                rect.x,
                rect.y + offset,
                &center_in(text, rect.width as usize),
                style,
            );
        }
        let close_x = rect.x.saturating_add(rect.width).saturating_sub(3);
        let close_style = if focus == FocusTarget::ClockPopupClose {
            Style::default()
                .bg(theme::menu_selected_bg())
                .fg(theme::menu_selected_fg())
        } else {
            base.fg(theme::accent())
        };
        frame.set_string(close_x, rect.y, " × ", close_style);
        self.close_rect = Some(Rect::new(close_x, rect.y, 3, 1));
        self.bounds = Some(rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::buffer::Buffer;

    #[test]
    fn refresh_counts_days_and_greets() {
        let mut popup = ClockPopup::new(Birthday { month: 10, day: 16 });
        // 2024-10-14 00:00 IST
        popup.refresh(Utc.with_ymd_and_hms(2024, 10, 13, 18, 30, 0).unwrap());
        assert_eq!(popup.days_label(), "2 days until your birthday");
        assert_eq!(popup.greeting(), "Good morning, beautiful");
    }

    #[test]
    fn close_control_sits_on_the_top_row() {
        let mut popup = ClockPopup::new(Birthday::default());
        popup.refresh(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let area = Rect::new(0, 0, 60, 20);
        let anchor = Rect::new(46, 19, 14, 1);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            popup.render(&mut frame, anchor, area, FocusTarget::ClockPopupClose);
        }
        assert!(popup.hit_close(59, 12));
        assert!(popup.contains(40, 15));
        assert!(!popup.contains(10, 15));
    }
}
