use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{center_in, pad_to};
use crate::clock::{self, Countdown};
use crate::content::{Birthday, CardContent};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    ToggleCollapse,
    SendLove,
    OpenVault,
}

const WIDGET_WIDTH: u16 = 32;
const SEND_LOVE_LABEL: &str = "[ Send love ]";
const OPEN_VAULT_LABEL: &str = "[ Open vault ]";

/// Desktop card with a greeting, the birthday countdown and a rotating quote.
#[derive(Debug)]
pub struct DailyWidget {
    recipient: String,
    birthday: Birthday,
    quotes: Vec<String>,
    quote_index: usize,
    greeting: String,
    countdown: Countdown,
    collapsed: bool,
    bounds: Option<Rect>,
    hits: Vec<(WidgetAction, Rect)>,
}

impl DailyWidget {
    pub fn new(card: &CardContent) -> Self {
        Self {
            recipient: card.recipient.clone(),
            birthday: card.birthday.clone(),
            quotes: card.daily_quotes.clone(),
            quote_index: 0,
            greeting: String::new(),
            countdown: Countdown::default(),
            collapsed: false,
            bounds: None,
            hits: Vec::new(),
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) {
        self.refresh_greeting(now);
        self.refresh_countdown(now);
    }

    pub fn refresh_greeting(&mut self, now: DateTime<Utc>) {
        self.greeting = clock::greeting(now, &self.recipient);
    }

    pub fn refresh_countdown(&mut self, now: DateTime<Utc>) {
        self.countdown = clock::countdown_to(self.birthday.month, self.birthday.day, now);
    }

    pub fn rotate_quote(&mut self) {
        if !self.quotes.is_empty() {
            self.quote_index = (self.quote_index + 1) % self.quotes.len();
        }
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    pub fn current_quote(&self) -> Option<&str> {
        self.quotes.get(self.quote_index).map(String::as_str)
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.collapsed
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<WidgetAction> {
        self.hits
            .iter()
            .find(|(_, r)| rect_contains(*r, column, row))
            .map(|(action, _)| *action)
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.bounds.is_some_and(|r| rect_contains(r, column, row))
    }

    /// Draw in the top-right corner of `area`.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect) {
        self.hits.clear();
        self.bounds = None;
        let width = WIDGET_WIDTH.min(area.width);
        if width < 8 || area.height == 0 {
            return;
        }
        let x = area.x.saturating_add(area.width).saturating_sub(width + 1);
        let inner = width as usize;
        let base = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        let header = Style::default()
            .bg(theme::accent())
            .fg(theme::title_fg())
            .add_modifier(Modifier::BOLD);
        let marker = if self.collapsed { "▸" } else { "▾" };
        frame.set_string(x, area.y, &pad_to(&format!(" {marker} Today"), inner), header);
        if self.collapsed {
            self.hits
                .push((WidgetAction::ToggleCollapse, Rect::new(x, area.y, width, 1)));
            self.bounds = Some(Rect::new(x, area.y, width, 1));
            return;
        }
        let quote = self
            .current_quote()
            .map(|q| format!("\"{q}\""))
            .unwrap_or_default();
        let lines = [
            (self.greeting.clone(), base.add_modifier(Modifier::BOLD)),
            (
                format!("♥ {} to go", self.countdown.label()),
                base.fg(theme::accent()),
            ),
            (quote, base.add_modifier(Modifier::ITALIC)),
        ];
        let bottom = area.y.saturating_add(area.height);
        let mut y = area.y.saturating_add(1);
        for (text, style) in &lines {
            if y >= bottom {
                break;
            }
            frame.set_string(x, y, &center_in(text, inner), *style);
            y += 1;
        }
        let mut body_height = y.saturating_sub(area.y);
        if y < bottom {
            frame.set_string(x, y, &" ".repeat(inner), base);
            let love_width = SEND_LOVE_LABEL.chars().count() as u16;
            let vault_width = OPEN_VAULT_LABEL.chars().count() as u16;
            let button = Style::default().bg(theme::accent_alt()).fg(theme::title_fg());
            let love_x = x.saturating_add(1);
            frame.set_string(love_x, y, SEND_LOVE_LABEL, button);
            self.hits
                .push((WidgetAction::SendLove, Rect::new(love_x, y, love_width, 1)));
            let vault_x = x.saturating_add(width).saturating_sub(vault_width + 1);
            if vault_x > love_x.saturating_add(love_width) {
                frame.set_string(vault_x, y, OPEN_VAULT_LABEL, button);
                self.hits
                    .push((WidgetAction::OpenVault, Rect::new(vault_x, y, vault_width, 1)));
            }
            body_height += 1;
        }
        self.hits
            .push((WidgetAction::ToggleCollapse, Rect::new(x, area.y, width, 1)));
        self.bounds = Some(Rect::new(x, area.y, width, body_height));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::buffer::Buffer;

    fn widget() -> DailyWidget {
        let card = CardContent {
            daily_quotes: vec!["one".to_string(), "two".to_string()],
            ..CardContent::default()
        };
        DailyWidget::new(&card)
    }

    #[test]
    fn start_fills_greeting_and_countdown() {
        let mut widget = widget();
        widget.start(Utc.with_ymd_and_hms(2024, 10, 14, 12, 0, 0).unwrap());
        assert!(widget.greeting().starts_with("Good evening"));
        assert_eq!(widget.countdown().days, 1);
    }

    #[test]
    fn quotes_rotate() {
        let mut widget = widget();
        assert_eq!(widget.current_quote(), Some("one"));
        widget.rotate_quote();
        widget.rotate_quote();
        assert_eq!(widget.current_quote(), Some("one"));
    }

    #[test]
    fn buttons_are_hit_tested_and_collapse_hides_them() {
        let mut widget = widget();
        let area = Rect::new(0, 0, 60, 10);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            widget.render(&mut frame, area);
        }
        let x = 60 - 33;
        assert_eq!(widget.hit_test(x + 2, 4), Some(WidgetAction::SendLove));
        assert_eq!(widget.hit_test(x + 30, 4), Some(WidgetAction::OpenVault));
        assert_eq!(widget.hit_test(x + 3, 0), Some(WidgetAction::ToggleCollapse));

        widget.toggle_collapsed();
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            widget.render(&mut frame, area);
        }
        assert_eq!(widget.hit_test(x + 2, 4), None);
    }
}
