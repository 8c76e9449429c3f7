use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use super::{Inspiration, PanelContent};
use crate::components::{Component, ComponentContext};
use crate::constants::INSPIRATION_ROTATION;
use crate::theme;
use crate::ui::UiFrame;

/// Quotes shown one at a time, advancing on each refresh.
#[derive(Debug)]
pub struct InspirationContent {
    quotes: Vec<Inspiration>,
    index: usize,
}

impl InspirationContent {
    pub fn new(quotes: Vec<Inspiration>) -> Self {
        Self { quotes, index: 0 }
    }

    pub fn current(&self) -> Option<&Inspiration> {
        self.quotes.get(self.index)
    }

    pub fn advance(&mut self) {
        if !self.quotes.is_empty() {
            self.index = (self.index + 1) % self.quotes.len();
        }
    }
}

impl Component for InspirationContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let Some(quote) = self.current() else {
            return;
        };
        let base = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled("✨", base.fg(theme::accent()))).centered(),
            Line::from(""),
            Line::from(Span::styled(
                format!("\"{}\"", quote.quote),
                base.add_modifier(Modifier::BOLD),
            ))
            .centered(),
            Line::from(Span::styled(
                format!("- {}", quote.author),
                base.add_modifier(Modifier::ITALIC),
            ))
            .centered(),
        ];
        if !quote.note.is_empty() {
            lines.push(Line::from(""));
            lines.push(
                Line::from(Span::styled(quote.note.clone(), base.fg(theme::accent()))).centered(),
            );
        }
        let paragraph = Paragraph::new(lines)
            .style(base)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

impl PanelContent for InspirationContent {
    fn refresh_interval(&self) -> Option<Duration> {
        Some(INSPIRATION_ROTATION)
    }

    fn refresh(&mut self, _now: DateTime<Utc>) {
        self.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(text: &str) -> Inspiration {
        Inspiration {
            quote: text.to_string(),
            author: "A".to_string(),
            note: String::new(),
        }
    }

    #[test]
    fn rotates_and_wraps() {
        let mut content = InspirationContent::new(vec![quote("one"), quote("two")]);
        assert_eq!(content.current().map(|q| q.quote.as_str()), Some("one"));
        content.refresh(Utc::now());
        assert_eq!(content.current().map(|q| q.quote.as_str()), Some("two"));
        content.refresh(Utc::now());
        assert_eq!(content.current().map(|q| q.quote.as_str()), Some("one"));
    }

    #[test]
    fn empty_list_is_harmless() {
        let mut content = InspirationContent::new(Vec::new());
        content.advance();
        assert!(content.current().is_none());
    }
}
