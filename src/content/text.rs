use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};

use super::PanelContent;
use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

/// Static wrapped text with vertical scrolling.
#[derive(Debug)]
pub struct TextContent {
    body: String,
    scroll: u16,
    max_scroll: u16,
}

impl TextContent {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            scroll: 0,
            max_scroll: u16::MAX,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    fn scroll_by(&mut self, delta: i32) -> bool {
        let next = (self.scroll as i32 + delta).clamp(0, self.max_scroll as i32) as u16;
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }
}

impl Component for TextContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        let style = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        let paragraph = Paragraph::new(self.body.as_str())
            .style(style)
            .wrap(Wrap { trim: false });
        let total = wrapped_height(&self.body, area.width);
        self.max_scroll = total.saturating_sub(area.height);
        self.scroll = self.scroll.min(self.max_scroll);
        frame.render_widget(paragraph.scroll((self.scroll, 0)), area);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Up => self.scroll_by(-1),
                KeyCode::Down => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-10),
                KeyCode::PageDown => self.scroll_by(10),
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_by(-1),
                MouseEventKind::ScrollDown => self.scroll_by(1),
                _ => false,
            },
            _ => false,
        }
    }
}

impl PanelContent for TextContent {}

/// Rows `body` needs at `width` columns, counting each hard line as at least
/// one row.
fn wrapped_height(body: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    body.lines()
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;

    #[test]
    fn scrolling_stops_at_the_last_line() {
        let mut text = TextContent::new("one\ntwo\nthree\nfour");
        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        let ctx = ComponentContext::new(true);
        text.render(&mut UiFrame::from_parts(area, &mut buffer), area, &ctx);
        let down = Event::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        assert!(text.handle_event(&down, &ctx));
        assert!(text.handle_event(&down, &ctx));
        assert!(!text.handle_event(&down, &ctx));
        assert_eq!(text.scroll(), 2);
        let up = Event::Key(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE));
        assert!(text.handle_event(&up, &ctx));
        assert_eq!(text.scroll(), 1);
    }
}
