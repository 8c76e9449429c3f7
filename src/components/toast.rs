use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::theme;
use crate::ui::UiFrame;

/// One transient message. Expiry is driven by the shell's scheduler.
#[derive(Debug, Default)]
pub struct Toast {
    message: Option<String>,
}

impl Toast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn hide(&mut self) -> bool {
        self.message.take().is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    /// Centred on the last row of `area`.
    pub fn render(&self, frame: &mut UiFrame<'_>, area: Rect) {
        let Some(message) = &self.message else {
            return;
        };
        if area.width == 0 || area.height == 0 {
            return;
        }
        let text = format!(" {message} ");
        let width = (text.chars().count() as u16).min(area.width);
        let x = area.x + (area.width - width) / 2;
        let y = area.y.saturating_add(area.height).saturating_sub(1);
        let style = Style::default()
            .bg(theme::toast_bg())
            .fg(theme::toast_fg())
            .add_modifier(Modifier::BOLD);
        frame.set_string(x, y, &text, style);
    }
}
