use ratatui::prelude::Rect;
use ratatui::style::{Modifier, Style};

use super::GrabTarget;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, safe_set_string};

pub const CLOSE_GLYPH: &str = "×";

/// Draws panel chrome and resolves which part of it a pointer landed on.
pub trait PanelDecorator: std::fmt::Debug {
    fn render_frame(
        &self,
        frame: &mut UiFrame<'_>,
        rect: Rect,
        title: &str,
        focused: bool,
        faded: bool,
    );

    /// Area left for content once the chrome is drawn.
    fn content_rect(&self, rect: Rect) -> Rect;

    fn close_rect(&self, rect: Rect) -> Option<Rect>;

    fn grab_target(&self, rect: Rect, column: u16, row: u16) -> GrabTarget {
        if self
            .close_rect(rect)
            .is_some_and(|close| rect_contains(close, column, row))
        {
            return GrabTarget::CloseControl;
        }
        if row == rect.y && rect_contains(rect, column, row) {
            GrabTarget::TitleBar
        } else {
            GrabTarget::Body
        }
    }
}

/// Title bar on the first row with a close control at its right end, a thin
/// border on the other three sides.
#[derive(Debug, Default)]
pub struct CardDecorator;

impl PanelDecorator for CardDecorator {
    fn render_frame(
        &self,
        frame: &mut UiFrame<'_>,
        rect: Rect,
        title: &str,
        focused: bool,
        faded: bool,
    ) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let bounds = frame.area();
        let mut header_style = if focused {
            Style::default()
                .bg(theme::title_focused_bg())
                .fg(theme::title_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .bg(theme::title_bg())
                .fg(theme::title_fg())
        };
        let mut border_style = Style::default()
            .fg(theme::panel_border())
            .bg(theme::panel_bg());
        if faded {
            header_style = header_style.add_modifier(Modifier::DIM);
            border_style = border_style.add_modifier(Modifier::DIM);
        }

        let left = rect.x;
        let right = rect.x.saturating_add(rect.width).saturating_sub(1);
        let top = rect.y;
        let bottom = rect.y.saturating_add(rect.height).saturating_sub(1);
        let buffer = frame.buffer_mut();

        // Title bar
        let blank = " ".repeat(rect.width as usize);
        safe_set_string(buffer, bounds, left, top, &blank, header_style);
        let label = format!(" {title}");
        safe_set_string(buffer, bounds, left, top, &label, header_style);
        if let Some(close) = self.close_rect(rect) {
            safe_set_string(
                buffer,
                bounds,
                close.x,
                close.y,
                &format!(" {CLOSE_GLYPH} "),
                header_style,
            );
        }

        for y in top.saturating_add(1)..bottom {
            safe_set_string(buffer, bounds, left, y, "│", border_style);
            safe_set_string(buffer, bounds, right, y, "│", border_style);
        }
        let mut base = String::with_capacity(rect.width as usize * 3);
        base.push('└');
        for _ in 0..rect.width.saturating_sub(2) {
            base.push('─');
        }
        base.push('┘');
        safe_set_string(buffer, bounds, left, bottom, &base, border_style);
    }

    fn content_rect(&self, rect: Rect) -> Rect {
        Rect {
            x: rect.x.saturating_add(1),
            y: rect.y.saturating_add(1),
            width: rect.width.saturating_sub(2),
            height: rect.height.saturating_sub(2),
        }
    }

    fn close_rect(&self, rect: Rect) -> Option<Rect> {
        if rect.width < 4 {
            return None;
        }
        Some(Rect {
            x: rect.x + rect.width - 3,
            y: rect.y,
            width: 3,
            height: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::buffer::Buffer;

    #[test]
    fn grab_target_distinguishes_close_title_and_body() {
        let deco = CardDecorator;
        let rect = Rect::new(10, 5, 20, 8);
        assert_eq!(deco.grab_target(rect, 28, 5), GrabTarget::CloseControl);
        assert_eq!(deco.grab_target(rect, 12, 5), GrabTarget::TitleBar);
        assert_eq!(deco.grab_target(rect, 12, 6), GrabTarget::Body);
    }

    #[test]
    fn render_writes_title_and_close_glyph() {
        let area = Rect::new(0, 0, 30, 10);
        let mut buffer = Buffer::empty(area);
        let mut frame = UiFrame::from_parts(area, &mut buffer);
        let rect = Rect::new(2, 1, 20, 6);
        CardDecorator.render_frame(&mut frame, rect, "countdown", true, false);
        let row: String = (2..22)
            .map(|x| buffer.cell((x, 1)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect();
        assert!(row.contains("countdown"));
        assert!(row.contains(CLOSE_GLYPH));
        assert_eq!(buffer.cell((2, 6)).map(|c| c.symbol()), Some("└"));
    }
}
