//! UiFrame: a thin wrapper around `ratatui::Frame` that clamps drawing to a
//! visible area.
//!
//! Panels, overlays and widgets compute rectangles from signed geometry and
//! may drift past the terminal edge while a sheet is being swiped. Every draw
//! call goes through `UiFrame`, which clips to its area instead of letting
//! the underlying `Buffer` panic.
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{StatefulWidget, Widget};

pub struct UiFrame<'a> {
    area: Rect,
    buffer: &'a mut Buffer,
}

impl<'a> UiFrame<'a> {
    pub fn new(frame: &'a mut Frame<'_>) -> Self {
        let area = frame.area();
        let buffer = frame.buffer_mut();
        Self { area, buffer }
    }

    /// Construct a `UiFrame` directly from an area and buffer.
    pub fn from_parts(area: Rect, buffer: &'a mut Buffer) -> Self {
        Self { area, buffer }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn buffer_mut(&mut self) -> &mut Buffer {
        self.buffer
    }

    /// Reborrow the frame with its drawable area narrowed to `area`.
    ///
    /// Panel content renders through a narrowed frame so it cannot spill over
    /// the chrome or neighbouring panels.
    pub fn narrowed(&mut self, area: Rect) -> UiFrame<'_> {
        UiFrame {
            area: area.intersection(self.area),
            buffer: self.buffer,
        }
    }

    fn clip_rect(&self, rect: Rect) -> Option<Rect> {
        let clipped = rect.intersection(self.area);
        if clipped.width == 0 || clipped.height == 0 {
            None
        } else {
            Some(clipped)
        }
    }

    pub fn render_widget<W>(&mut self, widget: W, area: Rect)
    where
        W: Widget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer);
        }
    }

    pub fn render_stateful_widget<W>(&mut self, widget: W, area: Rect, state: &mut W::State)
    where
        W: StatefulWidget,
    {
        if let Some(clipped) = self.clip_rect(area) {
            widget.render(clipped, self.buffer, state);
        }
    }

    /// Write `text` at `(x, y)`, truncated at the right edge of the frame.
    pub fn set_string(&mut self, x: u16, y: u16, text: &str, style: Style) {
        safe_set_string(self.buffer, self.area, x, y, text, style);
    }

    /// Apply `style` to every cell of `rect` without touching symbols.
    pub fn fill_style(&mut self, rect: Rect, style: Style) {
        if let Some(clipped) = self.clip_rect(rect) {
            self.buffer.set_style(clipped, style);
        }
    }

    /// Dim an already drawn region; used for faded sheets.
    pub fn dim(&mut self, rect: Rect) {
        self.fill_style(rect, Style::default().add_modifier(Modifier::DIM));
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Centre a `width` x `height` box inside `area`, shrinking it to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
