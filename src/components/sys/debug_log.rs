//! In-memory log ring buffer and the overlay that shows it.
//!
//! `tracing` output lands here when no log file is configured, so nothing is
//! written to the terminal while the alternate screen is active.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::components::{Component, ComponentContext};
use crate::theme;
use crate::ui::UiFrame;

pub const DEFAULT_MAX_LINES: usize = 2000;

static GLOBAL_LOG: OnceLock<DebugLogHandle> = OnceLock::new();
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

pub fn set_global_debug_log(handle: DebugLogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_debug_log() -> Option<DebugLogHandle> {
    GLOBAL_LOG.get().cloned()
}

/// Send panic reports to the global log. Without one, the previous hook
/// runs as usual.
pub fn install_panic_hook() {
    if PANIC_HOOK_INSTALLED.set(()).is_err() {
        return;
    }
    let prev = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let Some(handle) = GLOBAL_LOG.get() else {
            prev(info);
            return;
        };
        handle.push("=== PANIC ===");
        if let Some(location) = info.location() {
            handle.push(format!(
                "{}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ));
        }
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "<non-string panic>".to_string());
        handle.push(format!("message: {message}"));
    }));
}

#[derive(Debug)]
struct DebugLogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl DebugLogBuffer {
    fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct DebugLogHandle {
    inner: Arc<Mutex<DebugLogBuffer>>,
}

impl DebugLogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DebugLogBuffer::new(max_lines))),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the stored lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|b| b.lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn writer(&self) -> DebugLogWriter {
        DebugLogWriter::new(self.clone())
    }
}

impl Default for DebugLogHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

/// `io::Write` adapter that splits input into lines.
#[derive(Debug)]
pub struct DebugLogWriter {
    handle: DebugLogHandle,
    pending: Vec<u8>,
}

impl DebugLogWriter {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            pending: Vec::new(),
        }
    }

    fn flush_pending(&mut self, force: bool) {
        let end = if force {
            self.pending.len()
        } else {
            match self.pending.iter().rposition(|b| *b == b'\n') {
                Some(pos) => pos + 1,
                None => return,
            }
        };
        let drained: Vec<u8> = self.pending.drain(..end).collect();
        let text = String::from_utf8_lossy(&drained);
        for line in text.split('\n').filter(|l| !l.is_empty()) {
            self.handle.push(line.to_string());
        }
    }
}

impl Write for DebugLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.flush_pending(false);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending(true);
        Ok(())
    }
}

impl Drop for DebugLogWriter {
    fn drop(&mut self) {
        self.flush_pending(true);
    }
}

/// Overlay showing the tail of the log. Scrolling up stops following new
/// lines until the view is back at the bottom.
#[derive(Debug)]
pub struct DebugLogComponent {
    handle: DebugLogHandle,
    offset: usize,
    follow_tail: bool,
    last_total: usize,
    last_view: usize,
}

impl DebugLogComponent {
    pub fn new(handle: DebugLogHandle) -> Self {
        Self {
            handle,
            offset: 0,
            follow_tail: true,
            last_total: 0,
            last_view: 0,
        }
    }

    pub fn handle(&self) -> &DebugLogHandle {
        &self.handle
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn max_offset(&self) -> usize {
        self.last_total.saturating_sub(self.last_view)
    }

    fn scroll_by(&mut self, delta: isize) -> bool {
        let next = (self.offset as isize + delta).clamp(0, self.max_offset() as isize) as usize;
        let changed = next != self.offset;
        self.offset = next;
        self.follow_tail = self.offset >= self.max_offset();
        changed
    }
}

impl Component for DebugLogComponent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        if area.width < 3 || area.height < 3 {
            return;
        }
        frame.render_widget(Clear, area);
        let block = Block::default()
            .title(" Debug log (F12) ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::accent()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = self.handle.lines();
        self.last_total = lines.len();
        self.last_view = inner.height as usize;
        if self.follow_tail {
            self.offset = self.max_offset();
        }
        self.offset = self.offset.min(self.max_offset());
        let text: Vec<Line> = lines
            .into_iter()
            .skip(self.offset)
            .take(self.last_view)
            .map(Line::from)
            .collect();
        let style = Style::default().add_modifier(Modifier::DIM);
        frame.render_widget(Paragraph::new(text).style(style), inner);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        let page = self.last_view.max(1) as isize;
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                KeyCode::Up => self.scroll_by(-1),
                KeyCode::Down => self.scroll_by(1),
                KeyCode::PageUp => self.scroll_by(-page),
                KeyCode::PageDown => self.scroll_by(page),
                KeyCode::End => self.scroll_by(self.last_total as isize),
                _ => false,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => self.scroll_by(-3),
                MouseEventKind::ScrollDown => self.scroll_by(3),
                _ => false,
            },
            _ => false,
        }
    }
}
