use chrono::{DateTime, Utc};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::{Component, ComponentContext, center_in};
use crate::clock;
use crate::constants::{INCORRECT_PIN_MESSAGE, PIN_MAX_LEN};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, centered};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockAttempt {
    Accepted,
    Rejected,
}

/// What a key press on the lock screen asks the shell to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockKey {
    Submit,
    Edited,
    Ignored,
}

/// Full-screen PIN gate. Cosmetic only: the PIN is compared as a plain
/// string.
#[derive(Debug)]
pub struct LockScreen {
    pin: String,
    recipient: String,
    input: String,
    error: Option<String>,
    time_label: String,
    date_label: String,
    unlock_rect: Option<Rect>,
}

impl LockScreen {
    pub fn new(pin: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            pin: pin.into(),
            recipient: recipient.into(),
            input: String::new(),
            error: None,
            time_label: String::new(),
            date_label: String::new(),
            unlock_rect: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn time_label(&self) -> &str {
        &self.time_label
    }

    /// Reset for a fresh lock: empty input, no error, current time shown.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.input.clear();
        self.error = None;
        self.update_time(now);
    }

    pub fn update_time(&mut self, now: DateTime<Utc>) {
        self.time_label = clock::format_time(now);
        self.date_label = clock::format_date(now);
    }

    pub fn type_char(&mut self, ch: char) -> bool {
        if ch.is_control() || self.input.chars().count() >= PIN_MAX_LEN {
            return false;
        }
        self.input.push(ch);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.input.pop().is_some()
    }

    /// Compare the trimmed input with the PIN. A mismatch clears the input
    /// and shows the error; a match clears both.
    pub fn submit(&mut self) -> UnlockAttempt {
        if self.input.trim() == self.pin {
            self.input.clear();
            self.error = None;
            UnlockAttempt::Accepted
        } else {
            tracing::debug!("incorrect pin");
            self.input.clear();
            self.error = Some(INCORRECT_PIN_MESSAGE.to_string());
            UnlockAttempt::Rejected
        }
    }

    /// Enter and Space submit, printable keys type, Backspace deletes.
    pub fn handle_key(&mut self, key: &KeyEvent) -> LockKey {
        if key.kind == KeyEventKind::Release {
            return LockKey::Ignored;
        }
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => LockKey::Submit,
            KeyCode::Backspace => {
                if self.backspace() {
                    LockKey::Edited
                } else {
                    LockKey::Ignored
                }
            }
            KeyCode::Char(ch) => {
                if self.type_char(ch) {
                    LockKey::Edited
                } else {
                    LockKey::Ignored
                }
            }
            _ => LockKey::Ignored,
        }
    }

    pub fn hit_unlock(&self, column: u16, row: u16) -> bool {
        self.unlock_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
    }
}

impl Component for LockScreen {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.unlock_rect = None;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let backdrop = Style::default().bg(theme::accent()).fg(theme::dialog_fg());
        for y in area.y..area.y.saturating_add(area.height) {
            frame.set_string(area.x, y, &" ".repeat(area.width as usize), backdrop);
        }

        let card = centered(area, 34, 11);
        let width = card.width as usize;
        let style = Style::default()
            .bg(theme::dialog_bg())
            .fg(theme::dialog_fg());
        for y in card.y..card.y.saturating_add(card.height) {
            frame.set_string(card.x, y, &" ".repeat(width), style);
        }

        let masked: String = "•".repeat(self.input.chars().count());
        let pin_field = if masked.is_empty() {
            "[ ••• ]".to_string()
        } else {
            format!("[ {masked} ]")
        };
        let error = self.error.clone().unwrap_or_default();
        let greeting = format!("Hi {}", self.recipient);
        let rows: [(&str, Style); 9] = [
            ("", style),
            (self.time_label.as_str(), style.add_modifier(Modifier::BOLD)),
            (self.date_label.as_str(), style),
            (greeting.as_str(), style.fg(theme::accent()).add_modifier(Modifier::BOLD)),
            ("Enter PIN to unlock", style),
            (pin_field.as_str(), style),
            (error.as_str(), style.fg(theme::error_fg()).add_modifier(Modifier::BOLD)),
            ("", style),
            ("[ Unlock ]", style.bg(theme::accent()).fg(theme::toast_fg())),
        ];
        for (offset, (text, row_style)) in rows.iter().enumerate() {
            let y = card.y.saturating_add(offset as u16);
            if y >= card.y.saturating_add(card.height) {
                break;
            }
            if offset == rows.len() - 1 {
                let label_width = text.chars().count() as u16;
                let x = card.x + card.width.saturating_sub(label_width) / 2;
                frame.set_string(x, y, text, *row_style);
                self.unlock_rect = Some(Rect {
                    x,
                    y,
                    width: label_width.min(card.width),
                    height: 1,
                });
            } else {
                frame.set_string(card.x, y, &center_in(text, width), *row_style);
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) => self.handle_key(key) != LockKey::Ignored,
            Event::Mouse(mouse) => {
                matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left))
                    && self.hit_unlock(mouse.column, mouse.row)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn correct_pin_is_accepted() {
        let mut lock = LockScreen::new("1610", "Sam");
        for ch in "1610".chars() {
            assert_eq!(lock.handle_key(&key(KeyCode::Char(ch))), LockKey::Edited);
        }
        assert_eq!(lock.handle_key(&key(KeyCode::Enter)), LockKey::Submit);
        assert_eq!(lock.submit(), UnlockAttempt::Accepted);
        assert!(lock.error().is_none());
    }

    #[test]
    fn wrong_pin_sets_error_and_clears_input() {
        let mut lock = LockScreen::new("1610", "Sam");
        lock.type_char('9');
        assert_eq!(lock.submit(), UnlockAttempt::Rejected);
        assert_eq!(lock.error(), Some(INCORRECT_PIN_MESSAGE));
        assert!(lock.input().is_empty());
    }

    #[test]
    fn input_is_capped_and_editable() {
        let mut lock = LockScreen::new("1610", "Sam");
        for ch in "12345678".chars() {
            lock.type_char(ch);
        }
        assert_eq!(lock.input(), "123456");
        assert_eq!(lock.handle_key(&key(KeyCode::Backspace)), LockKey::Edited);
        assert_eq!(lock.input(), "12345");
    }

    #[test]
    fn reset_clears_previous_error() {
        let mut lock = LockScreen::new("1610", "Sam");
        lock.submit();
        lock.reset(Utc::now());
        assert!(lock.error().is_none());
        assert!(!lock.time_label().is_empty());
    }

    #[test]
    fn render_records_unlock_button() {
        let area = Rect::new(0, 0, 60, 20);
        let mut buffer = Buffer::empty(area);
        let mut lock = LockScreen::new("1610", "Sam");
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            lock.render(&mut frame, area, &ComponentContext::default());
        }
        let rect = lock.unlock_rect.expect("unlock button drawn");
        assert!(lock.hit_unlock(rect.x, rect.y));
    }
}
