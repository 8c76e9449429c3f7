use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use super::{Letter, PanelContent};
use crate::components::{Component, ComponentContext, pad_to};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    List,
    Letter(usize),
}

/// "Open when" envelopes: a list of titles, each opening a letter with a way
/// back to the list.
#[derive(Debug)]
pub struct OpenWhenContent {
    letters: Vec<Letter>,
    selected: usize,
    view: View,
    item_rects: Vec<Rect>,
    back_rect: Option<Rect>,
}

pub const BACK_LABEL: &str = "< Back to letters";

impl OpenWhenContent {
    pub fn new(letters: Vec<Letter>) -> Self {
        Self {
            letters,
            selected: 0,
            view: View::List,
            item_rects: Vec::new(),
            back_rect: None,
        }
    }

    pub fn open_letter(&self) -> Option<&Letter> {
        match self.view {
            View::Letter(idx) => self.letters.get(idx),
            View::List => None,
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn open(&mut self, idx: usize) -> bool {
        if idx >= self.letters.len() {
            return false;
        }
        self.selected = idx;
        self.view = View::Letter(idx);
        true
    }

    pub fn back(&mut self) -> bool {
        if self.view == View::List {
            return false;
        }
        self.view = View::List;
        true
    }

    fn select_delta(&mut self, delta: isize) {
        if self.letters.is_empty() {
            return;
        }
        let len = self.letters.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
    }
}

impl Component for OpenWhenContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.item_rects.clear();
        self.back_rect = None;
        let base = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        match self.view {
            View::List => {
                let width = area.width.saturating_sub(2) as usize;
                for (idx, letter) in self.letters.iter().enumerate() {
                    let y = area.y.saturating_add(1 + idx as u16);
                    if y >= area.y.saturating_add(area.height) {
                        break;
                    }
                    let style = if idx == self.selected && ctx.focused() {
                        Style::default()
                            .bg(theme::menu_selected_bg())
                            .fg(theme::menu_selected_fg())
                    } else {
                        base
                    };
                    let label = pad_to(&format!("✉ {}", letter.title), width);
                    frame.set_string(area.x + 1, y, &label, style);
                    self.item_rects.push(Rect {
                        x: area.x + 1,
                        y,
                        width: width as u16,
                        height: 1,
                    });
                }
            }
            View::Letter(idx) => {
                let Some(letter) = self.letters.get(idx) else {
                    return;
                };
                let body_height = area.height.saturating_sub(1);
                let paragraph = Paragraph::new(vec![
                    Line::styled(letter.title.clone(), base.add_modifier(Modifier::BOLD)),
                    Line::from(""),
                    Line::styled(letter.body.clone(), base),
                ])
                .style(base)
                .wrap(Wrap { trim: true });
                frame.render_widget(
                    paragraph,
                    Rect {
                        height: body_height,
                        ..area
                    },
                );
                let y = area.y.saturating_add(body_height);
                let style = base.fg(theme::accent()).add_modifier(Modifier::BOLD);
                frame.set_string(area.x, y, BACK_LABEL, style);
                self.back_rect = Some(Rect {
                    x: area.x,
                    y,
                    width: BACK_LABEL.chars().count() as u16,
                    height: 1,
                });
            }
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match (self.view, key.code) {
                (View::List, KeyCode::Up) => {
                    self.select_delta(-1);
                    true
                }
                (View::List, KeyCode::Down) => {
                    self.select_delta(1);
                    true
                }
                (View::List, KeyCode::Enter) => self.open(self.selected),
                (View::Letter(_), KeyCode::Backspace | KeyCode::Enter) => self.back(),
                _ => false,
            },
            Event::Mouse(mouse)
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) =>
            {
                if self
                    .back_rect
                    .is_some_and(|r| rect_contains(r, mouse.column, mouse.row))
                {
                    return self.back();
                }
                let hit = self
                    .item_rects
                    .iter()
                    .position(|r| rect_contains(*r, mouse.column, mouse.row));
                match hit {
                    Some(idx) => self.open(idx),
                    None => false,
                }
            }
            _ => false,
        }
    }
}

impl PanelContent for OpenWhenContent {}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn letters() -> Vec<Letter> {
        ["happy", "sad", "proud"]
            .iter()
            .map(|k| Letter {
                key: k.to_string(),
                title: format!("When {k}"),
                body: format!("body {k}"),
            })
            .collect()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn keyboard_opens_and_returns() {
        let mut c = OpenWhenContent::new(letters());
        let ctx = ComponentContext::new(true);
        assert!(c.handle_event(&key(KeyCode::Up), &ctx));
        assert_eq!(c.selected(), 2);
        assert!(c.handle_event(&key(KeyCode::Enter), &ctx));
        assert_eq!(c.open_letter().map(|l| l.key.as_str()), Some("proud"));
        assert!(c.handle_event(&key(KeyCode::Backspace), &ctx));
        assert!(c.open_letter().is_none());
    }

    #[test]
    fn open_out_of_range_is_refused() {
        let mut c = OpenWhenContent::new(letters());
        assert!(!c.open(10));
        assert!(!c.back());
    }
}
