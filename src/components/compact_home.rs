//! Phone-style home screen for narrow terminals.

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::center_in;
use crate::clock;
use crate::content::AppEntry;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::PanelKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeAction {
    SendLove,
    Countdown,
    /// Switch to the expanded desktop without reloading.
    Desktop,
    Launch(PanelKind),
}

const QUICK_ACTIONS: [(&str, HomeAction); 3] = [
    ("♥ Send love", HomeAction::SendLove),
    ("⏳ Countdown", HomeAction::Countdown),
    ("▭ Desktop", HomeAction::Desktop),
];

#[derive(Debug)]
pub struct CompactHome {
    recipient: String,
    apps: Vec<AppEntry>,
    greeting: String,
    time_label: String,
    selected: usize,
    hits: Vec<(usize, Rect)>,
}

impl CompactHome {
    pub fn new(recipient: impl Into<String>, apps: Vec<AppEntry>) -> Self {
        Self {
            recipient: recipient.into(),
            apps,
            greeting: String::new(),
            time_label: String::new(),
            selected: 0,
            hits: Vec::new(),
        }
    }

    pub fn update(&mut self, now: DateTime<Utc>) {
        self.greeting = clock::greeting(now, &self.recipient);
        self.time_label = clock::format_time_with_zone(now);
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    fn target_count(&self) -> usize {
        QUICK_ACTIONS.len() + self.apps.len()
    }

    /// Quick actions first, then one launcher per app.
    pub fn action(&self, idx: usize) -> Option<HomeAction> {
        match QUICK_ACTIONS.get(idx) {
            Some((_, action)) => Some(action.clone()),
            None => self
                .apps
                .get(idx - QUICK_ACTIONS.len())
                .map(|app| HomeAction::Launch(app.kind.clone())),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<HomeAction> {
        let count = self.target_count();
        if key.kind == KeyEventKind::Release || count == 0 {
            return None;
        }
        match key.code {
            KeyCode::Left | KeyCode::Up => {
                self.selected = (self.selected + count - 1) % count;
                None
            }
            KeyCode::Right | KeyCode::Down => {
                self.selected = (self.selected + 1) % count;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.action(self.selected),
            _ => None,
        }
    }

    pub fn hit_test(&mut self, column: u16, row: u16) -> Option<HomeAction> {
        let idx = self
            .hits
            .iter()
            .find(|(_, r)| rect_contains(*r, column, row))
            .map(|(idx, _)| *idx)?;
        self.selected = idx;
        self.action(idx)
    }

    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        self.hits.clear();
        if area.width < 4 || area.height < 4 {
            return;
        }
        let base = Style::default()
            .bg(theme::desktop_bg())
            .fg(theme::desktop_fg());
        for y in area.y..area.y.saturating_add(area.height) {
            frame.set_string(area.x, y, &" ".repeat(area.width as usize), base);
        }
        let width = area.width as usize;
        frame.set_string(area.x, area.y, &center_in(&self.time_label, width), base);
        frame.set_string(
            area.x,
            area.y + 1,
            &center_in(&self.greeting, width),
            base.fg(theme::accent()).add_modifier(Modifier::BOLD),
        );

        let selected_style = Style::default()
            .bg(theme::menu_selected_bg())
            .fg(theme::menu_selected_fg());
        let button = Style::default().bg(theme::accent()).fg(theme::title_fg());
        let slot = (area.width / QUICK_ACTIONS.len() as u16).max(1);
        let y = area.y + 3;
        for (idx, (label, _)) in QUICK_ACTIONS.iter().enumerate() {
            let x = area.x + slot * idx as u16;
            let style = if focused && self.selected == idx {
                selected_style
            } else {
                button
            };
            let cell_width = slot.saturating_sub(1).max(1);
            frame.set_string(x, y, &center_in(label, cell_width as usize), style);
            self.hits.push((idx, Rect::new(x, y, cell_width, 1)));
        }

        let columns: u16 = 3;
        let tile = (area.width / columns).max(1);
        let grid_top = y + 2;
        let bottom = area.y.saturating_add(area.height);
        for (offset, app) in self.apps.iter().enumerate() {
            let idx = QUICK_ACTIONS.len() + offset;
            let x = area.x + tile * (offset as u16 % columns);
            let row_y = grid_top + 3 * (offset as u16 / columns);
            if row_y.saturating_add(1) >= bottom {
                break;
            }
            let style = if focused && self.selected == idx {
                selected_style
            } else {
                base
            };
            let tile_width = tile.saturating_sub(1).max(1);
            frame.set_string(
                x,
                row_y,
                &center_in(&app.icon.to_string(), tile_width as usize),
                style.fg(theme::accent()),
            );
            frame.set_string(x, row_y + 1, &center_in(&app.label, tile_width as usize), style);
            self.hits.push((idx, Rect::new(x, row_y, tile_width, 2)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;

    fn home() -> CompactHome {
        CompactHome::new(
            "Sam",
            vec![AppEntry {
                kind: PanelKind::new("open-when"),
                label: "Open When".to_string(),
                icon: '✉',
            }],
        )
    }

    #[test]
    fn actions_then_apps() {
        let home = home();
        assert_eq!(home.action(0), Some(HomeAction::SendLove));
        assert_eq!(home.action(2), Some(HomeAction::Desktop));
        assert_eq!(
            home.action(3),
            Some(HomeAction::Launch(PanelKind::new("open-when")))
        );
        assert_eq!(home.action(4), None);
    }

    #[test]
    fn keys_wrap_and_activate() {
        let mut home = home();
        let left = KeyEvent::new(KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(home.handle_key(&left), None);
        assert_eq!(home.selected(), 3);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(
            home.handle_key(&enter),
            Some(HomeAction::Launch(PanelKind::new("open-when")))
        );
    }

    #[test]
    fn quick_action_row_is_clickable() {
        let mut home = home();
        let area = Rect::new(0, 0, 30, 12);
        let mut buffer = Buffer::empty(area);
        home.render(&mut UiFrame::from_parts(area, &mut buffer), area, true);
        assert_eq!(home.hit_test(12, 3), Some(HomeAction::Countdown));
        assert_eq!(
            home.hit_test(2, 5),
            Some(HomeAction::Launch(PanelKind::new("open-when")))
        );
    }
}
