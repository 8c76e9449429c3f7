use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::center_in;
use crate::content::AppEntry;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;
use crate::window::PanelKind;

const ICON_WIDTH: u16 = 14;
const ICON_HEIGHT: u16 = 3;

/// Column of launcher icons on the desktop.
#[derive(Debug)]
pub struct DesktopIcons {
    apps: Vec<AppEntry>,
    selected: usize,
    icon_rects: Vec<Rect>,
}

impl DesktopIcons {
    pub fn new(apps: Vec<AppEntry>) -> Self {
        Self {
            apps,
            selected: 0,
            icon_rects: Vec::new(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn apps(&self) -> &[AppEntry] {
        &self.apps
    }

    /// Arrows move the selection, Enter or Space launch the selected icon.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<PanelKind> {
        if key.kind == KeyEventKind::Release || self.apps.is_empty() {
            return None;
        }
        let len = self.apps.len();
        match key.code {
            KeyCode::Up | KeyCode::Left => {
                self.selected = (self.selected + len - 1) % len;
                None
            }
            KeyCode::Down | KeyCode::Right => {
                self.selected = (self.selected + 1) % len;
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.apps.get(self.selected).map(|app| app.kind.clone())
            }
            _ => None,
        }
    }

    pub fn hit_test(&mut self, column: u16, row: u16) -> Option<PanelKind> {
        let idx = self
            .icon_rects
            .iter()
            .position(|r| rect_contains(*r, column, row))?;
        self.selected = idx;
        self.apps.get(idx).map(|app| app.kind.clone())
    }

    /// Lay icons out top to bottom, wrapping into further columns.
    pub fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, focused: bool) {
        self.icon_rects.clear();
        if area.width < ICON_WIDTH || area.height < ICON_HEIGHT {
            return;
        }
        let per_column = (area.height / ICON_HEIGHT).max(1) as usize;
        let base = Style::default()
            .bg(theme::desktop_bg())
            .fg(theme::desktop_fg());
        for (idx, app) in self.apps.iter().enumerate() {
            let col = (idx / per_column) as u16;
            let row = (idx % per_column) as u16;
            let x = area.x.saturating_add(1 + col * (ICON_WIDTH + 1));
            let y = area.y.saturating_add(row * ICON_HEIGHT);
            if x.saturating_add(ICON_WIDTH) > area.x.saturating_add(area.width) {
                break;
            }
            let style = if focused && idx == self.selected {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
            } else {
                base
            };
            let width = ICON_WIDTH as usize;
            frame.set_string(
                x,
                y,
                &center_in(&app.icon.to_string(), width),
                style.fg(theme::accent()).add_modifier(Modifier::BOLD),
            );
            frame.set_string(x, y + 1, &center_in(&app.label, width), style);
            self.icon_rects.push(Rect::new(x, y, ICON_WIDTH, 2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;

    fn icons() -> DesktopIcons {
        DesktopIcons::new(
            ["countdown", "open-when", "photo-memory"]
                .iter()
                .map(|k| AppEntry {
                    kind: PanelKind::new(*k),
                    label: k.to_string(),
                    icon: '*',
                })
                .collect(),
        )
    }

    #[test]
    fn keyboard_moves_and_launches() {
        let mut icons = icons();
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(icons.handle_key(&down), None);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(icons.handle_key(&enter), Some(PanelKind::new("open-when")));
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::NONE);
        icons.handle_key(&up);
        icons.handle_key(&up);
        assert_eq!(icons.selected(), 2);
    }

    #[test]
    fn click_launches_icon_under_pointer() {
        let mut icons = icons();
        let area = Rect::new(0, 0, 40, 12);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            icons.render(&mut frame, area, true);
        }
        assert_eq!(icons.hit_test(3, 4), Some(PanelKind::new("open-when")));
        assert_eq!(icons.hit_test(3, 2), None);
    }
}
