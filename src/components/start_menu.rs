use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use super::pad_to;
use crate::content::AppEntry;
use crate::layout::rect_contains;
use crate::state::FocusTarget;
use crate::theme;
use crate::ui::UiFrame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    App(AppEntry),
    Lock,
    SwitchView,
}

impl MenuEntry {
    pub fn label(&self) -> String {
        match self {
            Self::App(app) => format!("{} {}", app.icon, app.label),
            Self::Lock => "🔒 Lock".to_string(),
            Self::SwitchView => "⇄ Switch view".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuHit {
    Item(usize),
    Close,
    /// Inside the menu but on no control.
    Inside,
}

const MENU_WIDTH: u16 = 28;
const MENU_TITLE: &str = " Start";

#[derive(Debug)]
pub struct StartMenu {
    entries: Vec<MenuEntry>,
    selected: usize,
    bounds: Option<Rect>,
    close_rect: Option<Rect>,
    item_rects: Vec<Rect>,
}

impl StartMenu {
    /// One entry per app, then Lock and Switch view.
    pub fn new(apps: Vec<AppEntry>) -> Self {
        let mut entries: Vec<MenuEntry> = apps.into_iter().map(MenuEntry::App).collect();
        entries.push(MenuEntry::Lock);
        entries.push(MenuEntry::SwitchView);
        Self {
            entries,
            selected: 0,
            bounds: None,
            close_rect: None,
            item_rects: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn entry(&self, idx: usize) -> Option<&MenuEntry> {
        self.entries.get(idx)
    }

    pub fn select(&mut self, idx: usize) {
        if idx < self.entries.len() {
            self.selected = idx;
        }
    }

    /// Move the selection with wrap-around and return the new index.
    pub fn select_delta(&mut self, delta: isize) -> usize {
        if !self.entries.is_empty() {
            let len = self.entries.len() as isize;
            self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
        }
        self.selected
    }

    /// Forget the rectangles of the last frame, used when the menu hides.
    pub fn clear_hits(&mut self) {
        self.bounds = None;
        self.close_rect = None;
        self.item_rects.clear();
    }

    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.bounds.is_some_and(|r| rect_contains(r, column, row))
    }

    /// Draw the menu so it sits on top of `anchor` (the start button),
    /// growing upwards inside `bounds`.
    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        anchor: Rect,
        bounds: Rect,
        focus: FocusTarget,
    ) {
        self.clear_hits();
        let height = (self.entries.len() as u16).saturating_add(2);
        let width = MENU_WIDTH.min(bounds.width);
        let height = height.min(anchor.y.saturating_sub(bounds.y));
        if width < 4 || height < 2 {
            return;
        }
        let rect = Rect {
            x: anchor.x.max(bounds.x),
            y: anchor.y.saturating_sub(height),
            width,
            height,
        };
        let base = Style::default().bg(theme::menu_bg()).fg(theme::menu_fg());
        let selected = Style::default()
            .bg(theme::menu_selected_bg())
            .fg(theme::menu_selected_fg())
            .add_modifier(Modifier::BOLD);
        for y in rect.y..rect.y.saturating_add(rect.height) {
            frame.set_string(rect.x, y, &" ".repeat(rect.width as usize), base);
        }

        let header = base.bg(theme::accent()).fg(theme::title_fg());
        frame.set_string(
            rect.x,
            rect.y,
            &pad_to(MENU_TITLE, rect.width as usize),
            header.add_modifier(Modifier::BOLD),
        );
        let close_x = rect.x.saturating_add(rect.width).saturating_sub(3);
        let close_style = if focus == FocusTarget::StartMenuClose {
            selected
        } else {
            header
        };
        frame.set_string(close_x, rect.y, " × ", close_style);
        self.close_rect = Some(Rect::new(close_x, rect.y, 3, 1));

        let inner = rect.width.saturating_sub(2) as usize;
        let last_row = rect.y.saturating_add(rect.height).saturating_sub(1);
        for (idx, entry) in self.entries.iter().enumerate() {
            let y = rect.y.saturating_add(1 + idx as u16);
            if y >= last_row {
                break;
            }
            let marker = if idx == self.selected { '›' } else { ' ' };
            let style = if focus == FocusTarget::StartMenuItem(idx) {
                selected
            } else {
                base
            };
            let label = pad_to(&format!("{marker} {}", entry.label()), inner);
            frame.set_string(rect.x + 1, y, &label, style);
            self.item_rects.push(Rect::new(rect.x, y, rect.width, 1));
        }
        self.bounds = Some(rect);
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<MenuHit> {
        if !self.contains(column, row) {
            return None;
        }
        if self
            .close_rect
            .is_some_and(|r| rect_contains(r, column, row))
        {
            return Some(MenuHit::Close);
        }
        Some(
            self.item_rects
                .iter()
                .position(|r| rect_contains(*r, column, row))
                .map_or(MenuHit::Inside, MenuHit::Item),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::PanelKind;
    use ratatui::buffer::Buffer;

    fn apps() -> Vec<AppEntry> {
        ["countdown", "inspiration"]
            .iter()
            .map(|k| AppEntry {
                kind: PanelKind::new(*k),
                label: k.to_string(),
                icon: '*',
            })
            .collect()
    }

    #[test]
    fn lock_and_switch_follow_apps() {
        let menu = StartMenu::new(apps());
        assert_eq!(menu.len(), 4);
        assert_eq!(menu.entry(2), Some(&MenuEntry::Lock));
        assert_eq!(menu.entry(3), Some(&MenuEntry::SwitchView));
    }

    #[test]
    fn selection_wraps() {
        let mut menu = StartMenu::new(apps());
        assert_eq!(menu.select_delta(-1), 3);
        assert_eq!(menu.select_delta(1), 0);
    }

    #[test]
    fn renders_above_anchor_and_hit_tests() {
        let mut menu = StartMenu::new(apps());
        let area = Rect::new(0, 0, 40, 20);
        let anchor = Rect::new(0, 19, 9, 1);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            menu.render(&mut frame, anchor, area, FocusTarget::StartMenuItem(0));
        }
        let bounds = menu.bounds().expect("menu drawn");
        assert_eq!(bounds.y + bounds.height, 19);
        assert_eq!(menu.hit_test(bounds.x + 1, bounds.y + 1), Some(MenuHit::Item(0)));
        assert_eq!(
            menu.hit_test(bounds.x + bounds.width - 2, bounds.y),
            Some(MenuHit::Close)
        );
        assert_eq!(menu.hit_test(1, bounds.y), Some(MenuHit::Inside));
        assert_eq!(menu.hit_test(39, 0), None);
    }
}
