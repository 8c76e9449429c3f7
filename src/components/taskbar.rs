use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};

use crate::clock;
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::{UiFrame, truncate_to_width};
use crate::window::PanelId;

const START_LABEL: &str = " ♥ Start ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarHit {
    StartButton,
    Panel(PanelId),
    Clock,
}

#[derive(Debug, Clone, Copy)]
struct PanelHit {
    id: PanelId,
    rect: Rect,
}

/// Bottom bar: start button, one chunk per open panel and the clock.
#[derive(Debug, Default)]
pub struct Taskbar {
    clock_label: String,
    start_rect: Option<Rect>,
    clock_rect: Option<Rect>,
    panel_hits: Vec<PanelHit>,
}

/// What the taskbar needs to know about the shell for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskbarState {
    pub focused: Option<PanelId>,
    pub start_open: bool,
    pub clock_open: bool,
    pub start_focused: bool,
    pub clock_focused: bool,
}

impl Taskbar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_clock(&mut self, now: DateTime<Utc>) {
        self.clock_label = clock::format_time_with_zone(now);
    }

    pub fn clock_label(&self) -> &str {
        &self.clock_label
    }

    pub fn start_rect(&self) -> Option<Rect> {
        self.start_rect
    }

    pub fn clock_rect(&self) -> Option<Rect> {
        self.clock_rect
    }

    pub fn render(
        &mut self,
        frame: &mut UiFrame<'_>,
        area: Rect,
        panels: &[(PanelId, String)],
        state: TaskbarState,
    ) {
        self.start_rect = None;
        self.clock_rect = None;
        self.panel_hits.clear();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = Style::default()
            .bg(theme::taskbar_bg())
            .fg(theme::taskbar_fg());
        let active = Style::default()
            .bg(theme::taskbar_active_bg())
            .fg(theme::taskbar_active_fg())
            .add_modifier(Modifier::BOLD);
        frame.set_string(area.x, area.y, &" ".repeat(area.width as usize), base);
        let max_x = area.x.saturating_add(area.width);

        let clock_text = format!(" {} ", self.clock_label);
        let clock_width = clock_text.chars().count() as u16;
        let clock_x = max_x.saturating_sub(clock_width).max(area.x);

        let mut x = area.x;
        let start_width = START_LABEL.chars().count() as u16;
        if x.saturating_add(start_width) <= clock_x {
            let style = if state.start_open || state.start_focused {
                active
            } else {
                base.fg(theme::accent()).add_modifier(Modifier::BOLD)
            };
            frame.set_string(x, area.y, START_LABEL, style);
            self.start_rect = Some(Rect::new(x, area.y, start_width, 1));
            x = x.saturating_add(start_width + 1);
        }

        for (id, title) in panels {
            let room = clock_x.saturating_sub(x).saturating_sub(3) as usize;
            if room == 0 {
                break;
            }
            let chunk = format!(" {} ", truncate_to_width(title, room.min(16)));
            let width = chunk.chars().count() as u16;
            if x.saturating_add(width) > clock_x {
                break;
            }
            let style = if state.focused == Some(*id) {
                active
            } else {
                base
            };
            frame.set_string(x, area.y, &chunk, style);
            self.panel_hits.push(PanelHit {
                id: *id,
                rect: Rect::new(x, area.y, width, 1),
            });
            x = x.saturating_add(width + 1);
        }

        if clock_width <= area.width {
            let style = if state.clock_open || state.clock_focused {
                active
            } else {
                base
            };
            frame.set_string(clock_x, area.y, &clock_text, style);
            self.clock_rect = Some(Rect::new(clock_x, area.y, clock_width, 1));
        }
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<TaskbarHit> {
        if self
            .start_rect
            .is_some_and(|r| rect_contains(r, column, row))
        {
            return Some(TaskbarHit::StartButton);
        }
        if self
            .clock_rect
            .is_some_and(|r| rect_contains(r, column, row))
        {
            return Some(TaskbarHit::Clock);
        }
        self.panel_hits
            .iter()
            .find(|hit| rect_contains(hit.rect, column, row))
            .map(|hit| TaskbarHit::Panel(hit.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ratatui::buffer::Buffer;

    fn rendered(bar: &mut Taskbar, panels: &[(PanelId, String)]) -> (Buffer, Rect) {
        let area = Rect::new(0, 0, 60, 1);
        let mut buffer = Buffer::empty(area);
        {
            let mut frame = UiFrame::from_parts(area, &mut buffer);
            bar.render(&mut frame, area, panels, TaskbarState::default());
        }
        (buffer, area)
    }

    #[test]
    fn clock_label_is_in_display_zone() {
        let mut bar = Taskbar::new();
        bar.update_clock(Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap());
        assert_eq!(bar.clock_label(), "09:30 AM IST");
    }

    #[test]
    fn hit_test_finds_start_panels_and_clock() {
        let mut bar = Taskbar::new();
        bar.update_clock(Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap());
        let panels = vec![
            (PanelId::new(1), "Countdown".to_string()),
            (PanelId::new(2), "Photos".to_string()),
        ];
        let (_buffer, area) = rendered(&mut bar, &panels);
        assert_eq!(bar.hit_test(0, 0), Some(TaskbarHit::StartButton));
        let first = START_LABEL.chars().count() as u16 + 1;
        assert_eq!(
            bar.hit_test(first, 0),
            Some(TaskbarHit::Panel(PanelId::new(1)))
        );
        assert_eq!(bar.hit_test(area.width - 1, 0), Some(TaskbarHit::Clock));
        assert_eq!(bar.hit_test(40, 0), None);
    }
}
