use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Paragraph, Wrap};

use super::PanelContent;
use crate::components::{Component, ComponentContext, center_in};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

/// Shows one randomly picked reason per button press.
#[derive(Debug)]
pub struct ReasonsContent {
    reasons: Vec<String>,
    shown: Option<usize>,
    rng: StdRng,
    button_rect: Option<Rect>,
}

impl ReasonsContent {
    pub fn new(reasons: Vec<String>) -> Self {
        Self::with_rng(reasons, StdRng::from_entropy())
    }

    pub fn with_rng(reasons: Vec<String>, rng: StdRng) -> Self {
        Self {
            reasons,
            shown: None,
            rng,
            button_rect: None,
        }
    }

    pub fn shown(&self) -> Option<&str> {
        self.shown
            .and_then(|idx| self.reasons.get(idx))
            .map(String::as_str)
    }

    /// Pick a reason at random. Returns false when there are none.
    pub fn shuffle(&mut self) -> bool {
        let indices: Vec<usize> = (0..self.reasons.len()).collect();
        match indices.choose(&mut self.rng) {
            Some(idx) => {
                self.shown = Some(*idx);
                true
            }
            None => false,
        }
    }

    fn button_label(&self) -> &'static str {
        if self.shown.is_some() {
            "[ Show me another ]"
        } else {
            "[ Show me a reason ]"
        }
    }
}

impl Component for ReasonsContent {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, _ctx: &ComponentContext) {
        self.button_rect = None;
        if area.height < 2 {
            return;
        }
        let base = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        let text = self
            .shown()
            .map(|r| format!("♥ {r}"))
            .unwrap_or_else(|| format!("{} reasons you're awesome", self.reasons.len()));
        let body = Rect {
            y: area.y.saturating_add(1),
            height: area.height.saturating_sub(3),
            ..area
        };
        frame.render_widget(
            Paragraph::new(text)
                .style(base.add_modifier(Modifier::BOLD))
                .centered()
                .wrap(Wrap { trim: true }),
            body,
        );

        let label = self.button_label();
        let y = area.y.saturating_add(area.height).saturating_sub(1);
        let width = area.width as usize;
        let line = center_in(label, width);
        let offset = line.chars().take_while(|c| *c == ' ').count() as u16;
        frame.set_string(area.x, y, &line, base);
        let label_rect = Rect {
            x: area.x.saturating_add(offset),
            y,
            width: label.chars().count() as u16,
            height: 1,
        };
        frame.fill_style(
            label_rect,
            Style::default().bg(theme::accent()).fg(theme::toast_fg()),
        );
        self.button_rect = Some(label_rect);
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                matches!(key.code, KeyCode::Enter | KeyCode::Char('r')) && self.shuffle()
            }
            Event::Mouse(mouse)
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) =>
            {
                self.button_rect
                    .is_some_and(|r| rect_contains(r, mouse.column, mouse.row))
                    && self.shuffle()
            }
            _ => false,
        }
    }
}

impl PanelContent for ReasonsContent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_picks_an_existing_reason() {
        let reasons = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut content = ReasonsContent::with_rng(reasons.clone(), StdRng::seed_from_u64(7));
        assert!(content.shown().is_none());
        for _ in 0..10 {
            assert!(content.shuffle());
            let shown = content.shown().expect("a reason");
            assert!(reasons.iter().any(|r| r == shown));
        }
    }

    #[test]
    fn shuffle_without_reasons_is_a_no_op() {
        let mut content = ReasonsContent::with_rng(Vec::new(), StdRng::seed_from_u64(1));
        assert!(!content.shuffle());
        assert!(content.shown().is_none());
    }
}
