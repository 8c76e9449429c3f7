//! Vertical swipe-to-dismiss for sheets in the compact presentation.

use super::{PanelId, PanelVisual};
use crate::config::Metrics;
use crate::constants::SWIPE_MIN_OPACITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeSession {
    pub panel: PanelId,
    pub start_y: i32,
    pub delta_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeState {
    #[default]
    Idle,
    Tracking(SwipeSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeEvent {
    Touch { panel: PanelId, y: i32 },
    Move { y: i32 },
    Lift,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeEffect {
    None,
    Visual { panel: PanelId, visual: PanelVisual },
    Dismiss(PanelId),
    Restore(PanelId),
}

/// Presentation for a downward travel of `delta_y`. Upward travel maps to the
/// resting state.
pub fn visual_for(delta_y: i32, metrics: &Metrics) -> PanelVisual {
    if delta_y <= 0 {
        return PanelVisual::REST;
    }
    let fade = metrics.swipe_fade_distance.max(1) as f32;
    PanelVisual {
        offset_y: delta_y.min(metrics.swipe_max_offset),
        opacity: (1.0 - delta_y as f32 / fade).max(SWIPE_MIN_OPACITY),
    }
}

pub fn transition(
    state: SwipeState,
    event: SwipeEvent,
    metrics: &Metrics,
) -> (SwipeState, SwipeEffect) {
    match (state, event) {
        (SwipeState::Idle, SwipeEvent::Touch { panel, y }) => (
            SwipeState::Tracking(SwipeSession {
                panel,
                start_y: y,
                delta_y: 0,
            }),
            SwipeEffect::None,
        ),
        (SwipeState::Idle, _) => (SwipeState::Idle, SwipeEffect::None),
        (SwipeState::Tracking(mut session), SwipeEvent::Move { y }) => {
            session.delta_y = y.saturating_sub(session.start_y);
            (
                SwipeState::Tracking(session),
                SwipeEffect::Visual {
                    panel: session.panel,
                    visual: visual_for(session.delta_y, metrics),
                },
            )
        }
        (SwipeState::Tracking(session), SwipeEvent::Lift) => {
            if session.delta_y > metrics.swipe_dismiss {
                (SwipeState::Idle, SwipeEffect::Dismiss(session.panel))
            } else {
                (SwipeState::Idle, SwipeEffect::Restore(session.panel))
            }
        }
        (state @ SwipeState::Tracking(_), SwipeEvent::Touch { .. }) => (state, SwipeEffect::None),
    }
}

#[derive(Debug, Default)]
pub struct SwipeController {
    state: SwipeState,
}

impl SwipeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SwipeState {
        self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, SwipeState::Tracking(_))
    }

    pub fn handle(&mut self, event: SwipeEvent, metrics: &Metrics) -> SwipeEffect {
        let (next, effect) = transition(self.state, event, metrics);
        self.state = next;
        match effect {
            SwipeEffect::Dismiss(panel) => tracing::debug!(panel = %panel, "swipe dismissed"),
            SwipeEffect::Restore(panel) => tracing::debug!(panel = %panel, "swipe snapped back"),
            _ => {}
        }
        effect
    }

    /// Forget a session bound to a panel that has been closed elsewhere.
    pub fn abort_for(&mut self, panel: PanelId) {
        if let SwipeState::Tracking(session) = self.state
            && session.panel == panel
        {
            self.state = SwipeState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: PanelId = PanelId::new(4);

    fn swipe(distance: i32) -> SwipeEffect {
        let m = Metrics::reference();
        let mut swipe = SwipeController::new();
        swipe.handle(SwipeEvent::Touch { panel: SHEET, y: 300 }, &m);
        swipe.handle(SwipeEvent::Move { y: 300 + distance }, &m);
        swipe.handle(SwipeEvent::Lift, &m)
    }

    #[test]
    fn threshold_is_exclusive() {
        assert_eq!(swipe(121), SwipeEffect::Dismiss(SHEET));
        assert_eq!(swipe(120), SwipeEffect::Restore(SHEET));
        assert_eq!(swipe(119), SwipeEffect::Restore(SHEET));
    }

    #[test]
    fn upward_swipe_restores() {
        assert_eq!(swipe(-400), SwipeEffect::Restore(SHEET));
    }

    #[test]
    fn visual_caps_offset_and_floors_opacity() {
        let m = Metrics::reference();
        let v = visual_for(60, &m);
        assert_eq!(v.offset_y, 60);
        assert!((v.opacity - 0.8).abs() < 1e-6);

        let v = visual_for(180, &m);
        assert_eq!(v.offset_y, 120);
        assert!((v.opacity - 0.4).abs() < 1e-6);

        let v = visual_for(900, &m);
        assert_eq!(v.offset_y, 120);
        assert!((v.opacity - SWIPE_MIN_OPACITY).abs() < 1e-6);

        assert_eq!(visual_for(-30, &m), PanelVisual::REST);
    }

    #[test]
    fn moves_without_touch_are_ignored() {
        let m = Metrics::reference();
        let mut swipe = SwipeController::new();
        assert_eq!(swipe.handle(SwipeEvent::Move { y: 10 }, &m), SwipeEffect::None);
        assert_eq!(swipe.handle(SwipeEvent::Lift, &m), SwipeEffect::None);
    }

    #[test]
    fn abort_clears_matching_session() {
        let m = Metrics::reference();
        let mut swipe = SwipeController::new();
        swipe.handle(SwipeEvent::Touch { panel: SHEET, y: 0 }, &m);
        swipe.abort_for(PanelId::new(99));
        assert!(swipe.is_tracking());
        swipe.abort_for(SHEET);
        assert!(!swipe.is_tracking());
    }
}
