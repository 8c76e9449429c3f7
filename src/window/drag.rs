//! Title-bar dragging.
//!
//! The controller is a pure transition function over [`DragState`]. Callers
//! feed pointer events and apply the returned [`DragEffect`] to the registry.
//! One drag may be active at a time across all panels.

use super::PanelId;
use crate::layout::{DragBounds, Point, clamp_to_viewport};

/// Part of a panel frame that received a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabTarget {
    TitleBar,
    CloseControl,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub panel: PanelId,
    /// Pointer position minus the panel's top-left at drag start.
    pub grab_offset: Point,
    /// Panel position when the session began.
    pub start_position: Point,
    /// Last clamped position applied.
    pub current: Point,
    pub bounds: DragBounds,
}

impl DragSession {
    /// Total displacement since the session started.
    pub fn delta(&self) -> Point {
        self.current.minus(self.start_position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEvent {
    Press {
        panel: PanelId,
        target: GrabTarget,
        pointer: Point,
        panel_position: Point,
        bounds: DragBounds,
    },
    Move {
        pointer: Point,
    },
    /// Pointer-up, touch-end or touch-cancel, wherever the pointer is.
    Release,
    /// The dragged panel went away mid-gesture.
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEffect {
    None,
    Started(PanelId),
    MoveTo { panel: PanelId, position: Point },
    Finished { panel: PanelId, position: Point },
}

pub fn transition(state: DragState, event: DragEvent) -> (DragState, DragEffect) {
    match (state, event) {
        (
            DragState::Idle,
            DragEvent::Press {
                panel,
                target: GrabTarget::TitleBar,
                pointer,
                panel_position,
                bounds,
            },
        ) => {
            let session = DragSession {
                panel,
                grab_offset: pointer.minus(panel_position),
                start_position: panel_position,
                current: panel_position,
                bounds,
            };
            (DragState::Dragging(session), DragEffect::Started(panel))
        }
        (DragState::Idle, _) => (DragState::Idle, DragEffect::None),
        (DragState::Dragging(mut session), DragEvent::Move { pointer }) => {
            let candidate = pointer.minus(session.grab_offset);
            session.current = clamp_to_viewport(candidate, &session.bounds);
            (
                DragState::Dragging(session),
                DragEffect::MoveTo {
                    panel: session.panel,
                    position: session.current,
                },
            )
        }
        (DragState::Dragging(session), DragEvent::Release) => (
            DragState::Idle,
            DragEffect::Finished {
                panel: session.panel,
                position: session.current,
            },
        ),
        (DragState::Dragging(_), DragEvent::Abort) => (DragState::Idle, DragEffect::None),
        // a second press while a drag is live belongs to no one
        (state @ DragState::Dragging(_), DragEvent::Press { .. }) => (state, DragEffect::None),
    }
}

/// Holds the global drag state and feeds it through [`transition`].
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn active_panel(&self) -> Option<PanelId> {
        match self.state {
            DragState::Dragging(session) => Some(session.panel),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn handle(&mut self, event: DragEvent) -> DragEffect {
        let (next, effect) = transition(self.state, event);
        self.state = next;
        match effect {
            DragEffect::Started(panel) => tracing::debug!(panel = %panel, "drag started"),
            DragEffect::Finished { panel, position } => {
                tracing::debug!(panel = %panel, x = position.x, y = position.y, "drag finished")
            }
            _ => {}
        }
        effect
    }

    /// Drop a session bound to `panel` without emitting a final move.
    pub fn abort_for(&mut self, panel: PanelId) {
        if self.active_panel() == Some(panel) {
            self.handle(DragEvent::Abort);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Size;

    fn bounds() -> DragBounds {
        DragBounds::new(Size::new(1000, 800), Size::new(450, 350), 50)
    }

    fn press(target: GrabTarget) -> DragEvent {
        DragEvent::Press {
            panel: PanelId::new(1),
            target,
            pointer: Point::new(110, 60),
            panel_position: Point::new(100, 50),
            bounds: bounds(),
        }
    }

    #[test]
    fn title_bar_press_starts_session() {
        let (state, effect) = transition(DragState::Idle, press(GrabTarget::TitleBar));
        assert_eq!(effect, DragEffect::Started(PanelId::new(1)));
        let DragState::Dragging(session) = state else {
            panic!("expected dragging");
        };
        assert_eq!(session.grab_offset, Point::new(10, 10));
    }

    #[test]
    fn close_control_and_body_do_not_start() {
        for target in [GrabTarget::CloseControl, GrabTarget::Body] {
            let (state, effect) = transition(DragState::Idle, press(target));
            assert_eq!(state, DragState::Idle);
            assert_eq!(effect, DragEffect::None);
        }
    }

    #[test]
    fn moves_follow_pointer_minus_grab_offset() {
        let mut drag = DragController::new();
        drag.handle(press(GrabTarget::TitleBar));
        let effect = drag.handle(DragEvent::Move {
            pointer: Point::new(210, 160),
        });
        assert_eq!(
            effect,
            DragEffect::MoveTo {
                panel: PanelId::new(1),
                position: Point::new(200, 150)
            }
        );
    }

    #[test]
    fn moves_are_clamped_to_the_viewport() {
        let mut drag = DragController::new();
        drag.handle(press(GrabTarget::TitleBar));
        for (pointer, expected) in [
            (Point::new(-500, -500), Point::new(0, 0)),
            (Point::new(5000, 5000), Point::new(550, 400)),
            (Point::new(5000, -5), Point::new(550, 0)),
        ] {
            let effect = drag.handle(DragEvent::Move { pointer });
            assert_eq!(
                effect,
                DragEffect::MoveTo {
                    panel: PanelId::new(1),
                    position: expected
                }
            );
        }
    }

    #[test]
    fn release_ends_session_with_last_position() {
        let mut drag = DragController::new();
        drag.handle(press(GrabTarget::TitleBar));
        drag.handle(DragEvent::Move {
            pointer: Point::new(20, 20),
        });
        let effect = drag.handle(DragEvent::Release);
        assert_eq!(
            effect,
            DragEffect::Finished {
                panel: PanelId::new(1),
                position: Point::new(10, 10)
            }
        );
        assert!(!drag.is_dragging());
        assert_eq!(drag.handle(DragEvent::Release), DragEffect::None);
    }

    #[test]
    fn second_press_is_ignored_while_dragging() {
        let mut drag = DragController::new();
        drag.handle(press(GrabTarget::TitleBar));
        let other = DragEvent::Press {
            panel: PanelId::new(2),
            target: GrabTarget::TitleBar,
            pointer: Point::new(0, 0),
            panel_position: Point::new(0, 0),
            bounds: bounds(),
        };
        assert_eq!(drag.handle(other), DragEffect::None);
        assert_eq!(drag.active_panel(), Some(PanelId::new(1)));
    }

    #[test]
    fn abort_for_other_panel_keeps_session() {
        let mut drag = DragController::new();
        drag.handle(press(GrabTarget::TitleBar));
        drag.abort_for(PanelId::new(9));
        assert!(drag.is_dragging());
        drag.abort_for(PanelId::new(1));
        assert!(!drag.is_dragging());
    }
}
