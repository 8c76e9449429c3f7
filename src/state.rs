//! Overlay visibility and keyboard focus.
//!
//! The lock screen, start menu and clock popup each have one visibility flag.
//! While locked, the two popups report closed and refuse to open.

use crate::window::{Panel, PanelId, PanelRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayId {
    StartMenu,
    ClockPopup,
}

/// Element that currently holds keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Desktop,
    StartButton,
    ClockButton,
    StartMenuItem(usize),
    StartMenuClose,
    ClockPopupClose,
    PinInput,
    Panel(PanelId),
}

impl OverlayId {
    /// Control that opens the overlay and gets focus back when it closes.
    pub fn trigger(self) -> FocusTarget {
        match self {
            Self::StartMenu => FocusTarget::StartButton,
            Self::ClockPopup => FocusTarget::ClockButton,
        }
    }
}

/// Focus candidates of an overlay in preference order. The trigger is the
/// final fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Landing {
    pub first_item: Option<FocusTarget>,
    pub close_control: Option<FocusTarget>,
}

impl Landing {
    pub fn start_menu(item_count: usize) -> Self {
        Self {
            first_item: (item_count > 0).then_some(FocusTarget::StartMenuItem(0)),
            close_control: Some(FocusTarget::StartMenuClose),
        }
    }

    pub fn clock_popup() -> Self {
        Self {
            first_item: None,
            close_control: Some(FocusTarget::ClockPopupClose),
        }
    }
}

/// Where a pointer press landed, relative to the popups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickScope {
    pub on_start_button: bool,
    pub in_start_menu: bool,
    pub on_clock_button: bool,
    pub in_clock_popup: bool,
}

/// Everything a single Escape press dismissed.
#[derive(Debug, Default)]
pub struct Dismissals {
    pub start_menu: bool,
    pub clock_popup: bool,
    pub panel: Option<Panel>,
}

impl Dismissals {
    pub fn is_empty(&self) -> bool {
        !self.start_menu && !self.clock_popup && self.panel.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    start_menu: bool,
    clock_popup: bool,
    locked: bool,
    debug_log_visible: bool,
    focus: FocusTarget,
    changed: bool,
}

impl OverlayState {
    pub fn new(locked: bool) -> Self {
        Self {
            locked,
            focus: if locked {
                FocusTarget::PinInput
            } else {
                FocusTarget::Desktop
            },
            ..Self::default()
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_open(&self, overlay: OverlayId) -> bool {
        if self.locked {
            return false;
        }
        match overlay {
            OverlayId::StartMenu => self.start_menu,
            OverlayId::ClockPopup => self.clock_popup,
        }
    }

    pub fn focus(&self) -> FocusTarget {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FocusTarget) {
        if self.focus != focus {
            self.focus = focus;
            self.changed = true;
        }
    }

    fn flag_mut(&mut self, overlay: OverlayId) -> &mut bool {
        match overlay {
            OverlayId::StartMenu => &mut self.start_menu,
            OverlayId::ClockPopup => &mut self.clock_popup,
        }
    }

    /// Flip an overlay. Returns the new visibility, or `None` when refused
    /// because the lock screen is up.
    pub fn toggle(&mut self, overlay: OverlayId, landing: Landing) -> Option<bool> {
        if self.locked {
            tracing::debug!(overlay = ?overlay, "toggle refused while locked");
            return None;
        }
        let visible = !*self.flag_mut(overlay);
        if visible {
            *self.flag_mut(overlay) = true;
            self.changed = true;
            let focus = landing
                .first_item
                .or(landing.close_control)
                .unwrap_or(overlay.trigger());
            self.set_focus(focus);
            tracing::debug!(overlay = ?overlay, "overlay opened");
        } else {
            self.close(overlay);
        }
        Some(visible)
    }

    /// Hide an overlay and return focus to its trigger. No-op when hidden.
    pub fn close(&mut self, overlay: OverlayId) -> bool {
        let flag = self.flag_mut(overlay);
        if !*flag {
            return false;
        }
        *flag = false;
        self.changed = true;
        self.set_focus(overlay.trigger());
        tracing::debug!(overlay = ?overlay, "overlay closed");
        true
    }

    /// Close popups the press landed outside of. Returns the ones closed.
    pub fn click_outside(&mut self, scope: ClickScope) -> Vec<OverlayId> {
        let mut closed = Vec::new();
        if self.locked {
            return closed;
        }
        if !scope.on_start_button && !scope.in_start_menu && self.close(OverlayId::StartMenu) {
            closed.push(OverlayId::StartMenu);
        }
        if !scope.on_clock_button && !scope.in_clock_popup && self.close(OverlayId::ClockPopup) {
            closed.push(OverlayId::ClockPopup);
        }
        closed
    }

    /// Escape: start menu, then clock popup, then the topmost panel. All
    /// three run on the same press. Nothing happens while locked.
    pub fn escape(&mut self, registry: &mut PanelRegistry) -> Dismissals {
        if self.locked {
            return Dismissals::default();
        }
        let dismissals = Dismissals {
            start_menu: self.close(OverlayId::StartMenu),
            clock_popup: self.close(OverlayId::ClockPopup),
            panel: registry.close_topmost(),
        };
        if let Some(panel) = &dismissals.panel {
            if self.focus == FocusTarget::Panel(panel.id()) {
                self.set_focus(FocusTarget::Desktop);
            }
            self.changed = true;
        }
        dismissals
    }

    /// Show the lock screen, hiding both popups.
    pub fn lock(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.start_menu = false;
        self.clock_popup = false;
        self.locked = true;
        self.changed = true;
        self.set_focus(FocusTarget::PinInput);
        tracing::debug!("locked");
        true
    }

    /// Hide the lock screen. Redundant unlocks return false.
    pub fn unlock(&mut self) -> bool {
        if !self.locked {
            return false;
        }
        self.locked = false;
        self.changed = true;
        self.set_focus(FocusTarget::Desktop);
        tracing::debug!("unlocked");
        true
    }

    pub fn debug_log_visible(&self) -> bool {
        self.debug_log_visible
    }

    pub fn toggle_debug_log_visible(&mut self) {
        self.debug_log_visible = !self.debug_log_visible;
        self.changed = true;
    }

    /// Forget focus on a panel that is going away.
    pub fn panel_closed(&mut self, id: PanelId) {
        if self.focus == FocusTarget::Panel(id) {
            self.set_focus(FocusTarget::Desktop);
        }
    }

    pub fn take_change(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }
}
