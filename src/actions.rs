use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Quit,
    /// Close the start menu, the clock popup and the topmost panel.
    Escape,
    // Focus/tab navigation
    FocusNext,
    FocusPrev,
    // Shell overlays
    ToggleStartMenu,
    ToggleClockPopup,
    ToggleDebugLog,
    // Start menu navigation
    MenuUp,
    MenuDown,
    MenuSelect,
}

impl Action {
    /// Actions that fire even while a panel has focus.
    pub fn is_global(self) -> bool {
        matches!(
            self,
            Action::Quit
                | Action::Escape
                | Action::FocusNext
                | Action::FocusPrev
                | Action::ToggleDebugLog
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::Escape => "Close menus and topmost panel (Esc)",
            Action::FocusNext => "Focus next (Tab)",
            Action::FocusPrev => "Focus previous (BackTab)",
            Action::ToggleStartMenu => "Toggle start menu",
            Action::ToggleClockPopup => "Toggle clock popup",
            Action::ToggleDebugLog => "Toggle debug log",
            Action::MenuUp => "Menu up",
            Action::MenuDown => "Menu down",
            Action::MenuSelect => "Menu select",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_navigation_is_not_global() {
        assert!(Action::Escape.is_global());
        assert!(!Action::MenuUp.is_global());
        assert!(!Action::ToggleStartMenu.is_global());
    }
}
