use crossterm::event::Event;
use ratatui::layout::Rect;

use crate::ui::UiFrame;

pub mod boot_screen;
pub mod clock_popup;
pub mod compact_home;
pub mod daily_widget;
pub mod desktop_icons;
pub mod hearts;
pub mod lock_screen;
pub mod start_menu;
pub mod sys;
pub mod taskbar;
pub mod toast;

pub use boot_screen::BootScreen;
pub use clock_popup::ClockPopup;
pub use compact_home::{CompactHome, HomeAction};
pub use daily_widget::{DailyWidget, WidgetAction};
pub use desktop_icons::DesktopIcons;
pub use hearts::HeartBurst;
pub use lock_screen::{LockKey, LockScreen, UnlockAttempt};
pub use start_menu::{MenuEntry, MenuHit, StartMenu};
pub use sys::*;
pub use taskbar::{Taskbar, TaskbarHit, TaskbarState};
pub use toast::Toast;

pub use crate::component_context::ComponentContext;

pub trait Component {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext);

    fn handle_event(&mut self, _event: &Event, _ctx: &ComponentContext) -> bool {
        false
    }
}

/// Left-aligned label that fits `width`, padded with spaces.
pub(crate) fn pad_to(label: &str, width: usize) -> String {
    let mut text = crate::ui::truncate_to_width(label, width);
    let len = text.chars().count();
    text.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    text
}

/// Label centred in `width` columns.
pub(crate) fn center_in(label: &str, width: usize) -> String {
    let text = crate::ui::truncate_to_width(label, width);
    let len = text.chars().count();
    let left = (width.saturating_sub(len)) / 2;
    pad_to(&format!("{}{text}", " ".repeat(left)), width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    struct DummyComp;
    impl Component for DummyComp {
        fn render(&mut self, _frame: &mut UiFrame<'_>, _area: Rect, _ctx: &ComponentContext) {}
    }

    #[test]
    fn default_handle_event_returns_false() {
        let mut d = DummyComp;
        assert!(!d.handle_event(
            &Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            &ComponentContext::default()
        ));
    }

    #[test]
    fn padding_helpers() {
        assert_eq!(pad_to("ab", 4), "ab  ");
        assert_eq!(pad_to("abcdef", 3), "abc");
        assert_eq!(center_in("ab", 6), "  ab  ");
    }
}
