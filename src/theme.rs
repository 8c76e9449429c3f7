use ratatui::style::Color;

// Centralized theme colors. Keep these as small helpers so we can
// map RGB to the terminal-supported color via `crate::term_color` when
// appropriate.

pub const ACCENT_RGB: (u8, u8, u8) = (255, 105, 180);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (186, 148, 255);
pub const DESKTOP_RGB: (u8, u8, u8) = (58, 24, 60);
pub const PANEL_RGB: (u8, u8, u8) = (255, 240, 246);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    crate::term_color::map_rgb_to_color(rgb.0, rgb.1, rgb.2)
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

pub fn desktop_bg() -> Color {
    rgb_to_color(DESKTOP_RGB)
}
pub fn desktop_fg() -> Color {
    Color::White
}

// Panels
pub fn panel_bg() -> Color {
    rgb_to_color(PANEL_RGB)
}
pub fn panel_fg() -> Color {
    Color::Black
}
pub fn panel_border() -> Color {
    accent()
}
pub fn title_bg() -> Color {
    Color::DarkGray
}
pub fn title_focused_bg() -> Color {
    accent()
}
pub fn title_fg() -> Color {
    Color::White
}

// Taskbar
pub fn taskbar_bg() -> Color {
    Color::Black
}
pub fn taskbar_fg() -> Color {
    Color::White
}
pub fn taskbar_active_bg() -> Color {
    accent()
}
pub fn taskbar_active_fg() -> Color {
    Color::Black
}

// Menu
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    accent_alt()
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}

// Dialog / lock screen
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}
pub fn error_fg() -> Color {
    Color::LightRed
}

// Toast
pub fn toast_bg() -> Color {
    accent()
}
pub fn toast_fg() -> Color {
    Color::Black
}

// Debug log highlight
pub fn debug_highlight() -> Color {
    accent_alt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn accent_returns_a_color_variant() {
        match accent() {
            Color::Rgb(_, _, _) | Color::Indexed(_) => {}
            other => panic!("unexpected color variant {other:?}"),
        }
    }

    #[test]
    fn panel_and_desktop_differ() {
        assert_ne!(panel_bg(), desktop_bg());
    }
}
