use ratatui::style::Color;

/// Map an RGB triple to a `ratatui::style::Color` the terminal can show.
/// Truecolor terminals (`COLORTERM` containing `truecolor` or `24bit`) get
/// `Color::Rgb`; everything else gets the nearest xterm-256 index.
pub fn map_rgb_to_color(r: u8, g: u8, b: u8) -> Color {
    let truecolor = std::env::var("COLORTERM")
        .map(|value| {
            let value = value.to_lowercase();
            value.contains("truecolor") || value.contains("24bit")
        })
        .unwrap_or(false);
    if truecolor {
        Color::Rgb(r, g, b)
    } else {
        Color::Indexed(xterm_index(r, g, b))
    }
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn xterm_index(r: u8, g: u8, b: u8) -> u8 {
    let (r6, g6, b6) = (cube_step(r), cube_step(g), cube_step(b));
    let cube = (
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let gray_step = gray_step(r, g, b);
    let gray_level = 8 + gray_step * 10;
    let gray = (gray_level, gray_level, gray_level);

    if distance_sq((r, g, b), gray) < distance_sq((r, g, b), cube) {
        232 + gray_step
    } else {
        16 + 36 * r6 + 6 * g6 + b6
    }
}

fn cube_step(v: u8) -> u8 {
    ((v as u16 * 5 + 127) / 255) as u8
}

fn gray_step(r: u8, g: u8, b: u8) -> u8 {
    let avg = (r as u16 + g as u16 + b as u16) / 3;
    ((avg * 23 + 127) / 255) as u8
}

fn distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| {
        let v = x as i32 - y as i32;
        (v * v) as u32
    };
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}
