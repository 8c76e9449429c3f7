use super::{Point, Size, Viewport};

/// Space a dragged panel may occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragBounds {
    pub viewport: Viewport,
    pub panel: Size,
    /// Bottom strip reserved for the taskbar.
    pub taskbar_height: i32,
}

impl DragBounds {
    pub fn new(viewport: Viewport, panel: Size, taskbar_height: i32) -> Self {
        Self {
            viewport,
            panel,
            taskbar_height,
        }
    }

    pub fn max_x(&self) -> i32 {
        (self.viewport.width - self.panel.width).max(0)
    }

    pub fn max_y(&self) -> i32 {
        (self.viewport.height - self.panel.height - self.taskbar_height).max(0)
    }
}

/// Clamp a candidate panel origin so the panel stays fully on screen and
/// clear of the taskbar.
///
/// X is limited to `[0, viewport.width - panel.width]` and Y to
/// `[0, viewport.height - panel.height - taskbar_height]`. When the panel is
/// larger than the available space the upper limit collapses to zero.
pub fn clamp_to_viewport(candidate: Point, bounds: &DragBounds) -> Point {
    Point::new(
        candidate.x.clamp(0, bounds.max_x()),
        candidate.y.clamp(0, bounds.max_y()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> DragBounds {
        DragBounds::new(Size::new(1000, 800), Size::new(450, 350), 50)
    }

    #[test]
    fn inside_is_untouched() {
        assert_eq!(
            clamp_to_viewport(Point::new(120, 40), &bounds()),
            Point::new(120, 40)
        );
    }

    #[test]
    fn clamps_every_edge() {
        let b = bounds();
        assert_eq!(clamp_to_viewport(Point::new(-30, -5), &b), Point::new(0, 0));
        assert_eq!(
            clamp_to_viewport(Point::new(5000, 5000), &b),
            Point::new(550, 400)
        );
    }

    #[test]
    fn oversized_panel_collapses_to_origin() {
        let b = DragBounds::new(Size::new(300, 200), Size::new(450, 350), 50);
        assert_eq!(clamp_to_viewport(Point::new(40, 40), &b), Point::new(0, 0));
    }
}
