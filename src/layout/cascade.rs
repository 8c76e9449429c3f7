//! Cascade placement for newly opened panels.
//!
//! Each new panel is shifted diagonally by a fixed step per panel already
//! open, wrapping back to the origin after `cascade_wrap`. The cascade does
//! not try to avoid overlaps once it wraps; with the reference metrics the
//! eighth panel lands on top of the first.

use super::{Point, Viewport};
use crate::config::Metrics;

/// Compute the top-left corner for a panel opened while `open_count` panels
/// are already open.
///
/// The result keeps the assumed panel footprint inside the viewport, above
/// the taskbar strip. Placement prefers to leave `edge_margin` free on the
/// right and bottom; when the viewport is too small for the margin the panel
/// is pushed flush against the edge instead, and when the viewport is smaller
/// than the footprint the panel is pinned to the origin.
pub fn place_new_panel(open_count: usize, viewport: Viewport, metrics: &Metrics) -> Point {
    let wrap = metrics.cascade_wrap.max(1) as i64;
    let offset = ((open_count as i64).saturating_mul(metrics.cascade_step as i64) % wrap) as i32;
    let start = metrics.cascade_origin.saturating_add(offset);
    let footprint = metrics.panel_size;

    let max_left = viewport.width - footprint.width - metrics.edge_margin;
    let max_top =
        viewport.height - footprint.height - metrics.taskbar_height - metrics.edge_margin;
    let left = start.min(metrics.edge_margin.max(max_left));
    let top = start.min(metrics.edge_margin.max(max_top));

    let hard_left = (viewport.width - footprint.width).max(0);
    let hard_top = (viewport.height - footprint.height - metrics.taskbar_height).max(0);
    Point::new(left.clamp(0, hard_left), top.clamp(0, hard_top))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Size;

    fn desktop() -> Viewport {
        Size::new(1440, 900)
    }

    #[test]
    fn first_panel_sits_at_origin() {
        let m = Metrics::reference();
        assert_eq!(place_new_panel(0, desktop(), &m), Point::new(50, 50));
    }

    #[test]
    fn cascade_steps_then_wraps() {
        let m = Metrics::reference();
        assert_eq!(place_new_panel(1, desktop(), &m), Point::new(80, 80));
        assert_eq!(place_new_panel(6, desktop(), &m), Point::new(230, 230));
        // 7 * 30 = 210, 210 % 200 = 10
        assert_eq!(place_new_panel(7, desktop(), &m), Point::new(60, 60));
    }

    #[test]
    fn clamps_against_margin_on_tight_viewport() {
        let m = Metrics::reference();
        // max_left = 520 - 450 - 20 = 50, max_top = 480 - 350 - 50 - 20 = 60
        let p = place_new_panel(3, Size::new(520, 480), &m);
        assert_eq!(p, Point::new(50, 60));
    }

    #[test]
    fn margin_yields_to_hard_bounds() {
        let m = Metrics::reference();
        // 460 - 450 = 10 < margin of 20
        let p = place_new_panel(2, Size::new(460, 420), &m);
        assert_eq!(p, Point::new(10, 20));
    }

    #[test]
    fn tiny_viewport_pins_to_origin() {
        let m = Metrics::reference();
        assert_eq!(place_new_panel(4, Size::new(200, 100), &m), Point::new(0, 0));
    }

    #[test]
    fn placement_is_pure() {
        let m = Metrics::cells();
        let vp = Size::new(120, 40);
        for count in 0..32 {
            assert_eq!(
                place_new_panel(count, vp, &m),
                place_new_panel(count, vp, &m)
            );
        }
    }

    #[test]
    fn always_within_bounds_for_many_viewports() {
        let m = Metrics::reference();
        for width in (450..2000).step_by(37) {
            for height in (400..1400).step_by(53) {
                let vp = Size::new(width, height);
                for count in 0..20 {
                    let p = place_new_panel(count, vp, &m);
                    assert!(p.x >= 0 && p.x <= width - 450, "{p:?} in {vp:?}");
                    assert!(p.y >= 0 && p.y <= height - 350 - 50, "{p:?} in {vp:?}");
                }
            }
        }
    }
}
