//! Geometry primitives shared by placement, dragging and hit testing.
//!
//! The windowing core works in signed, unit-agnostic coordinates so the same
//! rules apply to pixel metrics and to terminal cells. Conversion to
//! `ratatui::Rect` only happens at the rendering edge.

pub mod cascade;
pub mod floating;

pub use cascade::place_new_panel;
pub use floating::{DragBounds, clamp_to_viewport};

use ratatui::prelude::Rect;
use std::collections::BTreeMap;

/// Top-left position of a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    pub fn minus(self, other: Point) -> Self {
        Self {
            x: self.x.saturating_sub(other.x),
            y: self.y.saturating_sub(other.y),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn from_rect(rect: Rect) -> Self {
        Self {
            width: rect.width as i32,
            height: rect.height as i32,
        }
    }
}

/// Viewport dimensions; the origin is always (0, 0).
pub type Viewport = Size;

/// Convert a signed panel rectangle to the visible part of `bounds`.
///
/// Returns `None` when nothing of the panel is on screen.
pub fn visible_rect(origin: Point, size: Size, bounds: Rect) -> Option<Rect> {
    let x0 = origin.x.max(bounds.x as i32);
    let y0 = origin.y.max(bounds.y as i32);
    let x1 = origin
        .x
        .saturating_add(size.width)
        .min(bounds.x as i32 + bounds.width as i32);
    let y1 = origin
        .y
        .saturating_add(size.height)
        .min(bounds.y as i32 + bounds.height as i32);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(Rect {
        x: x0 as u16,
        y: y0 as u16,
        width: (x1 - x0) as u16,
        height: (y1 - y0) as u16,
    })
}

/// Screen regions recorded during the last draw, used to route mouse input.
#[derive(Debug, Clone)]
pub struct RegionMap<T: Copy + Eq + Ord> {
    regions: BTreeMap<T, Rect>,
}

impl<T: Copy + Eq + Ord> Default for RegionMap<T> {
    fn default() -> Self {
        Self {
            regions: BTreeMap::new(),
        }
    }
}

impl<T: Copy + Eq + Ord> RegionMap<T> {
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn set(&mut self, id: T, rect: Rect) {
        self.regions.insert(id, rect);
    }

    pub fn get(&self, id: T) -> Option<Rect> {
        self.regions.get(&id).copied()
    }

    pub fn remove(&mut self, id: T) {
        self.regions.remove(&id);
    }

    /// Return the first id in `ids` whose region contains the point.
    ///
    /// Callers pass ids topmost-first so overlapping regions resolve to the
    /// one drawn last.
    pub fn hit_test(&self, column: u16, row: u16, ids: &[T]) -> Option<T> {
        ids.iter().copied().find(|id| {
            self.regions
                .get(id)
                .is_some_and(|rect| rect_contains(*rect, column, row))
        })
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}
