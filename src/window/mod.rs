pub mod decorator;
pub mod drag;
pub mod registry;
pub mod swipe;

mod window_manager;

use std::fmt;

use crate::layout::{Point, Size};

pub use drag::{DragController, DragEffect, DragEvent, DragSession, DragState, GrabTarget};
pub use registry::PanelRegistry;
pub use swipe::{SwipeController, SwipeEffect, SwipeEvent, SwipeSession, SwipeState};
pub use window_manager::{ClickTarget, WindowManager};

/// Identity of an open panel. Allocated from a monotonic counter and never
/// reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelId(u64);

impl PanelId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque content-type tag such as `"countdown"` or `"open-when"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PanelKind(String);

impl PanelKind {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human title derived from the tag: `"open-when"` becomes `"open when"`.
    pub fn title(&self) -> String {
        self.0.replace('-', " ")
    }
}

impl From<&str> for PanelKind {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Open,
    Closed,
}

/// Transient presentation state applied on top of a panel's position, used
/// by the swipe gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelVisual {
    pub offset_y: i32,
    pub opacity: f32,
}

impl PanelVisual {
    pub const REST: PanelVisual = PanelVisual {
        offset_y: 0,
        opacity: 1.0,
    };

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }
}

impl Default for PanelVisual {
    fn default() -> Self {
        Self::REST
    }
}

/// One open window or sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    id: PanelId,
    kind: PanelKind,
    pub position: Point,
    pub size: Size,
    pub visual: PanelVisual,
    lifecycle: Lifecycle,
    /// Drawing elevation; a raised panel paints above lower ones without
    /// changing its place in the open order.
    elevation: u64,
}

impl Panel {
    fn new(id: PanelId, kind: PanelKind, position: Point, size: Size) -> Self {
        Self {
            id,
            kind,
            position,
            size,
            visual: PanelVisual::REST,
            lifecycle: Lifecycle::Open,
            elevation: 0,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn kind(&self) -> &PanelKind {
        &self.kind
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn elevation(&self) -> u64 {
        self.elevation
    }

    pub fn title(&self) -> String {
        self.kind.title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_title_replaces_dashes() {
        assert_eq!(PanelKind::from("open-when").title(), "open when");
        assert_eq!(PanelKind::from("countdown").title(), "countdown");
    }

    #[test]
    fn panel_id_display() {
        assert_eq!(PanelId::new(7).to_string(), "#7");
    }
}
