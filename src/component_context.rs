//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata that components may need during
//! rendering and event handling: whether it holds focus and the wall-clock
//! instant of the current frame.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy)]
pub struct ComponentContext {
    focused: bool,
    now: DateTime<Utc>,
}

impl ComponentContext {
    pub fn new(focused: bool) -> Self {
        Self {
            focused,
            now: DateTime::<Utc>::default(),
        }
    }

    pub const fn focused(&self) -> bool {
        self.focused
    }

    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub const fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

impl Default for ComponentContext {
    fn default() -> Self {
        Self::new(false)
    }
}
