//! Panel lifecycle: identity allocation, open order and removal.

use super::{Lifecycle, Panel, PanelId, PanelKind};
use crate::config::Metrics;
use crate::layout::{Point, Viewport, place_new_panel};

/// Ordered set of open panels.
///
/// Order is open order: oldest first, the most recently opened ("topmost")
/// last. Identifiers come from a counter that only moves forward, so a
/// re-opened kind always receives a fresh id.
#[derive(Debug, Clone, Default)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
    next_id: u64,
    opened_total: u64,
    next_elevation: u64,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a panel of `kind`, placed by the cascade from the number of
    /// panels currently open.
    pub fn open(&mut self, kind: PanelKind, viewport: Viewport, metrics: &Metrics) -> PanelId {
        let position = place_new_panel(self.panels.len(), viewport, metrics);
        self.open_at(kind, position, metrics)
    }

    /// Open a panel at an explicit position.
    pub fn open_at(&mut self, kind: PanelKind, position: Point, metrics: &Metrics) -> PanelId {
        self.next_id = self.next_id.saturating_add(1);
        self.opened_total = self.opened_total.saturating_add(1);
        let id = PanelId::new(self.next_id);
        tracing::debug!(panel = %id, kind = %kind, x = position.x, y = position.y, "opened panel");
        self.panels
            .push(Panel::new(id, kind, position, metrics.panel_size));
        id
    }

    /// Remove the panel with `id`. Closing an id that is not open is a no-op.
    pub fn close(&mut self, id: PanelId) -> Option<Panel> {
        let index = self.panels.iter().position(|p| p.id == id)?;
        let mut panel = self.panels.remove(index);
        panel.lifecycle = Lifecycle::Closed;
        tracing::debug!(panel = %id, "closed panel");
        Some(panel)
    }

    /// Remove the most recently opened panel, if any.
    pub fn close_topmost(&mut self) -> Option<Panel> {
        let id = self.topmost()?.id;
        self.close(id)
    }

    pub fn list_open(&self) -> &[Panel] {
        &self.panels
    }

    pub fn topmost(&self) -> Option<&Panel> {
        self.panels.last()
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: PanelId) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == id)
    }

    pub fn contains(&self, id: PanelId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Total number of panels opened this session, closed ones included.
    pub fn opened_total(&self) -> u64 {
        self.opened_total
    }

    /// Position of `id` in open order, 0 being the oldest.
    pub fn rank(&self, id: PanelId) -> Option<usize> {
        self.panels.iter().position(|p| p.id == id)
    }

    pub fn set_position(&mut self, id: PanelId, position: Point) -> bool {
        match self.get_mut(id) {
            Some(panel) => {
                panel.position = position;
                true
            }
            None => false,
        }
    }

    /// Paint `id` above every other panel. Open order is left unchanged.
    pub fn raise(&mut self, id: PanelId) {
        let elevation = self.next_elevation.saturating_add(1);
        if let Some(panel) = self.get_mut(id) {
            panel.elevation = elevation;
            self.next_elevation = elevation;
        }
    }

    /// Ids in painting order, bottom first.
    pub fn draw_order(&self) -> Vec<PanelId> {
        let mut order: Vec<&Panel> = self.panels.iter().collect();
        order.sort_by_key(|p| (p.elevation, p.id));
        order.into_iter().map(|p| p.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Size;

    fn setup() -> (PanelRegistry, Metrics, Viewport) {
        (
            PanelRegistry::new(),
            Metrics::reference(),
            Size::new(1440, 900),
        )
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let (mut reg, m, vp) = setup();
        let a = reg.open("countdown".into(), vp, &m);
        let b = reg.open("inspiration".into(), vp, &m);
        reg.close(b);
        let c = reg.open("inspiration".into(), vp, &m);
        assert!(a < b && b < c);
        assert_eq!(reg.opened_total(), 3);
        let ids: Vec<_> = reg.list_open().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn placement_uses_current_open_count() {
        let (mut reg, m, vp) = setup();
        let a = reg.open("a".into(), vp, &m);
        let b = reg.open("b".into(), vp, &m);
        assert_eq!(reg.get(a).unwrap().position, Point::new(50, 50));
        assert_eq!(reg.get(b).unwrap().position, Point::new(80, 80));
        reg.close(a);
        let c = reg.open("c".into(), vp, &m);
        // one panel still open, so the cascade offset is one step
        assert_eq!(reg.get(c).unwrap().position, Point::new(80, 80));
    }

    #[test]
    fn double_close_is_a_no_op() {
        let (mut reg, m, vp) = setup();
        let a = reg.open("a".into(), vp, &m);
        reg.open("b".into(), vp, &m);
        let closed = reg.close(a).unwrap();
        assert_eq!(closed.lifecycle(), Lifecycle::Closed);
        let snapshot = reg.list_open().to_vec();
        assert!(reg.close(a).is_none());
        assert_eq!(reg.list_open(), snapshot.as_slice());
    }

    #[test]
    fn close_topmost_removes_newest() {
        let (mut reg, m, vp) = setup();
        let a = reg.open("a".into(), vp, &m);
        let b = reg.open("b".into(), vp, &m);
        assert_eq!(reg.close_topmost().map(|p| p.id()), Some(b));
        assert_eq!(reg.close_topmost().map(|p| p.id()), Some(a));
        assert!(reg.close_topmost().is_none());
    }

    #[test]
    fn raise_changes_paint_order_only() {
        let (mut reg, m, vp) = setup();
        let a = reg.open("a".into(), vp, &m);
        let b = reg.open("b".into(), vp, &m);
        reg.raise(a);
        assert_eq!(reg.draw_order(), vec![b, a]);
        assert_eq!(reg.topmost().map(|p| p.id()), Some(b));
        assert_eq!(reg.rank(a), Some(0));
    }
}
