//! Cooperative timers driven by the event loop tick.
//!
//! Nothing here sleeps or spawns. The loop asks [`Scheduler::due`] which
//! timers have elapsed at the current instant and dispatches them itself.

use std::time::{Duration, Instant};

use crate::window::PanelId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// What a timer belongs to. Panel-owned timers die with their panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerOwner {
    Shell,
    Panel(PanelId),
}

/// Purpose of a timer, dispatched by the window manager when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Taskbar clock and lock screen time display.
    Clock,
    LockClock,
    Greeting,
    Countdown,
    DailyQuote,
    BootDone,
    ToastExpiry,
    HeartsFrame,
    HeartsExpiry,
    /// Periodic refresh requested by panel content.
    ContentRefresh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub owner: TimerOwner,
    pub kind: TimerKind,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    owner: TimerOwner,
    kind: TimerKind,
    deadline: Instant,
    period: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every `period`, first at `now + period`.
    pub fn every(
        &mut self,
        owner: TimerOwner,
        kind: TimerKind,
        period: Duration,
        now: Instant,
    ) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(owner, kind, now + period, Some(period))
    }

    /// Fire once at `now + delay`.
    pub fn after(
        &mut self,
        owner: TimerOwner,
        kind: TimerKind,
        delay: Duration,
        now: Instant,
    ) -> TimerId {
        self.insert(owner, kind, now + delay, None)
    }

    fn insert(
        &mut self,
        owner: TimerOwner,
        kind: TimerKind,
        deadline: Instant,
        period: Option<Duration>,
    ) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(Entry {
            id,
            owner,
            kind,
            deadline,
            period,
        });
        id
    }

    /// Cancel one timer. Unknown ids are ignored.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        before != self.entries.len()
    }

    /// Cancel every timer of `kind` owned by `owner`.
    pub fn cancel_kind(&mut self, owner: TimerOwner, kind: TimerKind) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.owner == owner && e.kind == kind));
        before - self.entries.len()
    }

    /// Cancel every timer owned by `owner` and report how many went away.
    pub fn cancel_owner(&mut self, owner: TimerOwner) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(owner = ?owner, removed, "cancelled timers");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, owner: TimerOwner, kind: TimerKind) -> bool {
        self.entries
            .iter()
            .any(|e| e.owner == owner && e.kind == kind)
    }

    pub fn owned_by(&self, owner: TimerOwner) -> usize {
        self.entries.iter().filter(|e| e.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending deadline, used to bound the loop's poll timeout.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.deadline).min()
    }

    /// Collect timers whose deadline is at or before `now`.
    ///
    /// One-shot timers are removed. Periodic timers are re-armed relative to
    /// their previous deadline; a timer that fell several periods behind
    /// fires once and skips the missed periods.
    pub fn due(&mut self, now: Instant) -> Vec<Fired> {
        let mut fired = Vec::new();
        self.entries.retain_mut(|entry| {
            if entry.deadline > now {
                return true;
            }
            fired.push(Fired {
                id: entry.id,
                owner: entry.owner,
                kind: entry.kind,
            });
            match entry.period {
                Some(period) => {
                    let mut next = entry.deadline + period;
                    while next <= now {
                        next += period;
                    }
                    entry.deadline = next;
                    true
                }
                None => false,
            }
        });
        fired
    }
}

/// Trailing-edge debounce: only the last trigger within the quiet period
/// produces a fire.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    armed_at: Option<Instant>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            armed_at: None,
        }
    }

    /// (Re)arm the debouncer, discarding any earlier pending trigger.
    pub fn trigger(&mut self, now: Instant) {
        self.armed_at = Some(now);
    }

    pub fn is_pending(&self) -> bool {
        self.armed_at.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed_at.map(|t| t + self.quiet)
    }

    /// Returns true once when the quiet period has elapsed since the last
    /// trigger.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.armed_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.armed_at = None;
    }
}

/// Pending-redraw flag. State changes mark it; the loop drains it once per
/// tick so bursts of input produce a single frame showing the latest state.
#[derive(Debug, Default)]
pub struct FrameRequest {
    pending: bool,
}

impl FrameRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn periodic_timer_fires_and_rearms() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.every(TimerOwner::Shell, TimerKind::Clock, ms(1000), t0);
        assert!(s.due(t0 + ms(999)).is_empty());
        assert_eq!(s.due(t0 + ms(1000)).len(), 1);
        assert!(s.due(t0 + ms(1500)).is_empty());
        // several periods behind: fires once
        assert_eq!(s.due(t0 + ms(5200)).len(), 1);
        assert!(s.due(t0 + ms(5900)).is_empty());
        assert_eq!(s.due(t0 + ms(6000)).len(), 1);
    }

    #[test]
    fn one_shot_fires_once() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.after(TimerOwner::Shell, TimerKind::BootDone, ms(4000), t0);
        assert_eq!(s.due(t0 + ms(4000)).len(), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn cancel_owner_removes_only_that_panel() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        let a = TimerOwner::Panel(PanelId::new(1));
        let b = TimerOwner::Panel(PanelId::new(2));
        s.every(a, TimerKind::Countdown, ms(30_000), t0);
        s.every(a, TimerKind::ContentRefresh, ms(10_000), t0);
        s.every(b, TimerKind::Countdown, ms(30_000), t0);
        assert_eq!(s.cancel_owner(a), 2);
        assert_eq!(s.cancel_owner(a), 0);
        let fired = s.due(t0 + ms(30_000));
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].owner, b);
    }

    #[test]
    fn cancel_by_id_and_kind() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        let id = s.every(TimerOwner::Shell, TimerKind::Clock, ms(10), t0);
        s.every(TimerOwner::Shell, TimerKind::LockClock, ms(10), t0);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert_eq!(s.cancel_kind(TimerOwner::Shell, TimerKind::LockClock), 1);
        assert!(s.is_empty());
    }

    #[test]
    fn next_deadline_is_earliest() {
        let t0 = Instant::now();
        let mut s = Scheduler::new();
        s.after(TimerOwner::Shell, TimerKind::ToastExpiry, ms(2000), t0);
        s.every(TimerOwner::Shell, TimerKind::Clock, ms(1000), t0);
        assert_eq!(s.next_deadline(), Some(t0 + ms(1000)));
    }

    #[test]
    fn debouncer_fires_only_after_last_trigger() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(250));
        d.trigger(t0);
        d.trigger(t0 + ms(200));
        assert!(!d.fire(t0 + ms(300)));
        assert!(d.fire(t0 + ms(450)));
        assert!(!d.fire(t0 + ms(900)));
    }

    #[test]
    fn frame_request_drains_once() {
        let mut f = FrameRequest::default();
        f.request();
        f.request();
        assert!(f.take());
        assert!(!f.take());
    }
}
