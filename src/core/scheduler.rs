//! Virtual-time scheduler and the shared pause signal.
//!
//! Loops never sleep. They register a wake-up with the [`Scheduler`] and are
//! called back when the session clock reaches it. Cancelling removes the
//! wake-up before it can fire.

use chrono::Utc;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Milliseconds since the Unix epoch on the host clock.
pub fn wall_clock_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Handle for one scheduled wake-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Ordered queue of pending wake-ups on a millisecond clock.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: i64,
    next_id: u64,
    // (due, id) keeps same-instant timers in scheduling order.
    queue: BTreeSet<(i64, TimerId)>,
}

impl Scheduler {
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms,
            ..Default::default()
        }
    }

    pub fn now(&self) -> i64 {
        self.now_ms
    }

    /// Schedules a wake-up `delay_ms` from now.
    pub fn schedule_in(&mut self, delay_ms: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let due = self.now_ms.saturating_add(delay_ms as i64);
        self.queue.insert((due, id));
        log::debug!("scheduled {:?} at {}", id, due);
        id
    }

    /// Removes a pending wake-up. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.queue.iter().find(|(_, t)| *t == id).copied();
        match key {
            Some(key) => {
                self.queue.remove(&key);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.queue.iter().any(|(_, t)| *t == id)
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Pops the earliest wake-up due at or before `until`, moving the clock to it.
    pub fn pop_due(&mut self, until: i64) -> Option<TimerId> {
        let &(due, id) = self.queue.iter().next()?;
        if due > until {
            return None;
        }
        self.queue.remove(&(due, id));
        self.now_ms = self.now_ms.max(due);
        Some(id)
    }

    /// Moves the clock forward without firing anything.
    pub fn set_now(&mut self, now_ms: i64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

/// Process-wide pause flag, shared by cloning.
///
/// Raised while an inspection overlay is open. Every tick handler checks it
/// before touching the save.
#[derive(Debug, Clone, Default)]
pub struct PauseSignal(Rc<Cell<bool>>);

impl PauseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.0.get()
    }

    pub fn raise(&self) {
        self.0.set(true);
    }

    pub fn clear(&self) {
        self.0.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut s = Scheduler::new(0);
        let late = s.schedule_in(500);
        let early = s.schedule_in(100);
        assert_eq!(s.pop_due(1_000), Some(early));
        assert_eq!(s.now(), 100);
        assert_eq!(s.pop_due(1_000), Some(late));
        assert_eq!(s.pop_due(1_000), None);
    }

    #[test]
    fn test_not_due_yet() {
        let mut s = Scheduler::new(0);
        s.schedule_in(6_000);
        assert_eq!(s.pop_due(5_999), None);
        assert_eq!(s.pending_count(), 1);
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut s = Scheduler::new(0);
        let id = s.schedule_in(10);
        assert!(s.cancel(id));
        assert!(!s.cancel(id));
        assert!(!s.is_pending(id));
        assert_eq!(s.pop_due(100), None);
    }

    #[test]
    fn test_same_instant_keeps_schedule_order() {
        let mut s = Scheduler::new(0);
        let a = s.schedule_in(50);
        let b = s.schedule_in(50);
        assert_eq!(s.pop_due(50), Some(a));
        assert_eq!(s.pop_due(50), Some(b));
    }

    #[test]
    fn test_pause_signal_is_shared() {
        let signal = PauseSignal::new();
        let observer = signal.clone();
        signal.raise();
        assert!(observer.is_paused());
        signal.clear();
        assert!(!observer.is_paused());
    }
}
