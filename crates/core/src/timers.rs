//! Owned, cancelable one-shot timers on a virtual clock.
//!
//! The host advances the clock; nothing fires on its own. Periodic behaviour is
//! built by the owner rescheduling from inside its handler.

use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// One second of countdown elapsed.
    Tick,
    /// Next ambient tone event is due.
    Tone,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    /// Keyed by deadline first so the earliest timer is always at the front.
    pending: BTreeMap<(Duration, TimerId), TimerKind>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, kind: TimerKind) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert((self.now + delay, id), kind);
        id
    }

    /// Returns false if the timer already fired or was canceled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.pending.keys().find(|(_, pending)| *pending == id).copied();
        match key {
            Some(key) => self.pending.remove(&key).is_some(),
            None => false,
        }
    }

    /// Remove and return the earliest timer due at or before `until`, moving the
    /// clock to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, TimerKind)> {
        let (&(deadline, id), _) = self.pending.first_key_value()?;
        if deadline > until {
            return None;
        }
        let kind = self.pending.remove(&(deadline, id))?;
        self.now = self.now.max(deadline);
        Some((id, kind))
    }

    /// Move the clock forward without firing anything.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(deadline, _)| *deadline)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn count(&self, kind: TimerKind) -> usize {
        self.pending.values().filter(|k| **k == kind).count()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
