use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::timers::{TimerId, TimerKind, TimerQueue};

pub const TICK: Duration = Duration::from_secs(1);

/// Allowed range for the countdown length, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    pub min_secs: u32,
    pub max_secs: u32,
    pub step_secs: u32,
}

impl DurationBounds {
    pub fn clamp(&self, secs: u32) -> u32 {
        let min = self.min_secs.max(1);
        secs.clamp(min, self.max_secs.max(min))
    }
}

impl Default for DurationBounds {
    fn default() -> Self {
        Self {
            min_secs: 60,
            max_secs: 50 * 60,
            step_secs: 5 * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerState {
    pub fn is_running(&self) -> bool {
        matches!(self, TimerState::Running)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not the pending tick (canceled or superseded).
    Stale,
    Ticked { remaining_secs: u32 },
    /// Remaining time reached zero on this tick.
    Completed,
}

/// Countdown of whole seconds driven by [`TimerKind::Tick`] timers.
///
/// Holds at most one pending tick. Remaining time only decreases while running
/// and stops at zero; after that only [`Countdown::reset`] makes it usable again.
#[derive(Debug)]
pub struct Countdown {
    bounds: DurationBounds,
    duration_secs: u32,
    remaining_secs: u32,
    running: bool,
    started: bool,
    tick: Option<TimerId>,
}

impl Countdown {
    pub fn new(duration_secs: u32, bounds: DurationBounds) -> Self {
        let duration_secs = bounds.clamp(duration_secs);
        Self {
            bounds,
            duration_secs,
            remaining_secs: duration_secs,
            running: false,
            started: false,
            tick: None,
        }
    }

    /// Set the duration, clamped into bounds. Ignored once started.
    /// Returns the duration now in effect.
    pub fn configure(&mut self, duration_secs: u32) -> u32 {
        if self.started {
            return self.duration_secs;
        }
        self.duration_secs = self.bounds.clamp(duration_secs);
        self.remaining_secs = self.duration_secs;
        self.duration_secs
    }

    pub fn step_up(&mut self) -> u32 {
        self.configure(self.duration_secs.saturating_add(self.bounds.step_secs))
    }

    pub fn step_down(&mut self) -> u32 {
        self.configure(self.duration_secs.saturating_sub(self.bounds.step_secs))
    }

    /// Begin or resume. Returns true if the countdown was not already running.
    pub fn start(&mut self, timers: &mut TimerQueue) -> bool {
        if self.is_completed() {
            return false;
        }
        if !self.started {
            self.remaining_secs = self.duration_secs;
            self.started = true;
        }
        if self.tick.is_none() {
            self.tick = Some(timers.schedule(TICK, TimerKind::Tick));
        }
        !std::mem::replace(&mut self.running, true)
    }

    /// Returns true if the countdown was running.
    pub fn pause(&mut self, timers: &mut TimerQueue) -> bool {
        self.cancel_tick(timers);
        std::mem::replace(&mut self.running, false)
    }

    pub fn reset(&mut self, timers: &mut TimerQueue) {
        self.cancel_tick(timers);
        self.running = false;
        self.started = false;
        self.remaining_secs = self.duration_secs;
    }

    pub fn on_tick(&mut self, id: TimerId, timers: &mut TimerQueue) -> TickOutcome {
        if self.tick != Some(id) {
            return TickOutcome::Stale;
        }
        self.tick = None;
        if !self.running || self.remaining_secs == 0 {
            return TickOutcome::Stale;
        }

        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.running = false;
            return TickOutcome::Completed;
        }

        self.tick = Some(timers.schedule(TICK, TimerKind::Tick));
        TickOutcome::Ticked {
            remaining_secs: self.remaining_secs,
        }
    }

    fn cancel_tick(&mut self, timers: &mut TimerQueue) {
        if let Some(id) = self.tick.take() {
            timers.cancel(id);
        }
    }

    /// Fraction of the duration already elapsed; 0 before the first start.
    pub fn progress(&self) -> f64 {
        if !self.started {
            return 0.0;
        }
        1.0 - self.remaining_secs as f64 / self.duration_secs as f64
    }

    pub fn state(&self) -> TimerState {
        if !self.started {
            TimerState::Idle
        } else if self.remaining_secs == 0 {
            TimerState::Completed
        } else if self.running {
            TimerState::Running
        } else {
            TimerState::Paused
        }
    }

    pub fn is_completed(&self) -> bool {
        self.started && self.remaining_secs == 0
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn bounds(&self) -> DurationBounds {
        self.bounds
    }
}
