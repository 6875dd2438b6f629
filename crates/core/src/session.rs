use std::time::Duration;

use kitchen_tone::{AudioBackend, AudioOutput, ToneEvent, ToneKind};
use rand::{SeedableRng, rngs::StdRng};

use crate::ambient::{AmbientScheduler, AmbientSettings};
use crate::audio::{AudioSlot, AudioStatus};
use crate::countdown::{Countdown, DurationBounds, TickOutcome, TimerState};
use crate::recipe::Recipe;
use crate::snapshot::SessionSnapshot;
use crate::time::ClockTime;
use crate::timers::{TimerKind, TimerQueue};

pub const DEFAULT_DURATION_SECS: u32 = 20 * 60;

#[derive(Debug, Clone, Default)]
pub struct SessionSettings {
    pub bounds: DurationBounds,
    pub ambient: AmbientSettings,
    /// Seed for chord generation; `None` draws one from the OS.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick { remaining_secs: u32 },
    Tone(ToneKind),
    AmbientStopped,
    Completed,
}

/// One open timer: countdown, ambient tones and the audio output they share.
///
/// The session is the only owner of the audio output. Closing it, explicitly or
/// by dropping, stops the tones, cancels every pending timer and releases the
/// output exactly once.
pub struct TimerSession<B: AudioBackend> {
    recipe_title: Option<String>,
    countdown: Countdown,
    ambient: AmbientScheduler,
    timers: TimerQueue,
    audio: AudioSlot<B>,
    closed: bool,
}

impl<B: AudioBackend> TimerSession<B> {
    pub fn new(backend: B, duration_secs: u32, settings: SessionSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            recipe_title: None,
            countdown: Countdown::new(duration_secs, settings.bounds),
            ambient: AmbientScheduler::new(settings.ambient, rng),
            timers: TimerQueue::new(),
            audio: AudioSlot::new(backend),
            closed: false,
        }
    }

    /// Seed duration and title from a recipe, or the default duration without one.
    pub fn for_recipe(backend: B, recipe: Option<&Recipe>, settings: SessionSettings) -> Self {
        let duration = recipe.map_or(DEFAULT_DURATION_SECS, Recipe::cook_time_secs);
        let mut session = Self::new(backend, duration, settings);
        session.recipe_title = recipe.map(|r| r.title.clone());
        session
    }

    pub fn configure(&mut self, duration_secs: u32) -> u32 {
        self.countdown.configure(duration_secs)
    }

    pub fn step_up(&mut self) -> u32 {
        self.countdown.step_up()
    }

    pub fn step_down(&mut self) -> u32 {
        self.countdown.step_down()
    }

    pub fn start(&mut self) -> bool {
        if self.closed {
            return false;
        }
        let resumed = self.countdown.has_started();
        let changed = self.countdown.start(&mut self.timers);
        if changed {
            log::info!(
                "timer {} at {}",
                if resumed { "resumed" } else { "started" },
                self.clock()
            );
        }
        changed
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.countdown.pause(&mut self.timers);
        if changed {
            log::info!("timer paused at {}", self.clock());
        }
        changed
    }

    /// Start when stopped, pause when running.
    pub fn toggle_running(&mut self) -> bool {
        if self.countdown.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    pub fn reset(&mut self) {
        self.countdown.reset(&mut self.timers);
        self.ambient.stop(&mut self.timers);
        log::info!("timer reset to {}", self.clock());
    }

    /// Turn ambient tones on. Returns false when already on, when the session is
    /// closed, or when no audio output could be opened.
    pub fn start_ambient(&mut self) -> bool {
        if self.closed || self.ambient.is_active() {
            return false;
        }
        let Some(output) = self.audio.acquire() else {
            return false;
        };
        let started = self.ambient.start(&mut self.timers, output).is_some();
        if started {
            log::info!("ambient tones on");
        }
        started
    }

    pub fn stop_ambient(&mut self) -> bool {
        let stopped = self.ambient.stop(&mut self.timers);
        if stopped {
            log::info!("ambient tones off");
        }
        stopped
    }

    /// Returns whether ambient tones are on afterwards.
    pub fn toggle_ambient(&mut self) -> bool {
        if self.ambient.is_active() {
            self.stop_ambient();
        } else {
            self.start_ambient();
        }
        self.ambient.is_active()
    }

    /// Let `elapsed` time pass, firing every timer that falls due in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.closed {
            return events;
        }

        let until = self.timers.now() + elapsed;
        while let Some((id, kind)) = self.timers.pop_due(until) {
            match kind {
                TimerKind::Tick => match self.countdown.on_tick(id, &mut self.timers) {
                    TickOutcome::Ticked { remaining_secs } => {
                        events.push(SessionEvent::Tick { remaining_secs });
                    }
                    TickOutcome::Completed => {
                        events.push(SessionEvent::Tick { remaining_secs: 0 });
                        self.complete(&mut events);
                    }
                    TickOutcome::Stale => {}
                },
                TimerKind::Tone => {
                    let Some(output) = self.audio.output_mut() else {
                        self.ambient.stop(&mut self.timers);
                        continue;
                    };
                    if let Some(kind) = self.ambient.on_timer(id, &mut self.timers, output) {
                        events.push(SessionEvent::Tone(kind));
                    }
                }
            }
        }
        self.timers.advance_to(until);

        events
    }

    fn complete(&mut self, events: &mut Vec<SessionEvent>) {
        if self.ambient.stop(&mut self.timers) {
            events.push(SessionEvent::AmbientStopped);
        }
        if let Some(output) = self.audio.acquire() {
            let chime = ToneEvent::chime();
            output.trigger(&chime);
            events.push(SessionEvent::Tone(chime.kind));
        }
        events.push(SessionEvent::Completed);
        log::info!("timer finished");
    }

    /// Tear down: no tones, no pending timers, audio released. Safe to call twice.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.countdown.pause(&mut self.timers);
        self.ambient.stop(&mut self.timers);
        self.timers.clear();
        self.audio.release();
        log::info!("timer session closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn recipe_title(&self) -> Option<&str> {
        self.recipe_title.as_deref()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.countdown.remaining_secs()
    }

    pub fn duration_secs(&self) -> u32 {
        self.countdown.duration_secs()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    pub fn has_started(&self) -> bool {
        self.countdown.has_started()
    }

    pub fn progress(&self) -> f64 {
        self.countdown.progress()
    }

    pub fn state(&self) -> TimerState {
        self.countdown.state()
    }

    pub fn is_ambient_active(&self) -> bool {
        self.ambient.is_active()
    }

    pub fn audio_status(&self) -> AudioStatus {
        self.audio.status()
    }

    pub fn clock(&self) -> ClockTime {
        ClockTime(self.countdown.remaining_secs())
    }

    /// Number of scheduled tick and tone timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending(&self, kind: TimerKind) -> usize {
        self.timers.count(kind)
    }

    /// Time until the next scheduled timer, for hosts that sleep between updates.
    pub fn time_to_next(&self) -> Option<Duration> {
        self.timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(self.timers.now()))
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            recipe_title: self.recipe_title.clone(),
            duration_seconds: self.duration_secs(),
            remaining_seconds: self.remaining_secs(),
            is_running: self.is_running(),
            has_started: self.has_started(),
            progress: self.progress(),
            ambient_active: self.is_ambient_active(),
            audio: self.audio_status(),
            state: self.state(),
            clock: self.clock().to_string(),
        }
    }
}

impl<B: AudioBackend> Drop for TimerSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}
