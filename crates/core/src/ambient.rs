use std::time::Duration;

use kitchen_tone::{AudioOutput, ToneKind, generate_chord};
use rand::{Rng, rngs::StdRng};

use crate::timers::{TimerId, TimerKind, TimerQueue};

/// Shortest gap between tone events, whatever the settings say.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientSettings {
    pub min_interval: Duration,
    pub max_interval: Duration,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(3),
            max_interval: Duration::from_secs(5),
        }
    }
}

/// Plays a generated chord now and then again after a random interval, until stopped.
pub struct AmbientScheduler {
    settings: AmbientSettings,
    rng: StdRng,
    active: bool,
    next: Option<TimerId>,
    fired: u64,
}

impl AmbientScheduler {
    pub fn new(settings: AmbientSettings, rng: StdRng) -> Self {
        Self {
            settings,
            rng,
            active: false,
            next: None,
            fired: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Total tone events produced so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Activate and play the first chord immediately. Returns `None` if already active.
    pub fn start<O: AudioOutput>(
        &mut self,
        timers: &mut TimerQueue,
        output: &mut O,
    ) -> Option<ToneKind> {
        if self.active {
            return None;
        }
        self.active = true;
        Some(self.fire(timers, output))
    }

    /// Returns true if the scheduler was active.
    pub fn stop(&mut self, timers: &mut TimerQueue) -> bool {
        if let Some(id) = self.next.take() {
            timers.cancel(id);
        }
        std::mem::replace(&mut self.active, false)
    }

    pub fn on_timer<O: AudioOutput>(
        &mut self,
        id: TimerId,
        timers: &mut TimerQueue,
        output: &mut O,
    ) -> Option<ToneKind> {
        if !self.active || self.next != Some(id) {
            return None;
        }
        self.next = None;
        Some(self.fire(timers, output))
    }

    fn fire<O: AudioOutput>(&mut self, timers: &mut TimerQueue, output: &mut O) -> ToneKind {
        let event = generate_chord(&mut self.rng);
        output.trigger(&event);
        self.fired += 1;

        let interval = self.next_interval();
        self.next = Some(timers.schedule(interval, TimerKind::Tone));
        log::debug!("ambient chord {:?}, next in {:.2}s", event.kind, interval.as_secs_f64());
        event.kind
    }

    /// Uniform in `[min_interval, max_interval)`, drawn fresh for every event,
    /// never below [`MIN_INTERVAL`].
    fn next_interval(&mut self) -> Duration {
        let min_interval = self.settings.min_interval.max(MIN_INTERVAL);
        let max_interval = self.settings.max_interval;
        if max_interval <= min_interval {
            return min_interval;
        }
        Duration::from_secs_f64(
            self.rng
                .gen_range(min_interval.as_secs_f64()..max_interval.as_secs_f64()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingBackend;
    use kitchen_tone::AudioBackend;
    use rand::SeedableRng;

    fn scheduler(seed: u64) -> AmbientScheduler {
        AmbientScheduler::new(AmbientSettings::default(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_start_plays_immediately_and_schedules_next() {
        let mut backend = RecordingBackend::default();
        let mut output = backend.open().expect("open");
        let mut timers = TimerQueue::new();
        let mut ambient = scheduler(1);

        assert!(ambient.start(&mut timers, &mut output).is_some());
        assert!(ambient.is_active());
        assert_eq!(backend.recording().chords(), 1);
        assert_eq!(timers.count(TimerKind::Tone), 1);
    }

    #[test]
    fn test_start_while_active_is_noop() {
        let mut backend = RecordingBackend::default();
        let mut output = backend.open().expect("open");
        let mut timers = TimerQueue::new();
        let mut ambient = scheduler(1);

        ambient.start(&mut timers, &mut output);
        assert!(ambient.start(&mut timers, &mut output).is_none());
        assert_eq!(backend.recording().chords(), 1);
        assert_eq!(timers.count(TimerKind::Tone), 1);
    }

    #[test]
    fn test_intervals_are_redrawn_within_range() {
        let mut backend = RecordingBackend::default();
        let mut output = backend.open().expect("open");
        let mut timers = TimerQueue::new();
        let mut ambient = scheduler(42);

        ambient.start(&mut timers, &mut output);
        let mut fire_times = vec![timers.now()];
        let until = Duration::from_secs(120);
        while let Some((id, kind)) = timers.pop_due(until) {
            assert_eq!(kind, TimerKind::Tone);
            ambient.on_timer(id, &mut timers, &mut output);
            fire_times.push(timers.now());
        }

        let gaps: Vec<Duration> = fire_times.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.len() > 20);
        for gap in &gaps {
            assert!(*gap >= Duration::from_secs(3) && *gap < Duration::from_secs(5), "{gap:?}");
        }
        assert!(gaps.windows(2).any(|w| w[0] != w[1]), "interval is redrawn");
        assert_eq!(ambient.fired() as usize, fire_times.len());
    }

    #[test]
    fn test_stop_cancels_pending_event() {
        let mut backend = RecordingBackend::default();
        let mut output = backend.open().expect("open");
        let mut timers = TimerQueue::new();
        let mut ambient = scheduler(5);

        ambient.start(&mut timers, &mut output);
        assert!(ambient.stop(&mut timers));
        assert!(timers.is_empty());
        assert!(!ambient.is_active());

        assert!(!ambient.stop(&mut timers), "stopping twice is a no-op");
        assert_eq!(backend.recording().chords(), 1);
    }

    #[test]
    fn test_timer_after_stop_does_not_fire() {
        let mut backend = RecordingBackend::default();
        let mut output = backend.open().expect("open");
        let mut timers = TimerQueue::new();
        let mut ambient = scheduler(5);

        ambient.start(&mut timers, &mut output);
        let (id, _) = timers.pop_due(Duration::from_secs(10)).expect("due");
        ambient.stop(&mut timers);

        assert!(ambient.on_timer(id, &mut timers, &mut output).is_none());
        assert_eq!(backend.recording().chords(), 1);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_fixed_interval_when_range_is_empty() {
        let settings = AmbientSettings {
            min_interval: Duration::from_secs(4),
            max_interval: Duration::from_secs(4),
        };
        let mut ambient = AmbientScheduler::new(settings, StdRng::seed_from_u64(0));
        assert_eq!(ambient.next_interval(), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_interval_is_raised_to_minimum() {
        let settings = AmbientSettings {
            min_interval: Duration::ZERO,
            max_interval: Duration::ZERO,
        };
        let mut ambient = AmbientScheduler::new(settings, StdRng::seed_from_u64(0));
        for _ in 0..10 {
            assert_eq!(ambient.next_interval(), MIN_INTERVAL);
        }

        let settings = AmbientSettings {
            min_interval: Duration::ZERO,
            max_interval: Duration::from_millis(3),
        };
        let mut ambient = AmbientScheduler::new(settings, StdRng::seed_from_u64(0));
        for _ in 0..100 {
            let interval = ambient.next_interval();
            assert!(interval >= MIN_INTERVAL && interval <= Duration::from_millis(3), "{interval:?}");
        }
    }
}
