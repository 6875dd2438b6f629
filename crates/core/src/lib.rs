pub mod ambient;
pub mod audio;
pub mod countdown;
pub mod recipe;
pub mod session;
pub mod snapshot;
pub mod time;
pub mod timers;

#[cfg(test)]
mod testing;

pub use ambient::{AmbientScheduler, AmbientSettings, MIN_INTERVAL};
pub use audio::{AudioSlot, AudioStatus};
pub use countdown::{Countdown, DurationBounds, TICK, TickOutcome, TimerState};
pub use recipe::{Difficulty, Recipe, sample_recipes};
pub use session::{DEFAULT_DURATION_SECS, SessionEvent, SessionSettings, TimerSession};
pub use snapshot::SessionSnapshot;
pub use time::ClockTime;
pub use timers::{TimerId, TimerKind, TimerQueue};

pub use kitchen_tone::{AudioBackend, AudioOutput, ToneEvent, ToneKind};
