//! Serializable view of a timer session for front ends.

use serde::{Deserialize, Serialize};

use crate::audio::AudioStatus;
use crate::countdown::TimerState;

/// Point-in-time copy of everything a front end displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub recipe_title: Option<String>,
    pub duration_seconds: u32,
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub has_started: bool,
    pub progress: f64,
    pub ambient_active: bool,
    pub audio: AudioStatus,
    pub state: TimerState,
    /// Remaining time as `MM:SS`.
    pub clock: String,
}
