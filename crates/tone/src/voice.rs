use std::f32::consts::TAU;

use crate::chord::ChordShape;

/// Oscillator shape for a single voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` in `[0, 1)`. Both shapes start at zero and rise.
    #[inline]
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => 4.0 * ((phase + 0.75).fract() - 0.5).abs() - 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lowpass {
    pub cutoff: f32,
    pub q: f32,
}

/// Soft attack followed by an exponential decay to a floor.
///
/// All times are seconds from the moment the tone event is triggered, not from
/// the voice onset, so staggered voices share one envelope clock. After
/// `decay_end` the level holds at `floor` until the voice is stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub peak: f32,
    pub attack: f32,
    pub floor: f32,
    pub decay_end: f32,
}

impl Envelope {
    pub fn level(&self, t: f32) -> f32 {
        if t < self.attack {
            return self.peak * t.max(0.0) / self.attack;
        }
        if t >= self.decay_end {
            return self.floor;
        }

        let span = self.decay_end - self.attack;
        let progress = (t - self.attack) / span;
        self.peak * (self.floor / self.peak).powf(progress)
    }
}

/// One oscillator note: pitch, timbre, optional filter, envelope and timing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub frequency: f32,
    pub detune_cents: f32,
    pub waveform: Waveform,
    pub lowpass: Option<Lowpass>,
    pub envelope: Envelope,
    /// Seconds after the trigger when the oscillator starts.
    pub onset: f32,
    /// Seconds after the trigger when the oscillator stops.
    pub stop: f32,
}

impl Voice {
    /// Frequency after applying the detune offset.
    pub fn pitch(&self) -> f32 {
        self.frequency * 2f32.powf(self.detune_cents / 1200.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneKind {
    Chord { shape: ChordShape, root: usize },
    Chime,
}

/// A set of voices triggered together.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneEvent {
    pub kind: ToneKind,
    pub voices: Vec<Voice>,
}

pub const CHIME_FREQUENCY: f32 = 880.0;
pub const CHIME_GAIN: f32 = 0.3;
pub const CHIME_LENGTH: f32 = 1.0;

impl ToneEvent {
    /// The completion tone: one plain sine at a fixed pitch with a one second decay.
    pub fn chime() -> Self {
        Self {
            kind: ToneKind::Chime,
            voices: vec![Voice {
                frequency: CHIME_FREQUENCY,
                detune_cents: 0.0,
                waveform: Waveform::Sine,
                lowpass: None,
                envelope: Envelope {
                    peak: CHIME_GAIN,
                    attack: 0.0,
                    floor: 0.01,
                    decay_end: CHIME_LENGTH,
                },
                onset: 0.0,
                stop: CHIME_LENGTH,
            }],
        }
    }

    pub fn is_chime(&self) -> bool {
        matches!(self.kind, ToneKind::Chime)
    }

    /// Length in seconds until the last voice stops.
    pub fn duration(&self) -> f32 {
        self.voices.iter().map(|v| v.stop).fold(0.0, f32::max)
    }
}
