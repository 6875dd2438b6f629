use std::f32::consts::TAU;

use crate::voice::{Lowpass, Voice};

/// RBJ cookbook biquad, direct form I.
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    pub fn lowpass(params: Lowpass, sample_rate: u32) -> Self {
        let nyquist = sample_rate as f32 * 0.5;
        let cutoff = params.cutoff.clamp(10.0, nyquist * 0.99);
        let w0 = TAU * cutoff / sample_rate as f32;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * params.q.max(1e-3));

        let a0 = 1.0 + alpha;
        let b1 = (1.0 - cos_w0) / a0;
        Self {
            b0: b1 * 0.5,
            b1,
            b2: b1 * 0.5,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Renders one [`Voice`] sample by sample, starting at the moment it was triggered.
///
/// Holds only plain values, so it can live in a preallocated pool on the audio thread.
#[derive(Debug, Clone)]
pub struct VoicePlayer {
    voice: Voice,
    sample_rate: f32,
    elapsed: u64,
    phase: f32,
    increment: f32,
    filter: Option<Biquad>,
}

impl VoicePlayer {
    pub fn new(voice: Voice, sample_rate: u32) -> Self {
        Self {
            increment: voice.pitch() / sample_rate as f32,
            filter: voice.lowpass.map(|lp| Biquad::lowpass(lp, sample_rate)),
            voice,
            sample_rate: sample_rate as f32,
            elapsed: 0,
            phase: 0.0,
        }
    }

    fn seconds(&self) -> f32 {
        self.elapsed as f32 / self.sample_rate
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let t = self.seconds();
        self.elapsed += 1;

        if t < self.voice.onset || t >= self.voice.stop {
            return 0.0;
        }

        let raw = self.voice.waveform.sample(self.phase);
        self.phase = (self.phase + self.increment).fract();

        let shaped = match self.filter.as_mut() {
            Some(filter) => filter.process(raw),
            None => raw,
        };
        shaped * self.voice.envelope.level(t)
    }

    pub fn is_finished(&self) -> bool {
        self.seconds() >= self.voice.stop
    }

    pub fn voice(&self) -> &Voice {
        &self.voice
    }
}
