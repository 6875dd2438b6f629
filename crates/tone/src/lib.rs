pub mod chord;
pub mod synth;
pub mod voice;

pub use chord::{ChordShape, SCALE, generate_chord, scale_note};
pub use synth::{Biquad, VoicePlayer};
pub use voice::{Envelope, Lowpass, ToneEvent, ToneKind, Voice, Waveform};

/// Interleaved sample buffer produced by offline rendering.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioBuffer {
    pub fn silent(frames: usize, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples: vec![0.0; frames * channels as usize],
            sample_rate,
            channels,
        }
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0, |acc, s| acc.max(s.abs()))
    }
}

/// Messages from the control side to the audio callback.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    /// Start a voice at the next callback.
    Voice(Voice),
    /// Cut every sounding voice.
    Silence,
}

/// Messages from the audio callback back to the control side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    ActiveVoices(usize),
    /// Total voices dropped because the pool was full.
    DroppedVoices(u64),
}

/// A live sound output that tone events are produced into.
pub trait AudioOutput {
    fn trigger(&mut self, event: &ToneEvent);

    /// Release the underlying device. Called exactly once by the owner.
    fn close(self)
    where
        Self: Sized;
}

/// Opens an [`AudioOutput`] on demand.
///
/// Opening may fail when the platform has no usable device; callers treat that
/// as "sound off" rather than an error.
pub trait AudioBackend {
    type Output: AudioOutput;

    fn open(&mut self) -> anyhow::Result<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_buffer_frames_and_duration() {
        let buffer = AudioBuffer::silent(44100, 44100, 2);
        assert_eq!(buffer.samples.len(), 88200);
        assert_eq!(buffer.frames(), 44100);
        assert!((buffer.duration_secs() - 1.0).abs() < 1e-9);
        assert_eq!(buffer.peak(), 0.0);
    }

    #[test]
    fn test_audio_buffer_peak_uses_magnitude() {
        let buffer = AudioBuffer {
            samples: vec![0.1, -0.7, 0.3, 0.2],
            sample_rate: 48000,
            channels: 2,
        };
        assert_eq!(buffer.peak(), 0.7);
    }
}
