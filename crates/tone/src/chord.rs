//! Randomized chord voicing for ambient tone events.
//!
//! Everything here is a pure function of the supplied RNG so the ranges can be
//! checked without an audio device.

use std::ops::Range;

use rand::Rng;

use crate::voice::{Envelope, Lowpass, ToneEvent, ToneKind, Voice, Waveform};

/// C major, one octave from middle C up to the next C.
pub const SCALE: [f32; 8] = [
    261.63, 293.66, 329.63, 349.23, 392.00, 440.00, 493.88, 523.25,
];

/// Roots are drawn from the lower part of the scale.
pub const ROOT_RANGE: Range<usize> = 0..5;
pub const DETUNE_CENTS: Range<f32> = -5.0..5.0;
pub const CUTOFF_HZ: Range<f32> = 800.0..1200.0;
pub const FILTER_Q: f32 = 1.0;
pub const WAVEFORMS: [Waveform; 2] = [Waveform::Sine, Waveform::Triangle];

pub const VOICE_PEAK: f32 = 0.08;
pub const VOICE_ATTACK: f32 = 0.1;
pub const VOICE_FLOOR: f32 = 0.01;
/// Decay end for the first voice; each later voice rings a little longer.
pub const VOICE_RELEASE: f32 = 2.0;
pub const RELEASE_STAGGER: f32 = 0.5;
/// Onset spacing between voices, giving a strum instead of a block chord.
pub const ONSET_STAGGER: f32 = 0.05;
pub const CHORD_LENGTH: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChordShape {
    Major,
    Minor,
    MajorSeventh,
    MinorSeventh,
}

impl ChordShape {
    pub const ALL: [ChordShape; 4] = [
        ChordShape::Major,
        ChordShape::Minor,
        ChordShape::MajorSeventh,
        ChordShape::MinorSeventh,
    ];

    /// Scale-degree offsets from the root.
    pub fn offsets(self) -> &'static [usize] {
        match self {
            ChordShape::Major => &[0, 2, 4],
            ChordShape::Minor => &[0, 3, 4],
            ChordShape::MajorSeventh => &[0, 2, 4, 6],
            ChordShape::MinorSeventh => &[0, 3, 4, 6],
        }
    }
}

/// Frequency of scale degree `root + offset`, wrapping inside the octave.
pub fn scale_note(root: usize, offset: usize) -> f32 {
    SCALE[(root + offset) % SCALE.len()]
}

/// Picks a chord shape and root, then derives one voice per chord tone.
pub fn generate_chord<R: Rng + ?Sized>(rng: &mut R) -> ToneEvent {
    let shape = ChordShape::ALL[rng.gen_range(0..ChordShape::ALL.len())];
    let root = rng.gen_range(ROOT_RANGE);

    let voices = shape
        .offsets()
        .iter()
        .enumerate()
        .map(|(i, &offset)| {
            let i = i as f32;
            Voice {
                frequency: scale_note(root, offset),
                detune_cents: rng.gen_range(DETUNE_CENTS),
                waveform: WAVEFORMS[rng.gen_range(0..WAVEFORMS.len())],
                lowpass: Some(Lowpass {
                    cutoff: rng.gen_range(CUTOFF_HZ),
                    q: FILTER_Q,
                }),
                envelope: Envelope {
                    peak: VOICE_PEAK,
                    attack: VOICE_ATTACK,
                    floor: VOICE_FLOOR,
                    decay_end: VOICE_RELEASE + i * RELEASE_STAGGER,
                },
                onset: i * ONSET_STAGGER,
                stop: CHORD_LENGTH,
            }
        })
        .collect();

    ToneEvent {
        kind: ToneKind::Chord { shape, root },
        voices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_scale_note_wraps_octave() {
        assert_eq!(scale_note(0, 0), 261.63);
        assert_eq!(scale_note(4, 6), SCALE[2]);
        assert_eq!(scale_note(7, 1), SCALE[0]);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a = generate_chord(&mut StdRng::seed_from_u64(7));
        let b = generate_chord(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_shape_is_reachable() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = Vec::new();
        for _ in 0..500 {
            if let ToneKind::Chord { shape, .. } = generate_chord(&mut rng).kind {
                if !seen.contains(&shape) {
                    seen.push(shape);
                }
            }
        }
        assert_eq!(seen.len(), ChordShape::ALL.len());
    }

    proptest! {
        #[test]
        fn prop_chord_parameters_stay_in_range(seed in any::<u64>()) {
            let event = generate_chord(&mut StdRng::seed_from_u64(seed));

            let ToneKind::Chord { shape, root } = event.kind else {
                panic!("ambient generation produced a chime");
            };
            prop_assert!(ROOT_RANGE.contains(&root));
            prop_assert_eq!(event.voices.len(), shape.offsets().len());

            for (i, (voice, &offset)) in event.voices.iter().zip(shape.offsets()).enumerate() {
                prop_assert_eq!(voice.frequency, scale_note(root, offset));
                prop_assert!(SCALE.contains(&voice.frequency));
                prop_assert!(DETUNE_CENTS.contains(&voice.detune_cents));
                prop_assert!(WAVEFORMS.contains(&voice.waveform));

                let filter = voice.lowpass.expect("ambient voices are filtered");
                prop_assert!(CUTOFF_HZ.contains(&filter.cutoff));

                let i = i as f32;
                prop_assert!((voice.onset - i * ONSET_STAGGER).abs() < 1e-6);
                prop_assert!((voice.envelope.decay_end - (VOICE_RELEASE + i * RELEASE_STAGGER)).abs() < 1e-6);
                prop_assert_eq!(voice.stop, CHORD_LENGTH);
            }
        }

        #[test]
        fn prop_later_voices_start_later_and_ring_longer(seed in any::<u64>()) {
            let event = generate_chord(&mut StdRng::seed_from_u64(seed));
            for pair in event.voices.windows(2) {
                prop_assert!(pair[1].onset > pair[0].onset);
                prop_assert!(pair[1].envelope.decay_end > pair[0].envelope.decay_end);
            }
        }
    }
}
