use std::path::Path;

use kitchen_tone::{AudioBuffer, ToneEvent, VoicePlayer};

fn seconds_to_frames(seconds: f64, sample_rate: u32) -> usize {
    (seconds * sample_rate as f64).ceil() as usize
}

/// Render a single tone event from its trigger time until the last voice stops.
pub fn render_event(event: &ToneEvent, sample_rate: u32, channels: u16) -> AudioBuffer {
    render_sequence(&[(0.0, event.clone())], sample_rate, channels)
}

/// Render tone events placed at offsets (seconds) on one timeline.
pub fn render_sequence(
    events: &[(f64, ToneEvent)],
    sample_rate: u32,
    channels: u16,
) -> AudioBuffer {
    let end = events
        .iter()
        .map(|(offset, event)| offset + event.duration() as f64)
        .fold(0.0, f64::max);
    let total_frames = seconds_to_frames(end, sample_rate);
    let output_channels = channels as usize;

    let mut buffer = AudioBuffer::silent(total_frames, sample_rate, channels);

    for (offset, event) in events {
        let start_frame = (offset * sample_rate as f64) as usize;
        for voice in &event.voices {
            let mut player = VoicePlayer::new(*voice, sample_rate);
            let mut frame_idx = start_frame;
            while !player.is_finished() && frame_idx < total_frames {
                let value = player.next_sample();
                for ch in 0..output_channels {
                    buffer.samples[frame_idx * output_channels + ch] += value;
                }
                frame_idx += 1;
            }
        }
    }

    buffer
}

pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.channels,
        sample_rate: buffer.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;

    for &sample in &buffer.samples {
        writer.write_sample(sample)?;
    }

    writer.finalize()?;
    Ok(())
}
