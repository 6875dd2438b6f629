use cpal::{
    FromSample, SizedSample,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use kitchen_tone::{AudioBackend, AudioOutput, Command, Status, ToneEvent, VoicePlayer};

const COMMAND_CAPACITY: usize = 64;
const STATUS_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no output device found")]
    NoOutputDevice,

    #[error("unsupported sample format '{0}'")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to query output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Master gain applied after mixing.
    pub volume: f32,
    /// Size of the preallocated voice pool. Voices beyond it are dropped.
    pub max_voices: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            max_voices: 32,
        }
    }
}

/// Voice pool owned by the audio callback.
struct Mixer {
    voices: Vec<VoicePlayer>,
    capacity: usize,
    volume: f32,
    sample_rate: u32,
    dropped: u64,
    reported: u64,
}

impl Mixer {
    fn new(sample_rate: u32, config: EngineConfig) -> Self {
        Self {
            voices: Vec::with_capacity(config.max_voices),
            capacity: config.max_voices,
            volume: config.volume,
            sample_rate,
            dropped: 0,
            reported: 0,
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Voice(voice) => {
                // Stay within the preallocated capacity so the callback never allocates
                if self.voices.len() < self.capacity {
                    self.voices.push(VoicePlayer::new(voice, self.sample_rate));
                } else {
                    self.dropped += 1;
                }
            }
            Command::Silence => self.voices.clear(),
        }
    }

    fn fill<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: SizedSample + FromSample<f32>,
    {
        for frame in data.chunks_mut(channels) {
            let mut mixed = 0.0f32;
            for voice in self.voices.iter_mut() {
                mixed += voice.next_sample();
            }
            let value = (mixed * self.volume).clamp(-1.0, 1.0);
            for sample in frame.iter_mut() {
                *sample = T::from_sample(value);
            }
        }
        self.voices.retain(|voice| !voice.is_finished());
    }

    fn active(&self) -> usize {
        self.voices.len()
    }

    /// New drop total since the last call, if any voices were dropped.
    fn take_dropped(&mut self) -> Option<u64> {
        if self.dropped == self.reported {
            return None;
        }
        self.reported = self.dropped;
        Some(self.dropped)
    }
}

pub struct AudioEngineHandle {
    commands: rtrb::Producer<Command>,
    status: rtrb::Consumer<Status>,
    sample_rate: u32,
    active_voices: usize,
    stream: cpal::Stream,
}

pub fn start(config: EngineConfig) -> Result<AudioEngineHandle, EngineError> {
    let (command_tx, command_rx) = rtrb::RingBuffer::<Command>::new(COMMAND_CAPACITY);
    let (status_tx, status_rx) = rtrb::RingBuffer::<Status>::new(STATUS_CAPACITY);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;

    let supported = device.default_output_config()?;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();
    let sample_rate = stream_config.sample_rate.0;

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &stream_config, config, command_rx, status_tx)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &stream_config, config, command_rx, status_tx)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &stream_config, config, command_rx, status_tx)?
        }
        other => return Err(EngineError::UnsupportedFormat(other)),
    };

    stream.play()?;
    log::info!(
        "audio output opened: {} Hz, {} channels, {sample_format}",
        sample_rate,
        stream_config.channels
    );

    Ok(AudioEngineHandle {
        commands: command_tx,
        status: status_rx,
        sample_rate,
        active_voices: 0,
        stream,
    })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    engine_config: EngineConfig,
    mut command_rx: rtrb::Consumer<Command>,
    mut status_tx: rtrb::Producer<Status>,
) -> Result<cpal::Stream, EngineError>
where
    T: SizedSample + FromSample<f32>,
{
    let output_channels = config.channels as usize;
    let mut mixer = Mixer::new(config.sample_rate.0, engine_config);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(command) = command_rx.pop() {
                mixer.apply(command);
            }

            mixer.fill(data, output_channels);

            let _ = status_tx.push(Status::ActiveVoices(mixer.active()));
            if let Some(total) = mixer.take_dropped() {
                let _ = status_tx.push(Status::DroppedVoices(total));
            }
        },
        |err| log::error!("stream error: {err}"),
        None,
    )?;

    Ok(stream)
}

impl AudioEngineHandle {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Drain status messages. Returns the latest voice count if anything arrived.
    pub fn poll(&mut self) -> Option<usize> {
        let mut latest = None;
        while let Ok(status) = self.status.pop() {
            match status {
                Status::ActiveVoices(count) => {
                    self.active_voices = count;
                    latest = Some(count);
                }
                Status::DroppedVoices(total) => {
                    log::warn!("voice pool full, {total} voices dropped so far");
                }
            }
        }
        latest
    }

    pub fn active_voices(&self) -> usize {
        self.active_voices
    }
}

impl AudioOutput for AudioEngineHandle {
    fn trigger(&mut self, event: &ToneEvent) {
        self.poll();
        for voice in &event.voices {
            if self.commands.push(Command::Voice(*voice)).is_err() {
                log::warn!("engine command queue full, dropping voice");
            }
        }
    }

    fn close(mut self) {
        let _ = self.commands.push(Command::Silence);
        if let Err(err) = self.stream.pause() {
            log::debug!("pausing output stream on close: {err}");
        }
        log::info!("audio output released");
    }
}

/// Opens the default cpal output device on demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpalBackend {
    pub config: EngineConfig,
}

impl CpalBackend {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl AudioBackend for CpalBackend {
    type Output = AudioEngineHandle;

    fn open(&mut self) -> anyhow::Result<AudioEngineHandle> {
        Ok(start(self.config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kitchen_tone::generate_chord;
    use rand::{SeedableRng, rngs::StdRng};

    const SAMPLE_RATE: u32 = 48000;

    fn chime_voice() -> kitchen_tone::Voice {
        ToneEvent::chime().voices[0]
    }

    #[test]
    fn test_mixer_outputs_silence_without_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE, EngineConfig::default());
        let mut data = vec![1.0f32; 256];
        mixer.fill(&mut data, 2);
        assert!(data.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_mixer_writes_same_value_to_every_channel() {
        let mut mixer = Mixer::new(SAMPLE_RATE, EngineConfig::default());
        mixer.apply(Command::Voice(chime_voice()));

        let mut data = vec![0.0f32; 512];
        mixer.fill(&mut data, 2);
        for frame in data.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert!(data.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn test_mixer_drops_voices_beyond_capacity() {
        let config = EngineConfig {
            volume: 1.0,
            max_voices: 2,
        };
        let mut mixer = Mixer::new(SAMPLE_RATE, config);
        for _ in 0..5 {
            mixer.apply(Command::Voice(chime_voice()));
        }
        assert_eq!(mixer.active(), 2);
        assert_eq!(mixer.take_dropped(), Some(3));
        assert_eq!(mixer.take_dropped(), None, "reported once");

        mixer.apply(Command::Voice(chime_voice()));
        assert_eq!(mixer.take_dropped(), Some(4));
    }

    #[test]
    fn test_mixer_reports_nothing_when_pool_has_room() {
        let mut mixer = Mixer::new(SAMPLE_RATE, EngineConfig::default());
        mixer.apply(Command::Voice(chime_voice()));
        assert_eq!(mixer.take_dropped(), None);
    }

    #[test]
    fn test_mixer_silence_clears_pool() {
        let mut mixer = Mixer::new(SAMPLE_RATE, EngineConfig::default());
        let chord = generate_chord(&mut StdRng::seed_from_u64(3));
        for voice in &chord.voices {
            mixer.apply(Command::Voice(*voice));
        }
        assert_eq!(mixer.active(), chord.voices.len());

        mixer.apply(Command::Silence);
        assert_eq!(mixer.active(), 0);
    }

    #[test]
    fn test_mixer_retires_finished_voices() {
        let mut mixer = Mixer::new(SAMPLE_RATE, EngineConfig::default());
        mixer.apply(Command::Voice(chime_voice()));

        // One second of mono output covers the whole chime
        let mut data = vec![0.0f32; SAMPLE_RATE as usize + 1];
        mixer.fill(&mut data, 1);
        assert_eq!(mixer.active(), 0);
    }

    #[test]
    fn test_mixer_converts_to_integer_samples() {
        let mut mixer = Mixer::new(SAMPLE_RATE, EngineConfig::default());
        mixer.apply(Command::Voice(chime_voice()));

        let mut data = vec![0i16; 1024];
        mixer.fill(&mut data, 1);
        assert!(data.iter().any(|&s| s != 0));
    }
}
