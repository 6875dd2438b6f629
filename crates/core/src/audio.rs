use kitchen_tone::{AudioBackend, AudioOutput};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStatus {
    /// Nothing has produced sound yet.
    Unopened,
    Ready,
    /// The last attempt to open the device failed; sound is off.
    Unavailable,
    Released,
}

/// Lazily opened, exclusively owned audio output for one session.
///
/// The output is opened on first use and closed exactly once by [`AudioSlot::release`].
/// Once released it is never reopened.
pub struct AudioSlot<B: AudioBackend> {
    backend: B,
    output: Option<B::Output>,
    status: AudioStatus,
}

impl<B: AudioBackend> AudioSlot<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            output: None,
            status: AudioStatus::Unopened,
        }
    }

    /// The open output, opening it first if needed. `None` when the device is
    /// unavailable or the slot was released.
    pub fn acquire(&mut self) -> Option<&mut B::Output> {
        if self.status == AudioStatus::Released {
            return None;
        }
        if self.output.is_none() {
            match self.backend.open() {
                Ok(output) => {
                    self.output = Some(output);
                    self.status = AudioStatus::Ready;
                }
                Err(err) => {
                    log::warn!("audio output unavailable, ambient sound off: {err:#}");
                    self.status = AudioStatus::Unavailable;
                    return None;
                }
            }
        }
        self.output.as_mut()
    }

    /// The output if already open; never opens.
    pub fn output_mut(&mut self) -> Option<&mut B::Output> {
        self.output.as_mut()
    }

    pub fn release(&mut self) {
        if let Some(output) = self.output.take() {
            output.close();
        }
        self.status = AudioStatus::Released;
    }

    pub fn status(&self) -> AudioStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.output.is_some()
    }
}
