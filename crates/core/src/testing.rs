//! In-memory audio backend that records everything produced into it.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use kitchen_tone::{AudioBackend, AudioOutput, ToneEvent};

#[derive(Debug, Default)]
pub struct Recording {
    pub opened: u32,
    pub closed: u32,
    pub events: Vec<ToneEvent>,
}

impl Recording {
    pub fn chimes(&self) -> usize {
        self.events.iter().filter(|e| e.is_chime()).count()
    }

    pub fn chords(&self) -> usize {
        self.events.iter().filter(|e| !e.is_chime()).count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    log: Rc<RefCell<Recording>>,
    fail: bool,
}

impl RecordingBackend {
    /// A backend whose device can never be opened.
    pub fn unavailable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn recording(&self) -> Ref<'_, Recording> {
        self.log.borrow()
    }
}

pub struct RecordingOutput {
    log: Rc<RefCell<Recording>>,
}

impl AudioOutput for RecordingOutput {
    fn trigger(&mut self, event: &ToneEvent) {
        self.log.borrow_mut().events.push(event.clone());
    }

    fn close(self) {
        self.log.borrow_mut().closed += 1;
    }
}

impl AudioBackend for RecordingBackend {
    type Output = RecordingOutput;

    fn open(&mut self) -> anyhow::Result<RecordingOutput> {
        if self.fail {
            anyhow::bail!("no output device found");
        }
        self.log.borrow_mut().opened += 1;
        Ok(RecordingOutput {
            log: Rc::clone(&self.log),
        })
    }
}
