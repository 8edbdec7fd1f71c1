use crate::cpu::CpuError;
use crate::image::{ImageError, MemoryImage};
use std::sync::mpsc::Sender;
use thiserror::Error;

pub mod program_state;

mod scheduler;

pub enum SimulatorSignal {
    /* replace memory and restart at the next instruction boundary */
    Reset(MemoryImage),
    EndSimulation,
}

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("the emulation thread is no longer running")]
    Disconnected,
    #[error("the emulation thread panicked")]
    EnginePanicked,
    #[error("could not start the emulation thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/**
 * The sending half of the emulation thread's mailbox. Anything holding one of these (the file
 * watcher, the window, tests) can stage a new memory image or ask the emulation to stop; the
 * emulation picks the request up between two instructions.
 */
#[derive(Clone)]
pub struct ResetHandle {
    sender: Sender<SimulatorSignal>,
}

impl ResetHandle {
    pub fn new(sender: Sender<SimulatorSignal>) -> ResetHandle {
        ResetHandle { sender }
    }

    pub fn request_reset(&self, image: MemoryImage) -> Result<(), SimulatorError> {
        self.send(SimulatorSignal::Reset(image))
    }

    /* for raw bytes straight off disk; rejects anything that isn't a full image */
    pub fn request_reset_bytes(&self, bytes: Vec<u8>) -> Result<(), SimulatorError> {
        self.request_reset(MemoryImage::try_from(bytes)?)
    }

    pub fn end_simulation(&self) -> Result<(), SimulatorError> {
        self.send(SimulatorSignal::EndSimulation)
    }

    fn send(&self, signal: SimulatorSignal) -> Result<(), SimulatorError> {
        self.sender
            .send(signal)
            .map_err(|_| SimulatorError::Disconnected)
    }
}
