use crate::cpu::{CpuError, Halt, CPU};
use crate::image::MemoryImage;
use crate::simulator::SimulatorSignal;
use std::sync::mpsc::Receiver;

/* what the signal mailbox asked for at this instruction boundary */
enum Pending {
    Nothing,
    Reset(MemoryImage),
    End,
}

pub struct Scheduler {
    cpu: CPU,
    receiver: Receiver<SimulatorSignal>,
}

impl Scheduler {
    pub fn new(cpu: CPU, receiver: Receiver<SimulatorSignal>) -> Self {
        Scheduler { cpu, receiver }
    }

    /**
     * Runs instructions back to back until the program returns with an empty stack, hits BRK,
     * is told to stop, or fails. Signals are only looked at between instructions.
     */
    pub fn simulate(&mut self) -> Result<Halt, CpuError> {
        loop {
            match self.poll_signals() {
                Pending::Nothing => {}
                Pending::Reset(image) => {
                    log::info!(
                        "Reset after {} instructions; reloading memory",
                        self.cpu.executed()
                    );
                    self.cpu.reset(&image);
                    continue;
                }
                Pending::End => {
                    log::info!("Emulation asked to end");
                    return Ok(Halt::Ended);
                }
            }

            match self.cpu.transition() {
                Ok(None) => {}
                Ok(Some(halt)) => {
                    log::info!(
                        "Emulation halted ({halt:?}) after {} instructions",
                        self.cpu.executed()
                    );
                    return Ok(halt);
                }
                Err(error) => {
                    log::error!("Emulation stopped: {error}");
                    return Err(error);
                }
            }
        }
    }

    /* several resets queued up at once collapse into the newest one */
    fn poll_signals(&mut self) -> Pending {
        let mut pending = Pending::Nothing;
        while let Ok(signal) = self.receiver.try_recv() {
            match signal {
                SimulatorSignal::Reset(image) => pending = Pending::Reset(image),
                SimulatorSignal::EndSimulation => return Pending::End,
            }
        }
        pending
    }

    #[cfg(test)]
    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }
}
