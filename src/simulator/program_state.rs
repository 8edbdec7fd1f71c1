use crate::config::{ENGINE_THREAD_NAME, SHUTDOWN_TIMEOUT};
use crate::cpu::{CpuError, Halt, InputLatch, MemoryView, CPU};
use crate::image::MemoryImage;
use crate::simulator::scheduler::Scheduler;
use crate::simulator::{ResetHandle, SimulatorError};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/**
 * Provides an external view into a running emulator state. This packages up the CPU and its
 * memory and runs them on a different thread. This handles all thread communication, as well as
 * joining when complete. Observers get a read-only view of memory; the only way to change what
 * the emulation is doing is through the reset handle.
 */
pub struct ProgramState {
    /* outputs */
    pub memory_view: MemoryView,
    thread_handle: Option<JoinHandle<Result<Halt, CpuError>>>,

    /* communication */
    reset_handle: ResetHandle,
}

impl ProgramState {
    pub fn simulate_async(
        image: &MemoryImage,
        input_source: Arc<InputLatch>,
    ) -> Result<ProgramState, SimulatorError> {
        let mut cpu = CPU::new(image);
        cpu.set_input_source(input_source);
        let memory_view = cpu.memory_view();

        let (thread_sender, thread_receiver) = channel();
        let mut scheduler = Scheduler::new(cpu, thread_receiver);

        let thread_handle = thread::Builder::new()
            .name(ENGINE_THREAD_NAME.to_string())
            .spawn(move || scheduler.simulate())
            .map_err(SimulatorError::Spawn)?;

        Ok(ProgramState {
            memory_view,
            thread_handle: Some(thread_handle),
            reset_handle: ResetHandle::new(thread_sender),
        })
    }

    pub fn reset_handle(&self) -> ResetHandle {
        self.reset_handle.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map_or(true, |handle| handle.is_finished())
    }

    /* blocks until the emulation stops on its own */
    pub fn join(&mut self) -> Result<Halt, SimulatorError> {
        match self.thread_handle.take() {
            None => Err(SimulatorError::Disconnected),
            Some(thread_handle) => match thread_handle.join() {
                Ok(result) => Ok(result?),
                Err(_) => Err(SimulatorError::EnginePanicked),
            },
        }
    }

    /**
     * Tells the emulation thread to stop and waits for it. If it hasn't wound down within the
     * shutdown timeout it is left to die with the process; that returns `Ok(None)`.
     */
    pub fn cleanup(&mut self) -> Result<Option<Halt>, SimulatorError> {
        if self.thread_handle.is_none() {
            return Ok(None);
        }

        /* it may already have stopped by itself, in which case nobody is listening */
        let _ = self.reset_handle.end_simulation();

        let deadline = Instant::now() + SHUTDOWN_TIMEOUT;
        while !self.is_finished() {
            if Instant::now() >= deadline {
                log::warn!("Emulation thread did not stop in time; abandoning it");
                return Ok(None);
            }
            thread::sleep(Duration::from_millis(5));
        }

        self.join().map(Some)
    }
}
