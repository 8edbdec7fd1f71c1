use crate::cpu::{CoreMemory, POINTER_X_ADDRESS, POINTER_Y_ADDRESS};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/**
 * Latest pointer position over the display, in display pixels. Written by the window thread
 * whenever the cursor moves, read by the emulation thread once per instruction.
 */
#[derive(Default)]
pub struct InputLatch {
    x: AtomicU8,
    y: AtomicU8,
}

impl InputLatch {
    pub fn new() -> InputLatch {
        InputLatch::default()
    }

    pub fn set_pointer(&self, x: u8, y: u8) {
        self.x.store(x, Ordering::Relaxed);
        self.y.store(y, Ordering::Relaxed);
    }

    pub fn pointer(&self) -> (u8, u8) {
        (self.x.load(Ordering::Relaxed), self.y.load(Ordering::Relaxed))
    }
}

/* copies the input latch into the memory-mapped input registers */
#[derive(Default)]
pub struct Controller {
    input_source: Option<Arc<InputLatch>>,
}

impl Controller {
    pub fn new() -> Controller {
        Controller { input_source: None }
    }

    pub fn set_input_source(&mut self, input_source: Arc<InputLatch>) {
        self.input_source = Some(input_source);
    }

    /* with no source attached the I/O page is left alone and behaves like plain RAM */
    pub fn record_data(&self, memory: &mut CoreMemory) {
        if let Some(source) = self.input_source.as_ref() {
            let (x, y) = source.pointer();
            memory.write(POINTER_X_ADDRESS, x);
            memory.write(POINTER_Y_ADDRESS, y);
        }
    }
}
