use crate::cpu::{
    addr, Controller, CoreMemory, CpuError, InputLatch, MemoryView, Operation, Status, StatusFlag,
    PROGRAM_START, STACK_PAGE,
};
use crate::image::MemoryImage;
use std::sync::Arc;

/* why the CPU stopped running */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /* RTS with nothing on the stack; carries the accumulator */
    Returned(u8),
    /* BRK at this address */
    Break { pc: u16 },
    /* asked to stop from outside */
    Ended,
}

pub struct CPU {
    pub accumulator: u8,
    pub index_x: u8,
    pub index_y: u8,
    pub s_register: u8,
    pub program_counter: u16,
    pub status: Status,
    memory: CoreMemory,
    controller: Controller,
    executed: u64,
}

impl CPU {
    pub fn new(image: &MemoryImage) -> CPU {
        CPU {
            accumulator: 0x00,
            index_x: 0x00,
            index_y: 0x00,
            s_register: 0xff,
            program_counter: PROGRAM_START,
            status: Status::default(),
            memory: CoreMemory::new(image),
            controller: Controller::new(),
            executed: 0,
        }
    }

    /**
     * Replaces all of memory with the image and puts every register back to its power-on value.
     * Only ever called between instructions, so no instruction can see a half-copied image.
     */
    pub fn reset(&mut self, image: &MemoryImage) {
        self.memory.load_image(image);
        self.reset_registers();
    }

    fn reset_registers(&mut self) {
        self.accumulator = 0x00;
        self.index_x = 0x00;
        self.index_y = 0x00;
        /* starts high and grows towards 0 */
        self.s_register = 0xff;
        self.program_counter = PROGRAM_START;
        self.status = Status::default();
        self.executed = 0;
    }

    /* performs one operation; returns the reason for stopping if this was the last one */
    pub fn transition(&mut self) -> Result<Option<Halt>, CpuError> {
        self.controller.record_data(&mut self.memory);

        let operation = Operation::fetch(self);
        log::trace!("PC: 0x{:04x}, {}", operation.pc, operation.descriptor);

        let result = operation.apply(self);
        self.executed += 1;
        result
    }

    pub fn update_flag(&mut self, flag: StatusFlag, new_val: bool) {
        self.status.set(flag, new_val);
    }

    pub fn update_zero_neg_flags(&mut self, new_val: u8) {
        self.update_flag(StatusFlag::Zero, new_val == 0);
        self.update_flag(StatusFlag::Negative, new_val & 0x80 != 0);
    }

    pub fn push(&mut self, data: u8) {
        self.write_mem(addr(self.s_register, (STACK_PAGE >> 8) as u8), data);
        self.s_register = self.s_register.wrapping_sub(1);
    }

    pub fn pop(&mut self) -> u8 {
        self.s_register = self.s_register.wrapping_add(1);
        self.read_mem(addr(self.s_register, (STACK_PAGE >> 8) as u8))
    }

    /* high byte first, so the low byte sits on top of the stack */
    pub fn push_memory_loc(&mut self, mem_loc: u16) {
        self.push((mem_loc >> 8) as u8);
        self.push((mem_loc & 0xff) as u8);
    }

    pub fn pop_memory_loc(&mut self) -> u16 {
        let lower = self.pop();
        let upper = self.pop();

        addr(lower, upper)
    }

    pub fn write_mem(&mut self, addr: u16, data: u8) {
        self.memory.write(addr, data);
    }

    pub fn read_mem(&self, addr: u16) -> u8 {
        self.memory.read(addr)
    }

    pub fn read_mem16(&self, addr: u16) -> u16 {
        self.memory.read16(addr)
    }

    pub fn read_mem16_zero_page(&self, addr: u8) -> u16 {
        self.memory.read16_zero_page(addr)
    }

    pub fn memory_view(&self) -> MemoryView {
        self.memory.view()
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> MemoryImage {
        self.memory.snapshot()
    }

    pub fn set_input_source(&mut self, input_source: Arc<InputLatch>) {
        self.controller.set_input_source(input_source);
    }

    /* instructions run since the last reset */
    pub fn executed(&self) -> u64 {
        self.executed
    }
}
