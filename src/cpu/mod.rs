/* the state of the cpu at a given time */
mod addressing_mode;
mod controller;
mod core_memory;
#[allow(clippy::module_inception)]
mod cpu;
mod error;
mod instruction;
mod operation;
mod status_flag;

#[cfg(test)]
mod tests;

pub use addressing_mode::AddressingMode;
pub use controller::{Controller, InputLatch};
pub use core_memory::{CoreMemory, MemoryView};
pub use cpu::{Halt, CPU};
pub use error::CpuError;
pub use instruction::{decode, Descriptor};
pub use operation::Operation;
pub use status_flag::{Status, StatusFlag};

use crate::display::{DISPLAY_PAGES, DISPLAY_START};

pub const MEMORY_SIZE: usize = 1 << 16;
pub const PAGE_SIZE: u16 = 0x100;

/* fixed, page-aligned regions of the address space */
pub const ZERO_PAGE_START: u16 = 0x0000;
pub const STACK_PAGE: u16 = 0x0100;
pub const IO_START: u16 = 0x0200;

/* execution begins right after the framebuffer */
pub const PROGRAM_START: u16 = DISPLAY_START + DISPLAY_PAGES * PAGE_SIZE;

/* memory-mapped input registers, refreshed by the engine every loop */
pub const POINTER_X_ADDRESS: u16 = IO_START;
pub const POINTER_Y_ADDRESS: u16 = IO_START | 0x01;

/**
 * Converts a pair of bytes into a u16 to look up an address in memory.
 * The 6502 is little-endian, so this expects the low-order byte first.
 * addr(0xCD, 0xAB) returns 0xABCD.
 */
pub fn addr(lo_byte: u8, hi_byte: u8) -> u16 {
    ((hi_byte as u16) << 8) | (lo_byte as u16)
}

/**
 * Zero-page address operations take a single-byte and result in an
 * address on the first page of memory, which has addresses that begin
 * with 0x00. If this is passed in 0xAB, it returns 0x00AB. In effect this
 * is just a cast, but wrapping it as a function makes the goal clearer.
 */
pub fn zero_page_addr(b1: u8) -> u16 {
    ZERO_PAGE_START | b1 as u16
}
