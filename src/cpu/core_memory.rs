use crate::image::MemoryImage;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

type Cells = Arc<[AtomicU8]>;

/**
 * The full 64k address space. The CPU that owns this is the only writer; anything else gets a
 * [MemoryView]. Every cell is an independent relaxed atomic, so an observer on another thread
 * can read at any time without locking the emulation, at the cost of possibly seeing a frame
 * that is half old and half new. There's no tear protection and none is needed by the display.
 */
pub struct CoreMemory {
    cells: Cells,
}

/* read-only, cheaply clonable handle into a CoreMemory */
#[derive(Clone)]
pub struct MemoryView {
    cells: Cells,
}

impl CoreMemory {
    pub fn new(image: &MemoryImage) -> CoreMemory {
        let cells: Vec<AtomicU8> = image.as_bytes().iter().map(|&b| AtomicU8::new(b)).collect();
        CoreMemory {
            cells: cells.into(),
        }
    }

    pub fn read(&self, address: u16) -> u8 {
        read_cell(&self.cells, address)
    }

    /* little-endian word; the high byte address wraps from 0xffff to 0x0000 */
    pub fn read16(&self, address: u16) -> u16 {
        let lo_byte = self.read(address) as u16;
        let hi_byte = self.read(address.wrapping_add(1)) as u16;

        lo_byte | (hi_byte << 8)
    }

    /* little-endian word stored in the zero page; the high byte wraps from 0xff to 0x00 */
    pub fn read16_zero_page(&self, address: u8) -> u16 {
        let lo_byte = self.read(address as u16) as u16;
        let hi_byte = self.read(address.wrapping_add(1) as u16) as u16;

        lo_byte | (hi_byte << 8)
    }

    pub fn write(&mut self, address: u16, value: u8) {
        self.cells[address as usize].store(value, Ordering::Relaxed);
    }

    /* overwrite every byte of memory with the contents of the image */
    pub fn load_image(&mut self, image: &MemoryImage) {
        for (cell, &byte) in self.cells.iter().zip(image.as_bytes().iter()) {
            cell.store(byte, Ordering::Relaxed);
        }
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> MemoryImage {
        snapshot_cells(&self.cells)
    }

    pub fn view(&self) -> MemoryView {
        MemoryView {
            cells: self.cells.clone(),
        }
    }
}

impl MemoryView {
    #[cfg(test)]
    pub fn read(&self, address: u16) -> u8 {
        read_cell(&self.cells, address)
    }

    pub fn copy_slice(&self, address: u16, dest: &mut [u8]) {
        copy_cells(&self.cells, address, dest);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> MemoryImage {
        snapshot_cells(&self.cells)
    }
}

fn read_cell(cells: &Cells, address: u16) -> u8 {
    cells[address as usize].load(Ordering::Relaxed)
}

/* NB: wraps around the top of memory rather than stopping at 0xffff */
fn copy_cells(cells: &Cells, address: u16, dest: &mut [u8]) {
    let mut current = address;
    for byte in dest.iter_mut() {
        *byte = read_cell(cells, current);
        current = current.wrapping_add(1);
    }
}

#[cfg(test)]
fn snapshot_cells(cells: &Cells) -> MemoryImage {
    let mut bytes = Box::new([0; crate::cpu::MEMORY_SIZE]);
    copy_cells(cells, 0, bytes.as_mut_slice());
    MemoryImage::from_array(bytes)
}
