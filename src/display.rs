use crate::config::{PIXEL_OFF_COLOR, PIXEL_ON_COLOR};
use crate::cpu::MemoryView;

pub const DISPLAY_START: u16 = 0x0300;
pub const DISPLAY_PAGES: u16 = 2;
pub const DISPLAY_WIDTH: u32 = 64;
pub const DISPLAY_HEIGHT: u32 = 64;

/* one bit per pixel */
pub const DISPLAY_BYTES: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT / 8) as usize;
const BYTES_PER_ROW: usize = DISPLAY_WIDTH as usize / 8;

/* RGBA, as the pixels crate expects */
#[cfg(test)]
pub const FRAME_BYTES: usize = (DISPLAY_WIDTH * DISPLAY_HEIGHT * 4) as usize;

pub type DisplayRegion = [u8; DISPLAY_BYTES];

/**
 * Each byte holds eight horizontally adjacent pixels, leftmost in the high bit:
 * byte 0 is [p7 .. p0] reading right to left, byte 1 is [p15 .. p8], and so on.
 */
pub fn read_pixel(region: &[u8], x: u32, y: u32) -> bool {
    let byte_index = x as usize / 8 + y as usize * BYTES_PER_ROW;
    let bit_test = 1 << (7 - (x % 8));
    region[byte_index] & bit_test != 0
}

/* the framebuffer as it is right now; may be mid-update if the program is drawing */
pub fn capture_region(view: &MemoryView) -> DisplayRegion {
    let mut region = [0; DISPLAY_BYTES];
    view.copy_slice(DISPLAY_START, &mut region);
    region
}

pub fn render_frame(region: &[u8], frame: &mut [u8]) {
    for (i, pixel) in frame.chunks_exact_mut(4).enumerate() {
        let x = i as u32 % DISPLAY_WIDTH;
        let y = i as u32 / DISPLAY_WIDTH;
        let color = if read_pixel(region, x, y) {
            PIXEL_ON_COLOR
        } else {
            PIXEL_OFF_COLOR
        };
        pixel.copy_from_slice(&color);
    }
}
