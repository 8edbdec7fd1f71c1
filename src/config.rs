use std::time::Duration;

pub const WINDOW_TITLE: &str = "[6502]";

/* screen pixels per display pixel */
pub const DEFAULT_SCALE: u32 = 16;
pub const MAX_SCALE: u32 = 64;

pub const PIXEL_ON_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
pub const PIXEL_OFF_COLOR: [u8; 4] = [0x00, 0x00, 0x00, 0xff];

/* how long the emulation thread gets to wind down once asked to stop */
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/* file events closer together than this are one save */
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(100);

pub const ENGINE_THREAD_NAME: &str = "sixfive-cpu";

pub const DEFAULT_LOG_LEVEL: &str = "info";
