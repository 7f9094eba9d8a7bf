//! Bit-channel multiplexing through the low-order bits of pixel colour channels.
//!
//! Pixels are visited in row-major order. Each visited pixel carries `3 * d`
//! bits: the first `d` go into red, the next `d` into green, the last `d` into
//! blue, most significant first. The alpha channel is never touched.
//!
//! The header is always carried at `d = 1` so any reader can bootstrap; the
//! cursor then moves to the next pixel boundary and the payload continues at
//! the depth announced in the header.

pub mod capacity;
pub mod reader;
pub mod writer;

pub use capacity::*;
pub use reader::*;
pub use writer::*;

/// Shift of the red, green and blue bytes inside a packed ARGB value
pub(crate) const CHANNEL_SHIFTS: [u32; 3] = [16, 8, 0];

/// Row-major position in the pixel grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub x: u32,
    pub y: u32,
}

impl Cursor {
    pub fn advance(&mut self, width: u32) {
        self.x += 1;
        if self.x >= width {
            self.x = 0;
            self.y += 1;
        }
    }
}
