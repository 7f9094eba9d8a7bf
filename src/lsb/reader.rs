use super::capacity::header_pixels;
use super::{Cursor, CHANNEL_SHIFTS};
use crate::error::{Result, StegoError};
use crate::header::LsbHeader;
use crate::raster::PixelGrid;
use std::io::{self, Read};

/// Reads the byte stream hidden in a stego image
///
/// Construction decodes and validates the header; afterwards [`LsbReader::read`]
/// yields payload bytes. The stream only ends when the image runs out of
/// pixels, so callers stop after [`LsbReader::data_length`] bytes.
#[derive(Debug)]
pub struct LsbReader<'a> {
    image: &'a PixelGrid,
    cursor: Cursor,
    channel_bits: u8,
    bits: [bool; 24],
    available: usize,
    pos: usize,
    header: LsbHeader,
}

impl<'a> LsbReader<'a> {
    pub fn new(image: &'a PixelGrid) -> Result<Self> {
        image.ensure_supported()?;

        let mut reader = Self {
            image,
            cursor: Cursor::default(),
            channel_bits: 1,
            bits: [false; 24],
            available: 0,
            pos: 0,
            header: LsbHeader {
                data_length: 0,
                channel_bits_used: 1,
                compressed: false,
            },
        };

        let header = LsbHeader::read_from(&mut reader)?;
        // Drop the rest of the current pixel so the payload starts on a boundary
        reader.pos = reader.available;
        reader.channel_bits = header.channel_bits_used;
        reader.header = header;

        let remaining = image.pixel_count().saturating_sub(header_pixels());
        let room = remaining * 3 * header.channel_bits_used as usize / 8;
        if header.data_length() > room {
            return Err(StegoError::InvalidHeader(format!(
                "announced {} bytes but image holds at most {}",
                header.data_length(),
                room
            )));
        }
        log::debug!(
            "header: {} bytes at {} bit(s) per channel, compressed: {}",
            header.data_length,
            header.channel_bits_used,
            header.compressed
        );
        Ok(reader)
    }

    pub fn header(&self) -> &LsbHeader {
        &self.header
    }

    pub fn data_length(&self) -> usize {
        self.header.data_length()
    }

    pub fn channel_bits_used(&self) -> u8 {
        self.header.channel_bits_used
    }

    pub fn is_compressed(&self) -> bool {
        self.header.compressed
    }

    /// Next byte, or `None` once the image is exhausted
    pub fn read(&mut self) -> Option<u8> {
        let mut byte = 0u8;
        for _ in 0..8 {
            byte = (byte << 1) | u8::from(self.next_bit()?);
        }
        Some(byte)
    }

    /// Read exactly the announced payload
    pub fn read_payload(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::with_capacity(self.data_length());
        for _ in 0..self.data_length() {
            let byte = self.read().ok_or_else(|| {
                StegoError::CorruptData("image exhausted before end of payload".into())
            })?;
            data.push(byte);
        }
        Ok(data)
    }

    fn next_bit(&mut self) -> Option<bool> {
        if self.pos == self.available && !self.load_pixel() {
            return None;
        }
        let bit = self.bits[self.pos];
        self.pos += 1;
        Some(bit)
    }

    fn load_pixel(&mut self) -> bool {
        if self.cursor.y >= self.image.height() || self.cursor.x >= self.image.width() {
            return false;
        }
        let d = self.channel_bits as usize;
        let pixel = self.image.get(self.cursor.x, self.cursor.y);
        for (channel, shift) in CHANNEL_SHIFTS.iter().enumerate() {
            let value = (pixel >> shift) & ((1u32 << d) - 1);
            for i in 0..d {
                self.bits[channel * d + i] = (value >> (d - 1 - i)) & 1 == 1;
            }
        }
        self.available = 3 * d;
        self.pos = 0;
        self.cursor.advance(self.image.width());
        true
    }
}

impl Read for LsbReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        for slot in buf.iter_mut() {
            match LsbReader::read(self) {
                Some(byte) => *slot = byte,
                None => break,
            }
            n += 1;
        }
        Ok(n)
    }
}
