use super::capacity::{max_payload, plan_channel_bits};
use super::{Cursor, CHANNEL_SHIFTS};
use crate::config::StegoConfig;
use crate::error::{Result, StegoError};
use crate::header::{Compatibility, LsbHeader};
use crate::raster::PixelGrid;

/// Writes a byte stream into the low-order bits of a private copy of the cover
///
/// The header goes out during construction; afterwards the caller writes
/// exactly `data_length` payload bytes and calls [`LsbWriter::close`] (or
/// [`LsbWriter::into_image`], which closes implicitly).
#[derive(Debug)]
pub struct LsbWriter {
    image: PixelGrid,
    cursor: Cursor,
    channel_bits: u8,
    bits: [bool; 24],
    filled: usize,
    header: LsbHeader,
    max_bits: u8,
    closed: bool,
}

impl LsbWriter {
    /// Plan the channel depth for `data_length` payload bytes and write the header
    pub fn new(
        cover: &PixelGrid,
        data_length: usize,
        compressed: bool,
        config: &StegoConfig,
    ) -> Result<Self> {
        cover.ensure_supported()?;

        let channel_bits = plan_channel_bits(
            cover.pixel_count(),
            data_length,
            config.max_bits_per_channel,
            config.compatibility,
        )?;
        log::debug!(
            "planned {} bit(s) per channel for {} payload bytes in {}x{} image",
            channel_bits,
            data_length,
            cover.width(),
            cover.height()
        );
        let header = LsbHeader::new(data_length, channel_bits, compressed)?;

        let mut writer = Self {
            image: cover.clone(),
            cursor: Cursor::default(),
            channel_bits: 1,
            bits: [false; 24],
            filled: 0,
            header,
            max_bits: config.max_bits_per_channel,
            closed: false,
        };

        for byte in header.to_bytes(config.compatibility) {
            writer.write(byte)?;
        }
        // Realign to a pixel boundary before the payload depth takes effect
        if writer.filled > 0 {
            writer.flush_bits()?;
        }
        writer.channel_bits = channel_bits;
        Ok(writer)
    }

    pub fn header(&self) -> &LsbHeader {
        &self.header
    }

    pub fn channel_bits_used(&self) -> u8 {
        self.header.channel_bits_used
    }

    /// Write one byte, most significant bit first
    pub fn write(&mut self, byte: u8) -> Result<()> {
        if self.closed {
            return Err(StegoError::Unexpected("write after close".into()));
        }
        for shift in (0..8).rev() {
            self.bits[self.filled] = (byte >> shift) & 1 == 1;
            self.filled += 1;
            if self.filled == 3 * self.channel_bits as usize {
                self.flush_bits()?;
            }
        }
        Ok(())
    }

    pub fn write_slice(&mut self, data: &[u8]) -> Result<()> {
        data.iter().try_for_each(|&b| self.write(b))
    }

    /// Zero-pad and flush any partial bit group; later calls do nothing
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        if self.filled > 0 {
            self.flush_bits()?;
        }
        self.closed = true;
        Ok(())
    }

    /// Close the stream and hand back the stego image
    pub fn into_image(mut self) -> Result<PixelGrid> {
        self.close()?;
        Ok(self.image)
    }

    fn flush_bits(&mut self) -> Result<()> {
        if self.cursor.y >= self.image.height() || self.cursor.x >= self.image.width() {
            // Nothing more can land in the image; refuse further writes
            self.closed = true;
            self.filled = 0;
            return Err(StegoError::InsufficientCapacity {
                needed: self.header.data_length(),
                capacity: max_payload(
                    self.image.pixel_count(),
                    self.max_bits,
                    Compatibility::Corrected,
                ),
            });
        }

        let d = self.channel_bits as usize;
        let mask = (1u32 << d) - 1;
        let mut pixel = self.image.get(self.cursor.x, self.cursor.y);
        for (channel, shift) in CHANNEL_SHIFTS.iter().enumerate() {
            let value = self.bits[channel * d..(channel + 1) * d]
                .iter()
                .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit));
            pixel = (pixel & !(mask << shift)) | (value << shift);
        }
        self.image.set(self.cursor.x, self.cursor.y, pixel);

        self.bits = [false; 24];
        self.filled = 0;
        self.cursor.advance(self.image.width());
        Ok(())
    }
}
