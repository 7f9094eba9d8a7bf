use crate::error::{Result, StegoError};
use serde::{Deserialize, Serialize};
use std::io::{self, Read};

/// Stamp identifying openstego-formatted data at the start of the header stream
pub const MAGIC: &[u8; 9] = b"OPENSTEGO";

/// Header size: magic + 4 bytes (length) + 1 byte (channel bits) + 1 byte (compression)
pub const HEADER_SIZE: usize = MAGIC.len() + 6;

/// Largest payload the legacy length field can describe without losing bits
pub const LEGACY_MAX_LENGTH: usize = (1 << 24) - 1;

/// Wire-format compatibility options
///
/// `Legacy` reproduces the historical encoder byte for byte, including its
/// length field whose most significant byte is always written as zero and its
/// fixed key-derivation salt. `Corrected` writes the full 32-bit length and
/// uses a random salt per encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Legacy,
    #[default]
    Corrected,
}

impl std::str::FromStr for Compatibility {
    type Err = StegoError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "corrected" => Ok(Self::Corrected),
            _ => Err(StegoError::InvalidConfig(format!(
                "compatibility: {}",
                s
            ))),
        }
    }
}

/// Self-describing header written in front of every embedded payload
/// Layout: [magic: 9][data_length: 4 LE][channel_bits_used: 1][compressed: 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsbHeader {
    /// Length of the (compressed/encrypted) payload following the header
    pub data_length: u32,
    /// Low-order bits used per colour channel for the payload (1..=8)
    pub channel_bits_used: u8,
    /// Whether the payload was compressed before embedding
    pub compressed: bool,
}

impl LsbHeader {
    pub fn new(data_length: usize, channel_bits_used: u8, compressed: bool) -> Result<Self> {
        if !(1..=8).contains(&channel_bits_used) {
            return Err(StegoError::InvalidConfig(format!(
                "channel bits used must be between 1 and 8, got {}",
                channel_bits_used
            )));
        }
        let data_length = u32::try_from(data_length)
            .map_err(|_| StegoError::PayloadTooLarge(data_length))?;
        Ok(Self {
            data_length,
            channel_bits_used,
            compressed,
        })
    }

    /// Serialize header to bytes
    pub fn to_bytes(&self, compat: Compatibility) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        let n = MAGIC.len();
        buf[..n].copy_from_slice(MAGIC);

        let mut length = self.data_length.to_le_bytes();
        if compat == Compatibility::Legacy {
            length[3] = 0;
        }
        buf[n..n + 4].copy_from_slice(&length);
        buf[n + 4] = self.channel_bits_used;
        buf[n + 5] = u8::from(self.compressed);
        buf
    }

    /// Deserialize header from bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(StegoError::InvalidHeader(format!(
                "need {} bytes, got {}",
                HEADER_SIZE,
                data.len()
            )));
        }
        let n = MAGIC.len();
        if &data[..n] != MAGIC {
            return Err(StegoError::InvalidHeader("magic stamp mismatch".into()));
        }

        let mut length = [0u8; 4];
        length.copy_from_slice(&data[n..n + 4]);
        let channel_bits_used = data[n + 4];
        if !(1..=8).contains(&channel_bits_used) {
            return Err(StegoError::InvalidHeader(format!(
                "channel bits used out of range: {}",
                channel_bits_used
            )));
        }

        Ok(Self {
            data_length: u32::from_le_bytes(length),
            channel_bits_used,
            compressed: data[n + 5] != 0,
        })
    }

    /// Read exactly one header from a byte source
    pub fn read_from<R: Read>(source: &mut R) -> Result<Self> {
        let mut buf = [0u8; HEADER_SIZE];
        match source.read_exact(&mut buf) {
            Ok(()) => Self::from_bytes(&buf),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(
                StegoError::InvalidHeader("stream ended before the header was complete".into()),
            ),
            Err(e) => Err(e.into()),
        }
    }

    pub fn data_length(&self) -> usize {
        self.data_length as usize
    }
}
