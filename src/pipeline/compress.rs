use crate::error::{Result, StegoError};

/// zstd level used for embedded payloads
pub const COMPRESSION_LEVEL: i32 = 3;

/// Compress a payload before it is encrypted and embedded
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    zstd::encode_all(data, COMPRESSION_LEVEL)
        .map_err(|e| StegoError::CompressionError(format!("zstd: {}", e)))
}

/// Decompress an extracted payload
///
/// A failure here after a successful decryption usually means a wrong
/// password that happened to produce valid padding.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data).map_err(|e| StegoError::CorruptData(format!("zstd: {}", e)))
}
