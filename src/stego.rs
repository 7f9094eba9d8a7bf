use crate::config::StegoConfig;
use crate::error::{Result, StegoError};
use crate::header::{Compatibility, LEGACY_MAX_LENGTH};
use crate::lsb::{max_payload, LsbReader, LsbWriter};
use crate::pipeline::{compress, decompress, CryptoEnvelope};
use crate::raster::PixelGrid;

/// Hide `payload` in a copy of `cover`
///
/// Pipeline: Compress? → Encrypt? → header → payload bits. The cover is left
/// untouched; the returned grid carries the hidden data.
pub fn embed(payload: &[u8], cover: &PixelGrid, config: &StegoConfig) -> Result<PixelGrid> {
    config.validate()?;
    cover.ensure_supported()?;

    let mut data = payload.to_vec();
    if config.use_compression {
        data = compress(&data)?;
        log::debug!("compressed {} bytes to {}", payload.len(), data.len());
    }
    if config.use_encryption {
        data = envelope(config)?.encrypt(&data)?;
    }
    if config.compatibility == Compatibility::Legacy && data.len() > LEGACY_MAX_LENGTH {
        log::warn!(
            "{} bytes exceed what the legacy length field can describe",
            data.len()
        );
        return Err(StegoError::PayloadTooLarge(data.len()));
    }

    let mut writer = LsbWriter::new(cover, data.len(), config.use_compression, config)?;
    writer.write_slice(&data)?;
    let stego = writer.into_image()?;
    log::debug!("embedded {} bytes", data.len());
    Ok(stego)
}

/// Recover the payload hidden in `stego`
///
/// Pipeline: header → payload bits → Decrypt? → Decompress?. Decompression
/// follows the header's flag; decryption follows the config.
pub fn extract(stego: &PixelGrid, config: &StegoConfig) -> Result<Vec<u8>> {
    config.validate()?;

    let mut reader = LsbReader::new(stego)?;
    let mut data = reader.read_payload()?;
    if config.use_encryption {
        data = envelope(config)?.decrypt(&data)?;
    }
    if reader.is_compressed() {
        data = decompress(&data)?;
    }
    Ok(data)
}

/// Bytes available for the post-compression, post-encryption payload
pub fn capacity(cover: &PixelGrid, config: &StegoConfig) -> Result<usize> {
    config.validate()?;
    cover.ensure_supported()?;
    Ok(max_payload(
        cover.pixel_count(),
        config.max_bits_per_channel,
        config.compatibility,
    ))
}

fn envelope(config: &StegoConfig) -> Result<CryptoEnvelope> {
    let password = config
        .password()
        .ok_or_else(|| StegoError::InvalidConfig("encryption enabled without a password".into()))?;
    Ok(CryptoEnvelope::new(
        password,
        config.encryption_algorithm,
        config.compatibility,
    ))
}
