use crate::error::{Result, StegoError};
use crate::header::{Compatibility, HEADER_SIZE};

/// Upper bound for the channel-bit depth
pub const MAX_CHANNEL_BITS: u8 = 8;

/// Pixels consumed by the header, which is always written at depth 1
pub fn header_pixels() -> usize {
    (HEADER_SIZE * 8).div_ceil(3)
}

/// Pixels needed to carry `payload_len` bytes at depth `channel_bits`
pub fn payload_pixels(payload_len: usize, channel_bits: u8) -> usize {
    (payload_len * 8).div_ceil(3 * channel_bits as usize)
}

/// Historical estimate: the header is priced at depth `channel_bits` too
fn legacy_estimate(pixel_count: usize, payload_len: usize, channel_bits: u8) -> bool {
    (pixel_count * 3 * channel_bits as usize) / 8 >= HEADER_SIZE + payload_len
}

/// Exact pixel cost of a depth-1 header followed by the payload at `channel_bits`
fn physically_fits(pixel_count: usize, payload_len: usize, channel_bits: u8) -> bool {
    header_pixels() + payload_pixels(payload_len, channel_bits) <= pixel_count
}

/// Whether header + payload fit in `pixel_count` pixels at the given depth
///
/// `Legacy` keeps the historical estimate for picking the depth but also
/// requires the writer to be able to hold the result. Both checks grow with
/// the depth, so the planner still stops at the first depth that passes.
pub fn fits(pixel_count: usize, payload_len: usize, channel_bits: u8, compat: Compatibility) -> bool {
    match compat {
        Compatibility::Legacy => {
            legacy_estimate(pixel_count, payload_len, channel_bits)
                && physically_fits(pixel_count, payload_len, channel_bits)
        }
        Compatibility::Corrected => physically_fits(pixel_count, payload_len, channel_bits),
    }
}

/// Choose the smallest depth in `1..=max_bits` that holds header + payload
pub fn plan_channel_bits(
    pixel_count: usize,
    payload_len: usize,
    max_bits: u8,
    compat: Compatibility,
) -> Result<u8> {
    validate_max_bits(max_bits)?;

    let mut channel_bits = 1u8;
    while !fits(pixel_count, payload_len, channel_bits, compat) {
        channel_bits += 1;
        if channel_bits > max_bits {
            return Err(StegoError::InsufficientCapacity {
                needed: payload_len,
                capacity: max_payload(pixel_count, max_bits, compat),
            });
        }
    }
    Ok(channel_bits)
}

/// Largest payload (bytes after compression/encryption) that plans successfully
pub fn max_payload(pixel_count: usize, max_bits: u8, compat: Compatibility) -> usize {
    let bits = max_bits.clamp(1, MAX_CHANNEL_BITS) as usize;
    let exact = pixel_count.saturating_sub(header_pixels()) * 3 * bits / 8;
    match compat {
        Compatibility::Legacy => {
            ((pixel_count * 3 * bits) / 8).saturating_sub(HEADER_SIZE).min(exact)
        }
        Compatibility::Corrected => exact,
    }
}

pub fn validate_max_bits(max_bits: u8) -> Result<()> {
    if !(1..=MAX_CHANNEL_BITS).contains(&max_bits) {
        return Err(StegoError::InvalidConfig(format!(
            "max bits per channel must be between 1 and {}, got {}",
            MAX_CHANNEL_BITS, max_bits
        )));
    }
    Ok(())
}
