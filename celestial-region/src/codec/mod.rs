//! Compact binary form for sorted boundary arrays.
//!
//! # Format
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 1 | format version (`1`) |
//! | 1 | 8 | value count, little-endian |
//! | 9 | 8 | largest value, little-endian |
//! | 17 | .. | interpolative-coded values, MSB-first |
//!
//! The body uses binary interpolative coding: the middle value of a sorted
//! run is written relative to the tightest bounds its neighbours allow, then
//! both halves are coded recursively. Dense runs such as the boundaries of
//! neighbouring pixels cost close to zero bits each.
//!
//! The text form used by `REGION(...)` literals is the same bytes in
//! URL-safe base64 without padding.

mod bits;

pub use bits::{BitReader, BitWriter};

use crate::constants::NPIX_MAX_ORDER;
use crate::error::{RegionError, RegionResult};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use byteorder::{ByteOrder, LittleEndian};

const FORMAT_VERSION: u8 = 1;
const HEADER_LEN: usize = 17;
/// Boundary count of the most fragmented order-29 pixel set.
const MAX_VALUE_COUNT: u64 = NPIX_MAX_ORDER + 1;

/// Encodes a strictly increasing sequence.
///
/// The input order is not re-checked; callers pass the boundaries of a
/// valid range set.
pub fn encode_boundaries(values: &[u64]) -> Vec<u8> {
    let max = values.last().copied().unwrap_or(0);
    let mut header = [0u8; HEADER_LEN];
    header[0] = FORMAT_VERSION;
    LittleEndian::write_u64(&mut header[1..9], values.len() as u64);
    LittleEndian::write_u64(&mut header[9..17], max);

    let mut writer = BitWriter::with_capacity(HEADER_LEN + values.len());
    encode_run(&mut writer, values, 0, max);
    let body = writer.finish();

    let mut out = Vec::with_capacity(HEADER_LEN + body.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&body);
    out
}

fn encode_run(writer: &mut BitWriter, values: &[u64], lo: u64, hi: u64) {
    if values.is_empty() {
        return;
    }
    let m = values.len() / 2;
    let lower = lo + m as u64;
    let upper = hi - (values.len() - 1 - m) as u64;
    let width = bit_width(upper - lower);
    // width <= 64, so this never fails
    let _ = writer.output_u64(values[m] - lower, width);
    if m > 0 {
        encode_run(writer, &values[..m], lo, values[m] - 1);
    }
    if m + 1 < values.len() {
        encode_run(writer, &values[m + 1..], values[m] + 1, hi);
    }
}

/// Decodes a sequence written by [`encode_boundaries`].
///
/// # Errors
/// Returns [`RegionError::Codec`] if the header is short, the version is
/// unknown, the count cannot fit below the stated maximum or is too large to
/// hold, or the body ends early.
pub fn decode_boundaries(data: &[u8]) -> RegionResult<Vec<u64>> {
    if data.len() < HEADER_LEN {
        return Err(RegionError::codec(
            "decode",
            &format!("header needs {} bytes, got {}", HEADER_LEN, data.len()),
        ));
    }
    if data[0] != FORMAT_VERSION {
        return Err(RegionError::codec(
            "decode",
            &format!("unknown format version {}", data[0]),
        ));
    }
    let count = LittleEndian::read_u64(&data[1..9]);
    let max = LittleEndian::read_u64(&data[9..17]);
    if count > 0 && count - 1 > max {
        return Err(RegionError::codec(
            "decode",
            &format!("{} increasing values cannot fit below {}", count, max),
        ));
    }

    if count > MAX_VALUE_COUNT {
        return Err(RegionError::codec(
            "decode",
            &format!("value count {} exceeds {}", count, MAX_VALUE_COUNT),
        ));
    }

    let too_large =
        || RegionError::codec("decode", &format!("value count {} too large", count));
    let count = usize::try_from(count).map_err(|_| too_large())?;
    let mut values = Vec::new();
    values.try_reserve_exact(count).map_err(|_| too_large())?;
    values.resize(count, 0u64);
    let mut reader = BitReader::new(&data[HEADER_LEN..]);
    decode_run(&mut reader, &mut values, 0, max)?;
    Ok(values)
}

fn decode_run(reader: &mut BitReader<'_>, out: &mut [u64], lo: u64, hi: u64) -> RegionResult<()> {
    if out.is_empty() {
        return Ok(());
    }
    let m = out.len() / 2;
    let lower = lo + m as u64;
    let upper = hi - (out.len() - 1 - m) as u64;
    let offset = reader.read_u64(bit_width(upper - lower))?;
    let value = match lower.checked_add(offset) {
        Some(v) if v <= upper => v,
        _ => {
            return Err(RegionError::codec(
                "decode",
                &format!("offset {} from {} exceeds bound {}", offset, lower, upper),
            ))
        }
    };
    out[m] = value;
    let (left, right) = out.split_at_mut(m);
    if !left.is_empty() {
        decode_run(reader, left, lo, value - 1)?;
    }
    if right.len() > 1 {
        decode_run(reader, &mut right[1..], value + 1, hi)?;
    }
    Ok(())
}

#[inline]
fn bit_width(span: u64) -> usize {
    (64 - span.leading_zeros()) as usize
}

/// Base64 text form of [`encode_boundaries`].
pub fn encode_text(values: &[u64]) -> String {
    URL_SAFE_NO_PAD.encode(encode_boundaries(values))
}

/// Inverse of [`encode_text`].
pub fn decode_text(text: &str) -> RegionResult<Vec<u64>> {
    let bytes = URL_SAFE_NO_PAD
        .decode(text.trim())
        .map_err(|e| RegionError::codec("decode_text", &e.to_string()))?;
    decode_boundaries(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let bytes = encode_boundaries(&[]);
        assert_eq!(bytes.len(), HEADER_LEN);
        assert!(decode_boundaries(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_dense_run_needs_no_body() {
        let values: Vec<u64> = (0..64).collect();
        let bytes = encode_boundaries(&values);
        assert_eq!(bytes.len(), HEADER_LEN);
        assert_eq!(decode_boundaries(&bytes).unwrap(), values);
    }

    #[test]
    fn test_sparse_values() {
        let values = vec![3, 1 << 20, (1 << 20) + 1, 1 << 61, u64::MAX - 1, u64::MAX];
        let bytes = encode_boundaries(&values);
        assert_eq!(decode_boundaries(&bytes).unwrap(), values);
    }

    #[test]
    fn test_single_value_zero() {
        let bytes = encode_boundaries(&[0]);
        assert_eq!(decode_boundaries(&bytes).unwrap(), vec![0]);
    }

    #[test]
    fn test_pixel_like_boundaries_compress() {
        let shift = 2 * 19;
        let values: Vec<u64> = (0..500u64)
            .flat_map(|i| [(3 * i) << shift, (3 * i + 1) << shift])
            .collect();
        let bytes = encode_boundaries(&values);
        assert!(bytes.len() < values.len() * 6);
        assert_eq!(decode_boundaries(&bytes).unwrap(), values);
    }

    #[test]
    fn test_truncated_header() {
        let err = decode_boundaries(&[1, 2, 3]).unwrap_err();
        assert!(matches!(err, RegionError::Codec { .. }));
    }

    #[test]
    fn test_unknown_version() {
        let mut bytes = encode_boundaries(&[1, 5]);
        bytes[0] = 9;
        assert!(decode_boundaries(&bytes).is_err());
    }

    #[test]
    fn test_truncated_body() {
        let bytes = encode_boundaries(&[17, 1000, 123_456, 9_999_999]);
        assert!(bytes.len() > HEADER_LEN);
        assert!(decode_boundaries(&bytes[..HEADER_LEN]).is_err());
    }

    #[test]
    fn test_impossible_count() {
        let mut bytes = encode_boundaries(&[1, 5]);
        LittleEndian::write_u64(&mut bytes[1..9], 100);
        assert!(decode_boundaries(&bytes).is_err());
    }

    #[test]
    fn test_oversized_count_is_an_error() {
        let mut header = [0u8; HEADER_LEN];
        header[0] = FORMAT_VERSION;
        LittleEndian::write_u64(&mut header[9..17], u64::MAX);

        for count in [1u64 << 61, MAX_VALUE_COUNT + 1, u64::MAX] {
            LittleEndian::write_u64(&mut header[1..9], count);
            let err = decode_boundaries(&header).unwrap_err();
            assert!(matches!(err, RegionError::Codec { .. }), "count {}", count);
        }
        assert!(crate::RangeSet::from_compressed(&header).is_err());
    }

    #[test]
    fn test_text_round_trip() {
        let values = vec![10, 25, 30, 40];
        let text = encode_text(&values);
        assert!(text.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode_text(&text).unwrap(), values);
        assert!(decode_text("not base64!").is_err());
    }
}
