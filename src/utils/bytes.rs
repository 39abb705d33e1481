//! Byte-slice utilities for bounds-oriented parsing.
//!
//! This module is intentionally tiny and *boring*: it provides a consistent, well-documented way
//! to read little-endian primitives out of `&[u8]` at fixed offsets, with minimal overhead.
//!
//! All offset arithmetic here is checked: chunk and record fields are read directly out of
//! attacker-controlled byte buffers, so `offset + len` overflowing `usize` must fail the read
//! rather than wrap.
//!
//! Example (fixed-size header parsing):
//!
//! ```ignore
//! use crate::utils::bytes;
//!
//! let magic = bytes::read_array::<8>(buf, 0, "chunk header magic")?;
//! let flags = bytes::read_u32_le(buf, 120, "chunk header flags")?;
//! ```

use crate::err::{EvtxError, Result};

#[inline]
fn bounds_error(what: &'static str, offset: usize, len: usize, have: usize) -> EvtxError {
    EvtxError::Bounds {
        what,
        offset: offset as u64,
        detail: format!("need {len} bytes at offset {offset}, buffer holds {have}"),
    }
}

/// Borrow `len` bytes at `offset`, or return `EvtxError::Bounds`.
pub(crate) fn slice<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8]> {
    let end = offset
        .checked_add(len)
        .ok_or_else(|| bounds_error(what, offset, len, buf.len()))?;
    buf.get(offset..end)
        .ok_or_else(|| bounds_error(what, offset, len, buf.len()))
}

/// Read `N` raw bytes at `offset`.
pub(crate) fn read_array<const N: usize>(
    buf: &[u8],
    offset: usize,
    what: &'static str,
) -> Result<[u8; N]> {
    let s = slice(buf, offset, N, what)?;
    let mut out = [0u8; N];
    out.copy_from_slice(s);
    Ok(out)
}

/// Read a `u16` (little-endian) at `offset`.
pub(crate) fn read_u16_le(buf: &[u8], offset: usize, what: &'static str) -> Result<u16> {
    Ok(u16::from_le_bytes(read_array::<2>(buf, offset, what)?))
}

/// Read a `u32` (little-endian) at `offset`.
pub(crate) fn read_u32_le(buf: &[u8], offset: usize, what: &'static str) -> Result<u32> {
    Ok(u32::from_le_bytes(read_array::<4>(buf, offset, what)?))
}

/// Read a `u64` (little-endian) at `offset`.
pub(crate) fn read_u64_le(buf: &[u8], offset: usize, what: &'static str) -> Result<u64> {
    Ok(u64::from_le_bytes(read_array::<8>(buf, offset, what)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_bounds_fields() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        assert_eq!(read_u16_le(&buf, 0, "field").unwrap(), 0x0201);
        assert_eq!(read_u32_le(&buf, 0, "field").unwrap(), 0x0403_0201);
        assert_eq!(read_u64_le(&buf, 0, "field").unwrap(), 0x0807_0605_0403_0201);
    }

    #[test]
    fn truncated_read_is_bounds_error() {
        let buf = [0x01, 0x02];
        match read_u32_le(&buf, 0, "field") {
            Err(EvtxError::Bounds { what, offset, .. }) => {
                assert_eq!(what, "field");
                assert_eq!(offset, 0);
            }
            other => panic!("expected Bounds error, got {other:?}"),
        }
    }

    #[test]
    fn offset_past_end_is_bounds_error() {
        let buf = [0x01, 0x02, 0x03, 0x04];
        assert!(read_u32_le(&buf, 4, "field").is_err());
    }

    #[test]
    fn offset_near_usize_max_does_not_overflow() {
        let buf = [0x01, 0x02, 0x03, 0x04];
        assert!(read_u32_le(&buf, usize::MAX - 1, "field").is_err());
    }
}
