//! Decoding one event record header out of a chunk's byte buffer.
//!
//! Grounded in `libevtx_record_values_read_header` (original C): a record
//! begins with a fixed 24-byte header (signature, declared size, record
//! identifier, written time), is followed by its binary-XML payload, and is
//! closed by a 4-byte repeat of the declared size. The Rust rendition keeps
//! only the offset/length of the payload rather than a pointer into the
//! chunk buffer (see `RecordValues::payload`), since nothing here needs to
//! outlive the chunk it came from.

use jiff::Timestamp;

use crate::err::{EvtxError, Result};
use crate::utils::bytes;

const RECORD_HEADER_SIZE: usize = 24;
const RECORD_TRAILER_SIZE: usize = 4;
const RECORD_MAGIC: [u8; 4] = [0x2a, 0x2a, 0x00, 0x00];

/// One event record within a chunk: its identifier, written time, and the
/// location of its binary-XML payload inside the parent chunk's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValues {
    /// Offset of this record's header, relative to the start of the chunk buffer.
    pub(crate) offset: usize,
    /// Total footprint of the record (header + payload + trailer) in bytes.
    pub data_size: u32,
    pub identifier: u64,
    pub written_time: Timestamp,
    payload_offset: usize,
    payload_len: usize,
}

impl RecordValues {
    /// Borrow this record's binary-XML payload out of its parent chunk.
    ///
    /// Takes `chunk` explicitly (rather than storing a borrow or pointer)
    /// so that no `RecordValues` can outlive the `Chunk` it was decoded
    /// from; the compiler enforces it through the lifetime on `chunk`.
    pub fn payload<'c>(&self, chunk: &'c crate::chunk::Chunk) -> &'c [u8] {
        &chunk.data()[self.payload_offset..self.payload_offset + self.payload_len]
    }
}

/// Windows FILETIME: 100ns ticks since 1601-01-01 UTC.
///
/// Done in `i128` throughout: a FILETIME of `0` (the 1601 epoch) rebased to
/// the Unix epoch and then scaled to nanoseconds overflows `i64` (it's about
/// `-1.16e19`, past `i64::MIN`), so narrower arithmetic would wrongly reject
/// perfectly valid, merely old, timestamps.
fn filetime_to_timestamp(ticks: u64, record_offset: usize) -> Result<Timestamp> {
    const UNIX_EPOCH_IN_FILETIME_TICKS: i128 = 116_444_736_000_000_000;
    let ticks = ticks as i128 - UNIX_EPOCH_IN_FILETIME_TICKS;
    let nanos = ticks * 100;
    Timestamp::from_nanosecond(nanos).map_err(|_| EvtxError::MalformedRecord {
        offset: record_offset as u64,
        detail: "written time is out of jiff::Timestamp's representable range",
    })
}

/// Decode the record header at `offset` within `chunk_data`.
///
/// `chunk_size` is the full declared size of the chunk the record lives in
/// (not `chunk_data.len()`, though in practice they're equal) — it bounds
/// how far `offset + data_size` may reach.
pub(crate) fn decode_record_header(
    chunk_data: &[u8],
    chunk_size: usize,
    offset: usize,
) -> Result<RecordValues> {
    if offset
        .checked_add(RECORD_HEADER_SIZE)
        .is_none_or(|end| end > chunk_size)
    {
        return Err(EvtxError::Bounds {
            what: "record header",
            offset: offset as u64,
            detail: format!("{RECORD_HEADER_SIZE}-byte header exceeds chunk bounds"),
        });
    }

    let magic = bytes::read_array::<4>(chunk_data, offset, "record magic")?;
    if magic != RECORD_MAGIC {
        return Err(EvtxError::InvalidEvtxRecordHeaderMagic { magic });
    }

    let data_size = bytes::read_u32_le(chunk_data, offset + 4, "record data size")?;
    if data_size == 0 {
        return Err(EvtxError::MalformedRecord {
            offset: offset as u64,
            detail: "declared record size is zero",
        });
    }

    let record_end = offset
        .checked_add(data_size as usize)
        .ok_or_else(|| EvtxError::Bounds {
            what: "record",
            offset: offset as u64,
            detail: "offset + data_size overflows usize".to_string(),
        })?;
    if data_size < (RECORD_HEADER_SIZE + RECORD_TRAILER_SIZE) as u32 || record_end > chunk_size {
        return Err(EvtxError::Bounds {
            what: "record",
            offset: offset as u64,
            detail: format!(
                "data_size {data_size} must be >= {} and fit within the chunk",
                RECORD_HEADER_SIZE + RECORD_TRAILER_SIZE
            ),
        });
    }

    let identifier = bytes::read_u64_le(chunk_data, offset + 8, "record identifier")?;
    let written_time_ticks = bytes::read_u64_le(chunk_data, offset + 16, "record written time")?;
    let written_time = filetime_to_timestamp(written_time_ticks, offset)?;

    let trailer_offset = record_end - RECORD_TRAILER_SIZE;
    let trailing_size = bytes::read_u32_le(chunk_data, trailer_offset, "record trailing size")?;
    if trailing_size != data_size {
        return Err(EvtxError::MalformedRecord {
            offset: offset as u64,
            detail: "trailing length does not match the leading declared size",
        });
    }

    let payload_offset = offset + RECORD_HEADER_SIZE;
    let payload_len = trailer_offset - payload_offset;

    Ok(RecordValues {
        offset,
        data_size,
        identifier,
        written_time,
        payload_offset,
        payload_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_record(identifier: u64, payload: &[u8]) -> Vec<u8> {
        build_record_with_filetime(identifier, 0, payload)
    }

    fn build_record_with_filetime(identifier: u64, filetime_ticks: u64, payload: &[u8]) -> Vec<u8> {
        let data_size = (RECORD_HEADER_SIZE + payload.len() + RECORD_TRAILER_SIZE) as u32;
        let mut buf = Vec::new();
        buf.extend_from_slice(&RECORD_MAGIC);
        buf.extend_from_slice(&data_size.to_le_bytes());
        buf.extend_from_slice(&identifier.to_le_bytes());
        buf.extend_from_slice(&filetime_ticks.to_le_bytes());
        buf.extend_from_slice(payload);
        buf.extend_from_slice(&data_size.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_well_formed_record() {
        let buf = build_record(42, b"payload-bytes");
        let record = decode_record_header(&buf, buf.len(), 0).unwrap();
        assert_eq!(record.identifier, 42);
        assert_eq!(record.data_size as usize, buf.len());
    }

    #[test]
    fn decodes_filetime_epoch_without_overflow() {
        // A written_time of 0 is the FILETIME epoch itself (1601-01-01), the
        // smallest value the field can hold and the one most prone to
        // overflowing a narrower-than-i128 rebase to the Unix epoch.
        let buf = build_record_with_filetime(1, 0, b"x");
        let record = decode_record_header(&buf, buf.len(), 0).unwrap();
        assert_eq!(record.written_time.as_second(), -11_644_473_600);
    }

    #[test]
    fn decodes_modern_filetime() {
        const UNIX_EPOCH_IN_FILETIME_TICKS: u64 = 116_444_736_000_000_000;
        let ticks = UNIX_EPOCH_IN_FILETIME_TICKS + 1_700_000_000 * 10_000_000;
        let buf = build_record_with_filetime(2, ticks, b"x");
        let record = decode_record_header(&buf, buf.len(), 0).unwrap();
        assert_eq!(record.written_time.as_second(), 1_700_000_000);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = build_record(1, b"x");
        buf[0] = 0x00;
        match decode_record_header(&buf, buf.len(), 0) {
            Err(EvtxError::InvalidEvtxRecordHeaderMagic { .. }) => {}
            other => panic!("expected magic mismatch, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_data_size() {
        let mut buf = build_record(1, b"x");
        buf[4..8].copy_from_slice(&0u32.to_le_bytes());
        match decode_record_header(&buf, buf.len(), 0) {
            Err(EvtxError::MalformedRecord { .. }) => {}
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_trailing_length_mismatch() {
        let mut buf = build_record(1, b"payload");
        let len = buf.len();
        buf[len - 4..].copy_from_slice(&999u32.to_le_bytes());
        match decode_record_header(&buf, buf.len(), 0) {
            Err(EvtxError::MalformedRecord { .. }) => {}
            other => panic!("expected malformed record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_declared_size_past_chunk_end() {
        let buf = build_record(1, b"payload");
        match decode_record_header(&buf, buf.len() - 1, 0) {
            Err(EvtxError::Bounds { .. }) => {}
            other => panic!("expected bounds error, got {other:?}"),
        }
    }
}
