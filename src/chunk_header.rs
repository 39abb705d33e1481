//! Decoding the 512-byte chunk header prefix.
//!
//! Grounded in `libevtx_chunk_read`'s header field extraction (original C):
//! a fixed set of little-endian fields at fixed offsets, followed by 384
//! bytes of record-table data this crate treats as opaque (see the Open
//! Questions in the design notes). `ChunkHeader` is a decode-time view
//! consumed entirely inside `Chunk::load`, not a type exposed on its own.

use crate::err::{EvtxError, Result};
use crate::utils::bytes;

pub(crate) const CHUNK_HEADER_SIZE: usize = 512;
pub(crate) const CHUNK_MAGIC: [u8; 7] = *b"ElfChnk";

#[derive(Debug, Clone, Copy)]
pub(crate) struct ChunkHeader {
    pub(crate) first_event_record_number: u64,
    pub(crate) last_event_record_number: u64,
    pub(crate) first_event_record_id: u64,
    pub(crate) last_event_record_id: u64,
    pub(crate) header_size: u32,
    pub(crate) last_event_record_offset: u32,
    pub(crate) free_space_offset: u32,
    pub(crate) events_checksum: u32,
    pub(crate) header_chunk_checksum: u32,
}

/// Decode the chunk header fields out of the first 512 bytes of `chunk_data`.
///
/// Does not verify the signature or either checksum — those are the
/// caller's responsibility (`Chunk::load`, which needs to distinguish a
/// hard signature failure from a soft checksum mismatch).
pub(crate) fn decode_chunk_header(chunk_data: &[u8]) -> Result<ChunkHeader> {
    if chunk_data.len() < CHUNK_HEADER_SIZE {
        return Err(EvtxError::Bounds {
            what: "chunk header",
            offset: 0,
            detail: format!(
                "chunk buffer is {} bytes, need at least {CHUNK_HEADER_SIZE}",
                chunk_data.len()
            ),
        });
    }

    Ok(ChunkHeader {
        first_event_record_number: bytes::read_u64_le(chunk_data, 8, "first event record number")?,
        last_event_record_number: bytes::read_u64_le(chunk_data, 16, "last event record number")?,
        first_event_record_id: bytes::read_u64_le(chunk_data, 24, "first event record id")?,
        last_event_record_id: bytes::read_u64_le(chunk_data, 32, "last event record id")?,
        header_size: bytes::read_u32_le(chunk_data, 40, "chunk header size")?,
        last_event_record_offset: bytes::read_u32_le(
            chunk_data,
            44,
            "last event record offset",
        )?,
        free_space_offset: bytes::read_u32_le(chunk_data, 48, "free space offset")?,
        events_checksum: bytes::read_u32_le(chunk_data, 52, "events checksum")?,
        header_chunk_checksum: bytes::read_u32_le(chunk_data, 124, "header checksum")?,
    })
}

pub(crate) fn signature_matches(chunk_data: &[u8]) -> bool {
    chunk_data.get(0..7) == Some(&CHUNK_MAGIC[..])
}
