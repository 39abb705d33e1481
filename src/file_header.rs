//! Decoding the 4096-byte file header block (ambient, file layer).
//!
//! Grounded in the same on-disk header family as the chunk header, and in
//! `libevtx_file_header_read` (original C) for the flags/checksum layout.
//! Unlike the chunk header, a file header checksum mismatch here is still
//! advisory: the chunk layer is the boundary this crate actually enforces
//! hard bounds on, so a bad file header only marks the file `CORRUPTED`.

use crate::crc32::crc32_chain;
use crate::err::{EvtxError, Result};
use crate::io_handle::IoHandle;
use crate::utils::bytes;

pub(crate) const FILE_HEADER_SIZE: usize = 4_096;
const FILE_MAGIC: [u8; 8] = *b"ElfFile\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFlagsValue {
    Empty,
    Dirty,
    Full,
}

#[derive(Debug, Clone, Copy)]
pub struct EvtxFileHeader {
    pub oldest_chunk_number: u64,
    pub current_chunk_number: u64,
    pub next_record_identifier: u64,
    pub header_size: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub header_block_size: u16,
    pub chunk_count: u16,
    pub flags: FileFlagsValue,
    pub checksum: u32,
}

/// Decode and validate the file header at the start of `buf`. `buf` must be
/// at least `FILE_HEADER_SIZE` bytes.
pub(crate) fn decode_file_header(buf: &[u8], io_handle: &mut IoHandle) -> Result<EvtxFileHeader> {
    if buf.len() < FILE_HEADER_SIZE {
        return Err(EvtxError::Bounds {
            what: "file header",
            offset: 0,
            detail: format!(
                "buffer is {} bytes, need at least {FILE_HEADER_SIZE}",
                buf.len()
            ),
        });
    }

    let magic = bytes::read_array::<8>(buf, 0, "file header magic")?;
    if magic != FILE_MAGIC {
        return Err(EvtxError::InvalidEvtxFileHeaderMagic { magic });
    }

    let flags_raw = bytes::read_u32_le(buf, 120, "file header flags")?;
    let flags = match flags_raw {
        0 => FileFlagsValue::Empty,
        1 => FileFlagsValue::Dirty,
        2 => FileFlagsValue::Full,
        value => return Err(EvtxError::UnknownEvtxHeaderFlagValue { value }),
    };

    let checksum = bytes::read_u32_le(buf, 124, "file header checksum")?;
    let computed = crc32_chain(0, &buf[0..120]);
    if computed != checksum {
        log::warn!(
            "file header checksum mismatch (stored {checksum:#x}, computed {computed:#x})"
        );
        io_handle.mark_corrupted();
    }

    Ok(EvtxFileHeader {
        oldest_chunk_number: bytes::read_u64_le(buf, 8, "oldest chunk number")?,
        current_chunk_number: bytes::read_u64_le(buf, 16, "current chunk number")?,
        next_record_identifier: bytes::read_u64_le(buf, 24, "next record identifier")?,
        header_size: bytes::read_u32_le(buf, 32, "file header size")?,
        minor_version: bytes::read_u16_le(buf, 36, "minor version")?,
        major_version: bytes::read_u16_le(buf, 38, "major version")?,
        header_block_size: bytes::read_u16_le(buf, 40, "header block size")?,
        chunk_count: bytes::read_u16_le(buf, 42, "chunk count")?,
        flags,
        checksum,
    })
}
