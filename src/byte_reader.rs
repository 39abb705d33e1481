//! The I/O collaborator interface the chunk and file-header layers consume.
//!
//! Grounded in the teacher crate's `evtx_parser::ReadSeek` trait (referenced
//! throughout `utils/read_ext.rs` and the historical `evtx_chunk.rs`
//! snapshots as the seam between the parser and its byte source). The real
//! upstream crate implements this over `std::fs::File` and `Cursor<Vec<u8>>`
//! interchangeably; we do the same.

use std::io::{self, Read, Seek};

/// Anything the chunk/file-header layer can seek and read from.
///
/// This is deliberately just `Read + Seek` — no EVTX-specific methods — so
/// that a file-level caller can hand us a `File`, a `Cursor<&[u8]>`, or any
/// other byte source without adapting it.
pub trait ByteReader: Read + Seek {}

impl<T: Read + Seek + ?Sized> ByteReader for T {}

/// Seek to `offset` and read exactly `buf.len()` bytes, mapping a short read
/// or I/O error to `EvtxError::FailedToRead` with the context the caller
/// provides for diagnostics.
pub(crate) fn read_exact_at(
    reader: &mut (impl ByteReader + ?Sized),
    offset: u64,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), crate::err::EvtxError> {
    reader
        .seek(io::SeekFrom::Start(offset))
        .map_err(|source| crate::err::EvtxError::FailedToRead {
            offset,
            what,
            source,
        })?;
    reader
        .read_exact(buf)
        .map_err(|source| crate::err::EvtxError::FailedToRead {
            offset,
            what,
            source,
        })
}
