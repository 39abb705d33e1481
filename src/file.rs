//! The file layer (ambient): decodes the file header once, then loads
//! chunks on demand at their chunk-aligned offsets.
//!
//! This is the thin outer shell the chunk layer assumes exists above it —
//! it owns the `IoHandle` and the `ByteReader`, and turns "chunk number N"
//! into the `Chunk::load` call at the right file offset. It does not cache
//! loaded chunks; each call re-reads from the underlying reader, matching
//! the original's on-demand chunk access pattern.

use crate::byte_reader::{read_exact_at, ByteReader};
use crate::chunk::Chunk;
use crate::err::{EvtxError, Result};
use crate::file_header::{self, EvtxFileHeader, FILE_HEADER_SIZE};
use crate::io_handle::IoHandle;

pub struct EvtxFile<R: ByteReader> {
    reader: R,
    io_handle: IoHandle,
    header: EvtxFileHeader,
}

impl<R: ByteReader> EvtxFile<R> {
    /// Decode the file header from the start of `reader` and prepare for
    /// chunk-aligned access. Does not load any chunks yet.
    pub fn open(mut reader: R) -> Result<Self> {
        let mut io_handle = IoHandle::default();
        let mut header_buf = vec![0u8; FILE_HEADER_SIZE];
        read_exact_at(&mut reader, 0, &mut header_buf, "file header")?;
        let header = file_header::decode_file_header(&header_buf, &mut io_handle)?;

        Ok(EvtxFile {
            reader,
            io_handle,
            header,
        })
    }

    pub fn header(&self) -> &EvtxFileHeader {
        &self.header
    }

    pub fn is_corrupted(&self) -> bool {
        self.io_handle.is_corrupted()
    }

    /// Number of chunks this file declares. Not trusted beyond bounding
    /// iteration: an out-of-range `chunk_index` to [`EvtxFile::chunk`] still
    /// fails through the normal `Chunk::load` bounds/read checks.
    pub fn chunk_count(&self) -> u16 {
        self.header.chunk_count
    }

    /// Load the chunk at `chunk_index` (0-based, counting from the first
    /// chunk immediately after the file header).
    pub fn chunk(&mut self, chunk_index: u16) -> Result<Chunk> {
        let chunk_size = self.io_handle.chunk_size;
        let file_offset = chunk_size
            .checked_mul(chunk_index as u64 + 1)
            .ok_or_else(|| EvtxError::RangeExceeded {
                what: "chunk file offset",
                count: chunk_index as u64,
            })?;
        Chunk::load(&mut self.io_handle, &mut self.reader, file_offset)
    }

    /// Load every declared chunk in order, stopping at the first error.
    pub fn iter_chunks(&mut self) -> impl Iterator<Item = Result<Chunk>> + '_ {
        (0..self.chunk_count()).map(move |index| self.chunk(index))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::crc32::crc32_chain;

    const CHUNK_SIZE: u64 = 65_536;

    fn build_file_header(chunk_count: u16) -> Vec<u8> {
        let mut buf = vec![0u8; FILE_HEADER_SIZE];
        buf[0..8].copy_from_slice(b"ElfFile\0");
        buf[32..36].copy_from_slice(&128u32.to_le_bytes());
        buf[40..42].copy_from_slice(&4096u16.to_le_bytes());
        buf[42..44].copy_from_slice(&chunk_count.to_le_bytes());
        let crc = crc32_chain(0, &buf[0..120]);
        buf[124..128].copy_from_slice(&crc.to_le_bytes());
        buf
    }

    fn build_empty_chunk() -> Vec<u8> {
        let mut data = vec![0u8; CHUNK_SIZE as usize];
        data[0..7].copy_from_slice(b"ElfChnk");
        data[40..44].copy_from_slice(&128u32.to_le_bytes());
        data[48..52].copy_from_slice(&512u32.to_le_bytes());
        let events_crc = crc32_chain(0, &[]);
        data[52..56].copy_from_slice(&events_crc.to_le_bytes());
        let header_crc = crc32_chain(crc32_chain(0, &data[0..120]), &data[128..512]);
        data[124..128].copy_from_slice(&header_crc.to_le_bytes());
        data
    }

    #[test]
    fn opens_file_header_and_loads_chunks() {
        let mut buf = build_file_header(2);
        buf.resize(CHUNK_SIZE as usize, 0);
        buf.extend(build_empty_chunk());
        buf.extend(build_empty_chunk());

        let mut file = EvtxFile::open(Cursor::new(buf)).unwrap();
        assert_eq!(file.chunk_count(), 2);
        assert!(!file.is_corrupted());

        let chunks: Vec<_> = file.iter_chunks().collect();
        assert_eq!(chunks.len(), 2);
        for chunk in chunks {
            assert_eq!(chunk.unwrap().number_of_records().unwrap(), 0);
        }
    }

    #[test]
    fn rejects_missing_file_header() {
        let buf = vec![0u8; 10];
        match EvtxFile::open(Cursor::new(buf)) {
            Err(EvtxError::FailedToRead { .. }) => {}
            other => panic!("expected failed-to-read error, got {other:?}"),
        }
    }
}
