//! The chunk layer: loading one fixed-size chunk and scanning its records.
//!
//! Grounded in `libevtx_chunk_read` (original C): seek to the chunk's file
//! offset, read `chunk_size` bytes whole, validate the signature, extract
//! header fields, verify the two CRC-32 checksums (advisory — a mismatch
//! marks the file `CORRUPTED` but never aborts the load), then scan record
//! headers from offset 512 up to the declared free-space boundary. Unlike
//! the original, there is no explicit cleanup path on error: a half-built
//! `Chunk` is simply never returned, so Rust's ownership model does the
//! rollback for free.

use log::{debug, trace, warn};

use crate::byte_reader::{read_exact_at, ByteReader};
use crate::chunk_header::{self, ChunkHeader, CHUNK_HEADER_SIZE};
use crate::crc32::crc32_chain;
use crate::err::{EvtxError, Result};
use crate::io_handle::IoHandle;
use crate::record::{self, RecordValues};

/// One fully loaded, fixed-size chunk and its scanned records.
#[derive(Debug)]
pub struct Chunk {
    file_offset: u64,
    data: Vec<u8>,
    records: Vec<RecordValues>,
    header: ChunkHeader,
}

impl Chunk {
    /// Read and validate the chunk at `file_offset`, scanning all of its
    /// records.
    ///
    /// `file_offset` must be a nonzero multiple of `io_handle.chunk_size`
    /// (offset 0 holds the file header, not a chunk).
    pub fn load(
        io_handle: &mut IoHandle,
        reader: &mut impl ByteReader,
        file_offset: u64,
    ) -> Result<Chunk> {
        if io_handle.chunk_size == 0 {
            return Err(EvtxError::Argument {
                message: "io_handle.chunk_size must be nonzero",
            });
        }
        if file_offset == 0 || file_offset % io_handle.chunk_size != 0 {
            return Err(EvtxError::Argument {
                message: "file_offset must be a nonzero multiple of chunk_size",
            });
        }

        let chunk_number = (file_offset - io_handle.chunk_size) / io_handle.chunk_size;
        let chunk_size = io_handle.chunk_size as usize;

        // Phase 1: read the whole chunk into memory.
        let mut data = vec![0u8; chunk_size];
        read_exact_at(reader, file_offset, &mut data, "chunk data")?;
        debug!("chunk {chunk_number}: read {chunk_size} bytes at offset {file_offset}");

        // Phase 2: signature check.
        if !chunk_header::signature_matches(&data) {
            let magic: [u8; 8] = data[0..8].try_into().unwrap_or([0; 8]);
            return Err(EvtxError::InvalidEvtxChunkMagic { magic });
        }

        // Phase 3: header field extraction.
        let header = chunk_header::decode_chunk_header(&data)?;

        // Phase 4: header checksum over [0, 120) chained with [128, 512).
        let computed_header_crc = crc32_chain(crc32_chain(0, &data[0..120]), &data[128..512]);
        if computed_header_crc != header.header_chunk_checksum {
            warn!(
                "chunk {chunk_number}: header checksum mismatch (stored {:#x}, computed {:#x})",
                header.header_chunk_checksum, computed_header_crc
            );
            io_handle.mark_corrupted();
        }

        // Phase 5: free-space bounds check. A violation is fatal, not advisory,
        // because it governs the records CRC range and the record scan below.
        let free_space_offset = header.free_space_offset as usize;
        if free_space_offset < CHUNK_HEADER_SIZE || free_space_offset > chunk_size {
            return Err(EvtxError::Bounds {
                what: "free space offset",
                offset: free_space_offset as u64,
                detail: format!(
                    "must lie within [{CHUNK_HEADER_SIZE}, {chunk_size}] for chunk {chunk_number}"
                ),
            });
        }

        // Phase 6: records checksum over [512, free_space_offset).
        let computed_events_crc = crc32_chain(0, &data[CHUNK_HEADER_SIZE..free_space_offset]);
        if computed_events_crc != header.events_checksum {
            warn!(
                "chunk {chunk_number}: records checksum mismatch (stored {:#x}, computed {:#x})",
                header.events_checksum, computed_events_crc
            );
            io_handle.mark_corrupted();
        }

        // Phase 7: scan record headers from 512 up to free_space_offset.
        let mut records = Vec::new();
        let mut offset = CHUNK_HEADER_SIZE;
        while offset < free_space_offset {
            let record_values = record::decode_record_header(&data, chunk_size, offset)?;
            offset += record_values.data_size as usize;
            records.push(record_values);
        }
        trace!("chunk {chunk_number}: scanned {} records", records.len());

        // Phase 8: the tail, [offset, chunk_size), is free space; not interpreted.
        if offset < chunk_size && log::log_enabled!(log::Level::Trace) {
            trace!(
                "chunk {chunk_number}: {} bytes of trailing free space",
                chunk_size - offset
            );
        }

        Ok(Chunk {
            file_offset,
            data,
            records,
            header,
        })
    }

    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    /// Diagnostic-only fields carried over from the chunk header that are
    /// not used to drive parsing: the header's own record-number/identifier
    /// and offset bookkeeping. Cross-check these against the scanned record
    /// list if you don't trust the file, but nothing in this crate does.
    pub fn first_event_record_number(&self) -> u64 {
        self.header.first_event_record_number
    }

    pub fn last_event_record_number(&self) -> u64 {
        self.header.last_event_record_number
    }

    pub fn first_event_record_id(&self) -> u64 {
        self.header.first_event_record_id
    }

    pub fn last_event_record_id(&self) -> u64 {
        self.header.last_event_record_id
    }

    pub fn last_event_record_offset(&self) -> u32 {
        self.header.last_event_record_offset
    }

    /// Declared chunk header size, expected to be 128 on every real EVTX
    /// file. Diagnostic only — `Chunk::load` never branches on it.
    pub fn header_size(&self) -> u32 {
        self.header.header_size
    }

    /// Number of records scanned out of this chunk. The on-disk format
    /// cannot declare more than `u16::MAX` records per chunk; this accessor
    /// enforces that as a sanity bound on the in-memory list rather than
    /// trusting the header fields.
    pub fn number_of_records(&self) -> Result<u16> {
        u16::try_from(self.records.len()).map_err(|_| EvtxError::RangeExceeded {
            what: "number of records in chunk",
            count: self.records.len() as u64,
        })
    }

    pub fn record_by_index(&self, index: u16) -> Result<&RecordValues> {
        self.records
            .get(index as usize)
            .ok_or_else(|| EvtxError::NotFound {
                what: "record",
                index: index as u64,
                count: self.records.len() as u64,
            })
    }

    pub fn iter_records(&self) -> impl Iterator<Item = &RecordValues> {
        self.records.iter()
    }
}
