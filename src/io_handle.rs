//! File-level configuration and advisory status shared across chunk loads.
//!
//! Grounded in `libevtx_io_handle_t` (`chunk_size`, `flags`) from the
//! original C implementation: a small, cheaply-copied struct threaded
//! through every chunk/file read, carrying the one piece of state that
//! outlives a single `Chunk::load` call — the `CORRUPTED` advisory bit.

bitflags::bitflags! {
    /// Advisory, file-level status bits. Distinct from `EvtxError`: setting
    /// `CORRUPTED` never aborts a load, it only annotates it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileFlags: u32 {
        /// At least one chunk or record checksum failed to validate.
        const CORRUPTED = 0b0000_0001;
    }
}

/// The canonical on-disk chunk size. Chunks are always this size in
/// practice; `IoHandle::chunk_size` is still a field (not a constant)
/// because nothing in the chunk layer's arithmetic assumes the literal
/// value, only that it is self-consistent.
pub const EVTX_CHUNK_SIZE: u64 = 65_536;

/// The canonical file header block size.
pub const EVTX_FILE_HEADER_SIZE: u64 = 4_096;

#[derive(Debug, Clone, Copy)]
pub struct IoHandle {
    pub chunk_size: u64,
    pub flags: FileFlags,
}

impl IoHandle {
    pub fn new(chunk_size: u64) -> Self {
        IoHandle {
            chunk_size,
            flags: FileFlags::empty(),
        }
    }

    pub fn is_corrupted(&self) -> bool {
        self.flags.contains(FileFlags::CORRUPTED)
    }

    pub(crate) fn mark_corrupted(&mut self) {
        self.flags.insert(FileFlags::CORRUPTED);
    }
}

impl Default for IoHandle {
    fn default() -> Self {
        IoHandle::new(EVTX_CHUNK_SIZE)
    }
}
