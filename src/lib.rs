mod byte_reader;
mod chunk;
mod chunk_header;
mod crc32;
pub mod err;
mod file;
mod file_header;
mod io_handle;
mod record;
mod utils;

pub use byte_reader::ByteReader;
pub use chunk::Chunk;
pub use err::{EvtxError, Result};
pub use file::EvtxFile;
pub use file_header::{EvtxFileHeader, FileFlagsValue};
pub use io_handle::{FileFlags, IoHandle, EVTX_CHUNK_SIZE, EVTX_FILE_HEADER_SIZE};
pub use record::RecordValues;

// For tests, we only initialize logging once.
#[cfg(test)]
use std::sync::Once;

#[cfg(test)]
static LOGGER_INIT: Once = Once::new();

// Rust runs tests concurrently, so unless we synchronize logging access it
// will crash when attempting to run `cargo test` with some logging facilities.
#[cfg(test)]
pub fn ensure_env_logger_initialized() {
    LOGGER_INIT.call_once(|| {
        let _ = env_logger::try_init();
    });
}
