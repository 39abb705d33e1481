#[cfg(backtraces)]
use std::backtrace::Backtrace;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EvtxError>;

#[derive(Debug, Error)]
pub enum EvtxError {
    #[error("invalid argument: {message}")]
    Argument { message: &'static str },

    #[error("Offset {offset}: An I/O error has occurred while trying to read {what}")]
    FailedToRead {
        offset: u64,
        what: &'static str,
        source: std::io::Error,
        #[cfg(backtraces)]
        backtrace: Backtrace,
    },

    #[error("An I/O error has occurred")]
    IO {
        #[from]
        source: std::io::Error,
        #[cfg(backtraces)]
        backtrace: Backtrace,
    },

    #[error("Invalid EVTX record header magic, expected `2a2a0000`, found `{magic:2X?}`")]
    InvalidEvtxRecordHeaderMagic { magic: [u8; 4] },

    #[error("Invalid EVTX chunk header magic, expected `ElfChnk0`, found `{magic:2X?}`")]
    InvalidEvtxChunkMagic { magic: [u8; 8] },

    #[error("Invalid EVTX file header magic, expected `ElfFile0`, found `{magic:2X?}`")]
    InvalidEvtxFileHeaderMagic { magic: [u8; 8] },

    #[error("Unknown EVTX file header flags value: {value}")]
    UnknownEvtxHeaderFlagValue { value: u32 },

    #[error("{what} at offset {offset} is out of bounds: {detail}")]
    Bounds {
        what: &'static str,
        offset: u64,
        detail: String,
    },

    #[error("record at offset {offset} is malformed: {detail}")]
    MalformedRecord { offset: u64, detail: &'static str },

    #[error("{what} ({count}) exceeds the range representable by this accessor")]
    RangeExceeded { what: &'static str, count: u64 },

    #[error("{what} index {index} not found (chunk holds {count})")]
    NotFound {
        what: &'static str,
        index: u64,
        count: u64,
    },
}
