//! Chunk planning and confirmed-offset bookkeeping for resumable uploads.
//!
//! Nothing here touches the network: the upload crate drives these types
//! from its request loop.

mod planner;
mod progress;
mod source;
mod types;

pub use planner::ChunkPlanner;
pub use progress::ThroughputMeter;
pub use source::{ReplayableByteSource, SeekableSource};
pub use types::{Chunk, UploadProgress, UploadState};

/// Default chunk size: 10 MiB.
///
/// Smaller chunks mean more requests but less to resend after a partial
/// receipt. Not a protocol requirement.
pub const DEFAULT_CHUNK_SIZE: usize = 10 * 1024 * 1024;

/// Errors produced while reading chunks from a source.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("offset {offset} is beyond the {total}-byte payload")]
    OffsetOutOfRange { offset: u64, total: u64 },

    #[error("chunk size must be positive")]
    ZeroChunkSize,
}

/// Violations of the [`UploadProgress`] state rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("confirmed offset cannot move from {confirmed} to {requested} (total {total})")]
    InvariantViolation {
        confirmed: u64,
        requested: u64,
        total: u64,
    },

    #[error("cannot complete with {confirmed} of {total} bytes confirmed")]
    PrematureCompletion { confirmed: u64, total: u64 },

    #[error("upload state cannot move from {from:?} to {to:?}")]
    StateRegression { from: UploadState, to: UploadState },
}
