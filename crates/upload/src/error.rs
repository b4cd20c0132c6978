//! Upload error types.

use chunkput_protocol::RangeError;
use chunkput_transfer::{ProgressError, TransferError};

/// Connection-level failure of a single chunk request.
///
/// HTTP error statuses are never a `TransportError`.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// A server acknowledgment that contradicts what the client knows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("server reports {reported} bytes stored, fewer than the {confirmed} already confirmed")]
    AckRegressed { confirmed: u64, reported: u64 },

    #[error("server reports {reported} bytes stored, but only {sent_end} were sent")]
    AckBeyondChunk { sent_end: u64, reported: u64 },

    #[error("server answered 308 to the final probe of a {total}-byte payload")]
    ProbeNotAccepted { total: u64 },

    #[error(transparent)]
    MalformedRange(#[from] RangeError),
}

/// Errors produced by [`ResumableUploadEngine::upload`](crate::ResumableUploadEngine::upload).
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol invariant violation: {0}")]
    ProtocolInvariantViolation(#[from] ProtocolViolation),

    #[error("progress error: {0}")]
    Progress(#[from] ProgressError),

    #[error("source error: {0}")]
    Source(#[from] TransferError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("cancelled")]
    Cancelled,

    #[error("upload stalled at byte {offset} after {responses} responses without progress")]
    Stalled { offset: u64, responses: u32 },
}
