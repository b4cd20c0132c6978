//! Resumable chunked upload over range-addressed HTTP `PUT`.
//!
//! The [`ResumableUploadEngine`] pushes a payload one chunk at a time,
//! tracks what the server has durably stored, and resumes from the
//! server-confirmed offset after a partial receipt instead of restarting.
//!
//! # Outcomes
//!
//! - `Ok` with a `2xx` response: the whole payload is stored.
//! - `Ok` with any other non-`308` status: passed through untouched so the
//!   caller can apply its own retry policy to the whole upload.
//! - `Err`: connection failure, protocol disagreement, cancellation or a
//!   stalled server. Nothing is retried at this layer.

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

// Re-export primary types for convenience.
pub use config::UploadConfig;
pub use engine::{ResumableUploadEngine, Transition, interpret};
pub use error::{ProtocolViolation, TransportError, UploadError};
pub use http::HttpTransport;
pub use transport::{ChunkRequest, TransportExecutor, UploadResponse};
pub use types::{UploadEvent, UploadTarget};

pub use chunkput_transfer::{ReplayableByteSource, SeekableSource};
