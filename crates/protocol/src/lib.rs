//! Wire-level types for resumable, range-addressed uploads.
//!
//! A resumable upload is a sequence of `PUT` requests, each carrying a
//! `Content-Range` header that places the body inside the full payload.
//! The server answers `308` with a `Range` header while bytes are still
//! missing, and any `2xx` once the whole payload is stored.

pub mod ack;
pub mod constants;
pub mod range;

// Re-export primary types for convenience.
pub use ack::ServerAck;
pub use constants::STATUS_RESUME_INCOMPLETE;
pub use range::{ByteRangeDescriptor, RangeError, parse_received_range};
