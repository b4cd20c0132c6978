//! Data types for the upload flow.

use url::Url;

/// Where a payload goes and how it is described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Session URL of the resumable upload.
    pub destination: Url,
    pub total_length: u64,
    pub content_type: String,
}

impl UploadTarget {
    pub fn new(destination: Url, total_length: u64, content_type: impl Into<String>) -> Self {
        Self {
            destination,
            total_length,
            content_type: content_type.into(),
        }
    }
}

/// Progress event emitted while an upload runs.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// First chunk is about to be planned.
    Started { total: u64 },
    /// The server confirmed more bytes.
    Progress {
        confirmed: u64,
        total: u64,
        bytes_per_second: f64,
    },
    /// The server kept only part of a chunk; the rest is resent.
    Resynced { sent_end: u64, confirmed: u64 },
    /// The server accepted the whole payload.
    Completed { total: u64 },
}
