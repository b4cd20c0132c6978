//! Upload engine configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::UploadError;

/// Tunables for one engine. Shared read-only by every upload it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum bytes per chunk request.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Upper bound on one chunk request, including the response body.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on establishing a connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Consecutive `308` responses confirming no new bytes before giving up.
    #[serde(default = "default_max_stalled_responses")]
    pub max_stalled_responses: u32,
}

fn default_chunk_size() -> usize {
    chunkput_transfer::DEFAULT_CHUNK_SIZE
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_max_stalled_responses() -> u32 {
    3
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_stalled_responses: default_max_stalled_responses(),
        }
    }
}

impl UploadConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<(), UploadError> {
        if self.chunk_size == 0 {
            return Err(UploadError::Config("chunk_size must be positive".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(UploadError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if self.max_stalled_responses == 0 {
            return Err(UploadError::Config(
                "max_stalled_responses must be positive".into(),
            ));
        }
        Ok(())
    }
}
