//! Server acknowledgment decoded from a chunk response.

use crate::constants::STATUS_RESUME_INCOMPLETE;
use crate::range::{RangeError, parse_received_range};

/// What the server told us after one chunk request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerAck {
    pub status: u16,
    /// Next byte the server expects. Only set on `308`; a `308` without a
    /// `Range` header means nothing has been stored yet.
    pub next_expected_offset: Option<u64>,
}

impl ServerAck {
    /// Decodes a status code and the optional `Range` response header.
    pub fn from_response(status: u16, range_header: Option<&str>) -> Result<Self, RangeError> {
        let next_expected_offset = if status == STATUS_RESUME_INCOMPLETE {
            match range_header {
                Some(value) => Some(parse_received_range(value)?),
                None => Some(0),
            }
        } else {
            None
        };

        Ok(Self {
            status,
            next_expected_offset,
        })
    }

    /// Any `2xx`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
