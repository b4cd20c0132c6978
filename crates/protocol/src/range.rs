//! `Content-Range` request headers and `Range` response headers.

use std::fmt;

use crate::constants::BYTES_UNIT;

/// Error produced when a range header cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("malformed range header: {0:?}")]
    Malformed(String),

    #[error("range end {end} precedes start {start}")]
    Inverted { start: u64, end: u64 },
}

/// Position of a chunk inside the payload, as sent in `Content-Range`.
///
/// Always derived from a chunk and the payload length, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteRangeDescriptor {
    /// `bytes {start}-{end}/{total}`, `end` inclusive.
    Span { start: u64, end: u64, total: u64 },
    /// `bytes */{total}`: a zero-length probe.
    Probe { total: u64 },
}

impl ByteRangeDescriptor {
    /// Describes `length` bytes at `offset` in a payload of `total` bytes.
    ///
    /// A zero `length` yields a [`Probe`](Self::Probe).
    pub fn for_chunk(offset: u64, length: u64, total: u64) -> Self {
        if length == 0 {
            Self::Probe { total }
        } else {
            Self::Span {
                start: offset,
                end: offset + length - 1,
                total,
            }
        }
    }

    /// Total payload length carried by the descriptor.
    pub fn total(&self) -> u64 {
        match *self {
            Self::Span { total, .. } | Self::Probe { total } => total,
        }
    }

    pub fn is_probe(&self) -> bool {
        matches!(self, Self::Probe { .. })
    }
}

impl fmt::Display for ByteRangeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Span { start, end, total } => write!(f, "{BYTES_UNIT} {start}-{end}/{total}"),
            Self::Probe { total } => write!(f, "{BYTES_UNIT} */{total}"),
        }
    }
}

/// Parses a `Range: bytes=0-{N}` response header into the next byte the
/// server expects (`N + 1`).
///
/// Only the upper bound matters: servers always report a prefix.
pub fn parse_received_range(header: &str) -> Result<u64, RangeError> {
    let malformed = || RangeError::Malformed(header.to_string());

    let value = header.trim();
    let value = value
        .strip_prefix(BYTES_UNIT)
        .and_then(|rest| rest.strip_prefix('='))
        .unwrap_or(value);
    let (start, end) = value.split_once('-').ok_or_else(malformed)?;
    let start: u64 = start.trim().parse().map_err(|_| malformed())?;
    let end: u64 = end.trim().parse().map_err(|_| malformed())?;

    if end < start {
        return Err(RangeError::Inverted { start, end });
    }

    end.checked_add(1).ok_or_else(malformed)
}
