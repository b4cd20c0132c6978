use chunkput_protocol::ByteRangeDescriptor;
use url::Url;

use crate::ProgressError;

/// A contiguous slice of the payload, sent in exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Byte offset of the first byte within the payload.
    pub offset: u64,
    /// Raw chunk data. Empty for a probe.
    pub data: Vec<u8>,
    /// `true` when the chunk reaches the end of the payload.
    pub is_final: bool,
}

impl Chunk {
    /// Number of bytes carried.
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset one past the last byte carried.
    pub fn end(&self) -> u64 {
        self.offset + self.len()
    }

    /// `Content-Range` descriptor for this chunk.
    pub fn range(&self, total_length: u64) -> ByteRangeDescriptor {
        ByteRangeDescriptor::for_chunk(self.offset, self.len(), total_length)
    }
}

/// Lifecycle of one upload session. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UploadState {
    NotStarted,
    InProgress,
    Complete,
}

/// Confirmed-offset bookkeeping for a single upload call.
///
/// Owned by the engine for the duration of one `upload`; never shared.
#[derive(Debug, Clone)]
pub struct UploadProgress {
    total_length: u64,
    bytes_confirmed: u64,
    state: UploadState,
    destination: Url,
}

impl UploadProgress {
    /// Creates progress for a payload of `total_length` bytes.
    pub fn new(total_length: u64, destination: Url) -> Self {
        Self {
            total_length,
            bytes_confirmed: 0,
            state: UploadState::NotStarted,
            destination,
        }
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    /// Bytes the server has durably acknowledged.
    pub fn bytes_confirmed(&self) -> u64 {
        self.bytes_confirmed
    }

    pub fn remaining(&self) -> u64 {
        self.total_length - self.bytes_confirmed
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn destination(&self) -> &Url {
        &self.destination
    }

    /// Moves the confirmed offset forward.
    ///
    /// Fails if `offset` would un-acknowledge bytes or run past the payload.
    pub fn advance_to(&mut self, offset: u64) -> Result<(), ProgressError> {
        if offset < self.bytes_confirmed || offset > self.total_length {
            return Err(ProgressError::InvariantViolation {
                confirmed: self.bytes_confirmed,
                requested: offset,
                total: self.total_length,
            });
        }
        self.bytes_confirmed = offset;
        Ok(())
    }

    /// Marks the session as in-progress. Idempotent until completion.
    pub fn mark_in_progress(&mut self) -> Result<(), ProgressError> {
        self.transition(UploadState::InProgress)
    }

    /// Marks the session as complete. Requires every byte to be confirmed.
    pub fn mark_complete(&mut self) -> Result<(), ProgressError> {
        if self.bytes_confirmed != self.total_length {
            return Err(ProgressError::PrematureCompletion {
                confirmed: self.bytes_confirmed,
                total: self.total_length,
            });
        }
        self.transition(UploadState::Complete)
    }

    fn transition(&mut self, to: UploadState) -> Result<(), ProgressError> {
        if to < self.state {
            return Err(ProgressError::StateRegression {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(total: u64) -> UploadProgress {
        UploadProgress::new(total, Url::parse("https://storage.test/upload?id=1").unwrap())
    }

    #[test]
    fn new_progress_is_not_started() {
        let p = progress(100);
        assert_eq!(p.state(), UploadState::NotStarted);
        assert_eq!(p.bytes_confirmed(), 0);
        assert_eq!(p.remaining(), 100);
        assert_eq!(p.destination().host_str(), Some("storage.test"));
    }

    #[test]
    fn advance_moves_forward() {
        let mut p = progress(100);
        p.advance_to(40).unwrap();
        assert_eq!(p.bytes_confirmed(), 40);
        p.advance_to(40).unwrap();
        p.advance_to(100).unwrap();
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn advance_rejects_regression() {
        let mut p = progress(100);
        p.advance_to(60).unwrap();
        let err = p.advance_to(59).unwrap_err();
        assert_eq!(
            err,
            ProgressError::InvariantViolation {
                confirmed: 60,
                requested: 59,
                total: 100
            }
        );
        assert_eq!(p.bytes_confirmed(), 60);
    }

    #[test]
    fn advance_rejects_past_total() {
        let mut p = progress(100);
        p.advance_to(100).unwrap();
        assert!(p.advance_to(101).is_err());
        assert_eq!(p.bytes_confirmed(), 100);
    }

    #[test]
    fn complete_requires_all_bytes() {
        let mut p = progress(100);
        p.mark_in_progress().unwrap();
        p.advance_to(99).unwrap();
        assert_eq!(
            p.mark_complete().unwrap_err(),
            ProgressError::PrematureCompletion {
                confirmed: 99,
                total: 100
            }
        );
        p.advance_to(100).unwrap();
        p.mark_complete().unwrap();
        assert_eq!(p.state(), UploadState::Complete);
    }

    #[test]
    fn empty_payload_completes_immediately() {
        let mut p = progress(0);
        p.mark_complete().unwrap();
        assert_eq!(p.state(), UploadState::Complete);
    }

    #[test]
    fn state_never_moves_backward() {
        let mut p = progress(0);
        p.mark_in_progress().unwrap();
        p.mark_in_progress().unwrap();
        p.mark_complete().unwrap();
        assert_eq!(
            p.mark_in_progress().unwrap_err(),
            ProgressError::StateRegression {
                from: UploadState::Complete,
                to: UploadState::InProgress
            }
        );
    }

    #[test]
    fn chunk_range_and_end() {
        let chunk = Chunk {
            offset: 10,
            data: vec![0; 5],
            is_final: true,
        };
        assert_eq!(chunk.end(), 15);
        assert_eq!(chunk.range(15).to_string(), "bytes 10-14/15");

        let probe = Chunk {
            offset: 15,
            data: Vec::new(),
            is_final: true,
        };
        assert!(probe.is_empty());
        assert_eq!(probe.range(15).to_string(), "bytes */15");
    }
}
