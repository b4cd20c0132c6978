use tracing::trace;

use crate::source::ReplayableByteSource;
use crate::types::Chunk;
use crate::TransferError;

/// Cuts the payload into bounded chunks starting at a confirmed offset.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPlanner {
    total_length: u64,
    max_chunk_bytes: usize,
}

impl ChunkPlanner {
    /// Plans chunks for a payload of `total_length` bytes.
    ///
    /// Fails with [`TransferError::ZeroChunkSize`] if `max_chunk_bytes` is 0.
    pub fn new(total_length: u64, max_chunk_bytes: usize) -> Result<Self, TransferError> {
        if max_chunk_bytes == 0 {
            return Err(TransferError::ZeroChunkSize);
        }
        Ok(Self {
            total_length,
            max_chunk_bytes,
        })
    }

    pub fn max_chunk_bytes(&self) -> usize {
        self.max_chunk_bytes
    }

    /// Length of the chunk that starts at `from_offset`.
    pub fn chunk_len_at(&self, from_offset: u64) -> Result<u64, TransferError> {
        let remaining = self
            .total_length
            .checked_sub(from_offset)
            .ok_or(TransferError::OffsetOutOfRange {
                offset: from_offset,
                total: self.total_length,
            })?;
        Ok(remaining.min(self.max_chunk_bytes as u64))
    }

    /// Reads the next chunk starting at `from_offset`.
    ///
    /// At the end of the payload this returns a zero-length final chunk
    /// (the `bytes */{total}` probe).
    pub async fn next<S>(&self, source: &mut S, from_offset: u64) -> Result<Chunk, TransferError>
    where
        S: ReplayableByteSource + ?Sized,
    {
        let len = self.chunk_len_at(from_offset)?;
        let mut data = vec![0u8; len as usize];
        if len > 0 {
            source.read_at(from_offset, &mut data).await?;
        }

        trace!(offset = from_offset, len, total = self.total_length, "planned chunk");

        Ok(Chunk {
            offset: from_offset,
            data,
            is_final: from_offset + len == self.total_length,
        })
    }
}
