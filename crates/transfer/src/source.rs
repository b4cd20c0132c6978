//! Byte sources that can serve the same range more than once.

use std::future::Future;
use std::io::{self, Cursor, SeekFrom};
use std::path::Path;
use std::pin::Pin;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};

/// A payload that can be read at arbitrary offsets, any number of times.
///
/// Offset bookkeeping and byte reading go through this one handle, so a
/// resend after a partial receipt always reads exactly the bytes the
/// server is missing.
pub trait ReplayableByteSource: Send {
    /// Fills `buf` with the bytes starting at `offset`.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] if the source ends first.
    fn read_at<'a>(
        &'a mut self,
        offset: u64,
        buf: &'a mut [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>>;
}

/// Any seekable async reader: files, in-memory cursors.
pub struct SeekableSource<R> {
    inner: R,
    /// Current read position, `None` after a failed read.
    position: Option<u64>,
}

impl<R> SeekableSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: None,
        }
    }
}

impl SeekableSource<tokio::fs::File> {
    /// Opens `path` for replayable reading.
    pub async fn open(path: &Path) -> io::Result<Self> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Self::new(file))
    }
}

impl SeekableSource<Cursor<Vec<u8>>> {
    /// Serves an in-memory payload.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::new(Cursor::new(data))
    }
}

impl<R> ReplayableByteSource for SeekableSource<R>
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
{
    fn read_at<'a>(
        &'a mut self,
        offset: u64,
        buf: &'a mut [u8],
    ) -> Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>> {
        Box::pin(async move {
            // Sequential reads skip the seek.
            if self.position != Some(offset) {
                self.position = None;
                self.inner.seek(SeekFrom::Start(offset)).await?;
            }
            self.position = None;
            self.inner.read_exact(buf).await?;
            self.position = Some(offset + buf.len() as u64);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn memory_source_reads_at_offset() {
        let mut src = SeekableSource::from_bytes(b"0123456789".to_vec());
        let mut buf = [0u8; 4];
        src.read_at(3, &mut buf).await.unwrap();
        assert_eq!(&buf, b"3456");
    }

    #[tokio::test]
    async fn memory_source_replays_range() {
        let mut src = SeekableSource::from_bytes(b"0123456789".to_vec());
        let mut first = [0u8; 6];
        src.read_at(0, &mut first).await.unwrap();

        // Rewind into the middle of what was already read.
        let mut again = [0u8; 3];
        src.read_at(2, &mut again).await.unwrap();
        assert_eq!(&again, b"234");
    }

    #[tokio::test]
    async fn short_source_is_unexpected_eof() {
        let mut src = SeekableSource::from_bytes(b"abc".to_vec());
        let mut buf = [0u8; 4];
        let err = src.read_at(1, &mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        // A failed read must not poison later reads.
        let mut buf = [0u8; 2];
        src.read_at(1, &mut buf).await.unwrap();
        assert_eq!(&buf, b"bc");
    }

    #[tokio::test]
    async fn file_source_reads_and_replays() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"The quick brown fox").unwrap();

        let mut src = SeekableSource::open(file.path()).await.unwrap();
        let mut buf = [0u8; 5];
        src.read_at(4, &mut buf).await.unwrap();
        assert_eq!(&buf, b"quick");
        src.read_at(10, &mut buf).await.unwrap();
        assert_eq!(&buf, b"brown");
        src.read_at(4, &mut buf).await.unwrap();
        assert_eq!(&buf, b"quick");
    }

    #[tokio::test]
    async fn missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SeekableSource::open(&dir.path().join("nope.bin")).await.is_err());
    }
}
