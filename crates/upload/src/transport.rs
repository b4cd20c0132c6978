//! The seam between the engine and the network.
//!
//! [`HttpTransport`](crate::HttpTransport) is the production implementation;
//! tests drive the engine through in-memory servers.

use std::future::Future;
use std::pin::Pin;

use chunkput_protocol::ByteRangeDescriptor;
use reqwest::header::HeaderMap;
use url::Url;

use crate::error::TransportError;

/// One range-addressed write.
#[derive(Debug)]
pub struct ChunkRequest<'a> {
    pub destination: &'a Url,
    pub content_range: ByteRangeDescriptor,
    /// Empty means no `Content-Type` header.
    pub content_type: &'a str,
    pub body: Vec<u8>,
}

/// A complete response, whatever its status.
#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl UploadResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Any `2xx`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one chunk and returns the raw response.
///
/// Implementations must return `Ok` for every HTTP status, including
/// 4xx/5xx, and `Err` only when no response was obtained. Whatever
/// connection the call used must be released before the future resolves.
pub trait TransportExecutor: Send + Sync {
    fn send<'a>(
        &'a self,
        request: ChunkRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<UploadResponse, TransportError>> + Send + 'a>>;
}
