//! reqwest-backed [`TransportExecutor`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE};
use tracing::trace;

use crate::config::UploadConfig;
use crate::error::TransportError;
use crate::transport::{ChunkRequest, TransportExecutor, UploadResponse};

/// Sends chunks as HTTP `PUT` requests.
pub struct HttpTransport {
    client: reqwest::Client,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Builds a client from `config`.
    ///
    /// Redirects are disabled: a `308` here means "resume incomplete".
    pub fn new(config: &UploadConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self::with_client(client, config.request_timeout()))
    }

    /// Uses an existing client. It must not follow redirects.
    pub fn with_client(client: reqwest::Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }
}

impl TransportExecutor for HttpTransport {
    fn send<'a>(
        &'a self,
        request: ChunkRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<UploadResponse, TransportError>> + Send + 'a>> {
        Box::pin(async move {
            let ChunkRequest {
                destination,
                content_range,
                content_type,
                body,
            } = request;

            let mut builder = self
                .client
                .put(destination.clone())
                .header(CONTENT_RANGE, content_range.to_string())
                .header(CONTENT_LENGTH, body.len())
                .timeout(self.request_timeout);
            if !content_type.is_empty() {
                builder = builder.header(CONTENT_TYPE, content_type);
            }

            let response = builder.body(body).send().await?;

            let status = response.status().as_u16();
            let headers = response.headers().clone();
            // Draining the body hands the connection back to the pool.
            let body = response.bytes().await?.to_vec();

            trace!(%content_range, status, "chunk response");

            Ok(UploadResponse {
                status,
                headers,
                body,
            })
        })
    }
}
