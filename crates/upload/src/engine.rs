//! Resumable upload control loop.
//!
//! One call to [`ResumableUploadEngine::upload`] owns one session: it plans
//! a chunk at the confirmed offset, sends it, interprets the answer and
//! either finishes, resends from the new confirmed offset, or hands a
//! non-success response back to the caller.

use chunkput_protocol::{RangeError, ServerAck};
use chunkput_protocol::constants::RANGE;
use chunkput_transfer::{ChunkPlanner, ReplayableByteSource, ThroughputMeter, UploadProgress};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::UploadConfig;
use crate::error::{ProtocolViolation, UploadError};
use crate::transport::{ChunkRequest, TransportExecutor, UploadResponse};
use crate::types::{UploadEvent, UploadTarget};

/// What the engine does after a chunk response.
#[derive(Debug)]
pub enum Transition {
    /// `2xx`: the whole payload is stored.
    Complete(UploadResponse),
    /// `308`: continue from `next_offset`.
    Resume { next_offset: u64 },
    /// Anything else: return the response as-is.
    PassThrough(UploadResponse),
}

/// Decides the next step after sending `chunk_len` bytes at
/// `progress.bytes_confirmed()`.
///
/// A `308` must confirm a prefix no shorter than what was already confirmed
/// and no longer than what has been sent, and must never answer a
/// zero-length probe. A `Range` header that is present but not readable
/// text is malformed, not absent.
pub fn interpret(
    progress: &UploadProgress,
    chunk_len: u64,
    response: UploadResponse,
) -> Result<Transition, ProtocolViolation> {
    let range = response
        .headers
        .get(RANGE)
        .map(|value| {
            value.to_str().map_err(|_| {
                RangeError::Malformed(String::from_utf8_lossy(value.as_bytes()).into_owned())
            })
        })
        .transpose()?;
    let ack = ServerAck::from_response(response.status, range)?;

    if ack.is_success() {
        return Ok(Transition::Complete(response));
    }

    let Some(reported) = ack.next_expected_offset else {
        return Ok(Transition::PassThrough(response));
    };

    if chunk_len == 0 {
        return Err(ProtocolViolation::ProbeNotAccepted {
            total: progress.total_length(),
        });
    }

    let confirmed = progress.bytes_confirmed();
    if reported < confirmed {
        return Err(ProtocolViolation::AckRegressed {
            confirmed,
            reported,
        });
    }

    let sent_end = confirmed + chunk_len;
    if reported > sent_end {
        return Err(ProtocolViolation::AckBeyondChunk { sent_end, reported });
    }

    Ok(Transition::Resume {
        next_offset: reported,
    })
}

/// Drives resumable uploads through a [`TransportExecutor`].
///
/// The engine holds no per-upload state, so one engine can run many
/// independent uploads concurrently.
pub struct ResumableUploadEngine<T> {
    transport: T,
    config: UploadConfig,
    cancel: CancellationToken,
    events: Option<mpsc::Sender<UploadEvent>>,
}

impl<T: TransportExecutor> ResumableUploadEngine<T> {
    /// Creates an engine after validating `config`.
    pub fn new(transport: T, config: UploadConfig) -> Result<Self, UploadError> {
        config.validate()?;
        Ok(Self {
            transport,
            config,
            cancel: CancellationToken::new(),
            events: None,
        })
    }

    /// Uses `cancel` to stop uploads between chunks.
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Emits progress events on `events_tx`. Events are dropped if the
    /// channel is full or closed.
    pub fn with_events(mut self, events_tx: mpsc::Sender<UploadEvent>) -> Self {
        self.events = Some(events_tx);
        self
    }

    /// Returns the cancellation token shared by all uploads of this engine.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Uploads `source` to `target`.
    ///
    /// `source` is consumed and dropped before this returns, on every path.
    /// Returns the terminal response for `2xx` and for any status other than
    /// `308`; see [`UploadError`] for failures.
    pub async fn upload<S>(
        &self,
        mut source: S,
        target: UploadTarget,
    ) -> Result<UploadResponse, UploadError>
    where
        S: ReplayableByteSource,
    {
        let UploadTarget {
            destination,
            total_length,
            content_type,
        } = target;

        let planner = ChunkPlanner::new(total_length, self.config.chunk_size)?;
        let mut progress = UploadProgress::new(total_length, destination);
        let mut meter = ThroughputMeter::default();
        let mut stalled: u32 = 0;

        info!(
            destination = %progress.destination(),
            total_bytes = total_length,
            chunk_size = planner.max_chunk_bytes(),
            "starting resumable upload"
        );
        self.emit(UploadEvent::Started {
            total: total_length,
        });

        loop {
            self.check_cancelled()?;

            let chunk = planner.next(&mut source, progress.bytes_confirmed()).await?;
            let chunk_len = chunk.len();
            let sent_end = chunk.end();
            let content_range = chunk.range(total_length);

            progress.mark_in_progress()?;
            debug!(%content_range, is_final = chunk.is_final, "sending chunk");

            let request = ChunkRequest {
                destination: progress.destination(),
                content_range,
                content_type: &content_type,
                body: chunk.data,
            };
            let response = self.transport.send(request).await.inspect_err(|e| {
                warn!(%content_range, error = %e, "chunk request failed");
            })?;

            match interpret(&progress, chunk_len, response)? {
                Transition::Complete(response) => {
                    let gained = progress.remaining();
                    progress.advance_to(total_length)?;
                    progress.mark_complete()?;
                    meter.record(gained);

                    info!(
                        status = response.status,
                        total_bytes = total_length,
                        "upload complete"
                    );
                    self.emit(UploadEvent::Progress {
                        confirmed: total_length,
                        total: total_length,
                        bytes_per_second: meter.bytes_per_second(),
                    });
                    self.emit(UploadEvent::Completed {
                        total: total_length,
                    });
                    return Ok(response);
                }
                Transition::Resume { next_offset } => {
                    let gained = next_offset - progress.bytes_confirmed();
                    progress.advance_to(next_offset)?;

                    if gained == 0 {
                        stalled += 1;
                        warn!(
                            offset = next_offset,
                            stalled, "server confirmed no new bytes"
                        );
                        if stalled >= self.config.max_stalled_responses {
                            return Err(UploadError::Stalled {
                                offset: next_offset,
                                responses: stalled,
                            });
                        }
                    } else {
                        stalled = 0;
                        meter.record(gained);
                    }

                    if next_offset < sent_end {
                        debug!(
                            sent_end,
                            confirmed = next_offset,
                            "partial receipt, resending remainder"
                        );
                        self.emit(UploadEvent::Resynced {
                            sent_end,
                            confirmed: next_offset,
                        });
                    }

                    self.emit(UploadEvent::Progress {
                        confirmed: next_offset,
                        total: total_length,
                        bytes_per_second: meter.bytes_per_second(),
                    });
                }
                Transition::PassThrough(response) => {
                    warn!(
                        status = response.status,
                        confirmed = progress.bytes_confirmed(),
                        "upload ended with non-success status"
                    );
                    return Ok(response);
                }
            }
        }
    }

    fn check_cancelled(&self) -> Result<(), UploadError> {
        if self.cancel.is_cancelled() {
            Err(UploadError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn emit(&self, event: UploadEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.try_send(event);
        }
    }
}
