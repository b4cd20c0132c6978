//! Wires the upload engine to the file system, signals and logs.

use anyhow::Context;
use chunkput_upload::{
    HttpTransport, ResumableUploadEngine, SeekableSource, UploadEvent, UploadTarget,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::Cli;
use crate::config::Config;

/// Uploads one file and fails unless the server answered `2xx`.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let total_length = tokio::fs::metadata(&cli.file)
        .await
        .with_context(|| format!("cannot stat {}", cli.file.display()))?
        .len();
    let source = SeekableSource::open(&cli.file)
        .await
        .with_context(|| format!("cannot open {}", cli.file.display()))?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling upload");
            interrupt.cancel();
        }
    });

    let (events_tx, events_rx) = mpsc::channel(64);
    let reporter = tokio::spawn(report_events(events_rx));

    let transport = HttpTransport::new(&config.upload)?;
    let engine = ResumableUploadEngine::new(transport, config.upload)?
        .with_cancel(cancel)
        .with_events(events_tx);

    tracing::info!(
        file = %cli.file.display(),
        url = %cli.url,
        bytes = total_length,
        "starting upload"
    );

    let target = UploadTarget::new(cli.url, total_length, config.content_type);
    let result = engine.upload(source, target).await;

    // Closing the sender ends the reporter.
    drop(engine);
    let _ = reporter.await;

    let response = result?;
    if !response.is_success() {
        let body = String::from_utf8_lossy(&response.body);
        anyhow::bail!("server answered HTTP {}: {}", response.status, body.trim());
    }

    tracing::info!(status = response.status, "upload finished");
    Ok(())
}

async fn report_events(mut rx: mpsc::Receiver<UploadEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            UploadEvent::Started { total } => {
                tracing::debug!(total, "upload started");
            }
            UploadEvent::Progress {
                confirmed,
                total,
                bytes_per_second,
            } => {
                let percent = if total == 0 {
                    100.0
                } else {
                    confirmed as f64 * 100.0 / total as f64
                };
                let mib_per_sec = bytes_per_second / (1024.0 * 1024.0);
                tracing::info!(
                    confirmed,
                    total,
                    percent = %format!("{percent:.1}"),
                    mib_per_sec = %format!("{mib_per_sec:.2}"),
                    "progress"
                );
            }
            UploadEvent::Resynced {
                sent_end,
                confirmed,
            } => {
                tracing::warn!(sent_end, confirmed, "server kept part of a chunk, resending");
            }
            UploadEvent::Completed { total } => {
                tracing::debug!(total, "server accepted payload");
            }
        }
    }
}
