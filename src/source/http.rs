//! HTTP polling data source.
//!
//! Polls the monitoring endpoint's `/data` resource on a fixed interval
//! from a background task and hands parsed snapshots to the application
//! through a channel. Transport failures surface as a sticky
//! "connection lost" error, cleared by the next successful poll.

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::Client;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{RawSnapshot, SnapshotSource};

/// Delay before re-polling after a transport failure.
const ERROR_BACKOFF: Duration = Duration::from_secs(10);

/// Errors that can occur while fetching a snapshot.
#[derive(Debug, Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Failed to parse the response body.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for a response.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if err.is_connect() {
            SourceError::Connection(err.to_string())
        } else {
            SourceError::Http(err.to_string())
        }
    }
}

/// A data source that polls the monitoring endpoint over HTTP.
///
/// A background tokio task GETs `{url}/data?env={env}&t={millis}` (the
/// `t` parameter busts intermediary caches) every `interval`, pushing
/// parsed snapshots into a channel that `poll` drains without blocking.
/// The task checks a cancellation token before every reschedule, so
/// dropping the source tears the loop down race-free; a fetch resolving
/// after teardown finds the channel closed and is discarded.
#[derive(Debug)]
pub struct HttpSource {
    receiver: mpsc::Receiver<RawSnapshot>,
    description: String,
    last_error: Arc<Mutex<Option<String>>>,
    cancel: CancellationToken,
}

impl HttpSource {
    /// Spawn the polling task. Must be called within a tokio runtime.
    pub fn spawn(base_url: &str, env: &str, interval: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let last_error = Arc::new(Mutex::new(None));
        let error_handle = last_error.clone();
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let base = base_url.trim_end_matches('/').to_string();
        let env = env.to_string();
        let description = format!("http: {} (env {})", base, env);

        tokio::spawn(async move {
            let client = Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default();

            loop {
                let delay = match fetch_snapshot(&client, &base, &env).await {
                    Ok(snapshot) => {
                        debug!(services = snapshot.service_map.len(), "snapshot fetched");
                        *error_handle.lock().unwrap() = None;
                        if tx.send(snapshot).await.is_err() {
                            // Receiver dropped, we're done
                            break;
                        }
                        interval
                    }
                    Err(e) => {
                        warn!(error = %e, "snapshot poll failed");
                        *error_handle.lock().unwrap() =
                            Some(format!("Connection with server is lost: {}", e));
                        ERROR_BACKOFF
                    }
                };

                // Observe cancellation before rescheduling
                tokio::select! {
                    _ = task_cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        });

        Self {
            receiver: rx,
            description,
            last_error,
            cancel,
        }
    }

    /// Stop the background polling task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl SnapshotSource for HttpSource {
    fn poll(&mut self) -> Option<RawSnapshot> {
        match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}

async fn fetch_snapshot(client: &Client, base: &str, env: &str) -> Result<RawSnapshot, SourceError> {
    let url = poll_url(base, env, unix_millis());

    let response = client.get(&url).send().await?;

    if !response.status().is_success() {
        return Err(SourceError::Http(format!(
            "endpoint returned status {}",
            response.status()
        )));
    }

    response
        .json::<RawSnapshot>()
        .await
        .map_err(|e| SourceError::Parse(e.to_string()))
}

fn poll_url(base: &str, env: &str, t: u128) -> String {
    format!("{}/data?env={}&t={}", base, env, t)
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}
