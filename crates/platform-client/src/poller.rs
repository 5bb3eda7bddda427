//! RunSession stabilization poller
//!
//! The platform fills a RunSession's `runRequests` asynchronously and never
//! signals completion. The poller treats the session as done once the list
//! length has matched the previous observation three times in a row.

use futures::future::BoxFuture;
use rw_core::model::RunSession;
use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PollSettings;
use crate::error::{ClientError, Result};
use crate::transport::PlatformClient;

/// Consecutive unchanged observations needed to call a session stable
pub const STABLE_POLLS_REQUIRED: u32 = 3;

/// Anything that can fetch the current state of a RunSession
pub trait RunSessionSource: Send + Sync {
    fn fetch_runsession(&self, session_id: i64) -> BoxFuture<'_, Result<RunSession>>;
}

impl RunSessionSource for PlatformClient {
    fn fetch_runsession(&self, session_id: i64) -> BoxFuture<'_, Result<RunSession>> {
        Box::pin(PlatformClient::fetch_runsession(self, session_id))
    }
}

/// Waits for a RunSession's request list to stop changing
#[derive(Debug, Clone)]
pub struct StabilizationPoller {
    settings: PollSettings,
    cancel: Option<CancellationToken>,
}

impl StabilizationPoller {
    pub fn new(settings: PollSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            cancel: None,
        })
    }

    /// Stop polling early once `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|t| t.is_cancelled())
    }

    /// Poll until stable and return the last fetched document.
    ///
    /// Fetch errors are returned as-is without retrying.
    pub async fn wait_until_stable<S>(&self, source: &S, session_id: i64) -> Result<RunSession>
    where
        S: RunSessionSource + ?Sized,
    {
        let started = Instant::now();
        let mut stable_count: u32 = 0;
        let mut last_length: Option<usize> = None;

        loop {
            if self.is_cancelled() {
                return Err(ClientError::Cancelled { session_id });
            }

            let session = source.fetch_runsession(session_id).await?;
            let length = session.run_request_count();

            if last_length == Some(length) {
                stable_count += 1;
            } else {
                stable_count = 0;
            }
            last_length = Some(length);

            debug!(
                "RunSession {}: {} run requests, stable for {} polls",
                session_id, length, stable_count
            );

            if stable_count >= STABLE_POLLS_REQUIRED {
                info!(
                    "RunSession {} stabilized with {} run requests after {:.1}s",
                    session_id,
                    length,
                    started.elapsed().as_secs_f64()
                );
                return Ok(session);
            }

            let elapsed = started.elapsed();
            if elapsed > self.settings.max_wait {
                warn!(
                    "RunSession {} still changing after {:.1}s, giving up",
                    session_id,
                    elapsed.as_secs_f64()
                );
                return Err(ClientError::StabilizationTimeout {
                    session_id,
                    elapsed_secs: elapsed.as_secs_f64(),
                    last_length: length,
                });
            }

            match &self.cancel {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(ClientError::Cancelled { session_id });
                        }
                        _ = sleep(self.settings.poll_interval) => {}
                    }
                }
                None => sleep(self.settings.poll_interval).await,
            }
        }
    }
}
