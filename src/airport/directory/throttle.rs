//! Cooperative throttling between directory page requests

use log::info;
use std::time::Duration;
use tokio::time::sleep;

use crate::airport::error::{AirportError, AirportResult};

/// Paces page requests and absorbs upstream 429 answers.
pub(crate) struct PageThrottle {
    pub(crate) page_delay: Duration,
    pub(crate) max_retries: u32,
    pub(crate) max_retry_wait: Duration,
    pub(crate) retries: u32,
}

impl PageThrottle {
    pub fn new(page_delay: Duration, max_retries: u32, max_retry_wait: Duration) -> Self {
        Self {
            page_delay,
            max_retries,
            max_retry_wait,
            retries: 0,
        }
    }

    /// Fixed courtesy pause before each page request.
    pub async fn pause(&self) {
        if !self.page_delay.is_zero() {
            sleep(self.page_delay).await;
        }
    }

    /// A page was served; the retry budget starts over for the next one.
    pub fn reset(&mut self) {
        self.retries = 0;
    }

    /// Wait out a 429 before retrying the same page.
    ///
    /// Fails once the per-page retry budget is spent or the provider asks for
    /// a longer wait than `max_retry_wait`.
    pub async fn backoff(&mut self, retry_after: Option<Duration>) -> AirportResult<()> {
        if self.retries >= self.max_retries {
            return Err(AirportError::UpstreamUnavailable(format!(
                "rate limited after {} retries",
                self.retries
            )));
        }

        let wait_time = retry_after.unwrap_or(self.page_delay);
        if wait_time > self.max_retry_wait {
            return Err(AirportError::UpstreamUnavailable(format!(
                "rate limited, provider asked to wait {wait_time:?}"
            )));
        }

        self.retries += 1;
        info!(
            "Directory provider rate limited, waiting {wait_time:?} (retry {}/{})",
            self.retries, self.max_retries
        );
        sleep(wait_time).await;
        Ok(())
    }
}
