//! Paginated airport directory ingestion
//!
//! Walks the provider's listing page by page, pausing between requests, and
//! assembles one complete [`AirportDirectory`]. Nothing is returned until the
//! last page has been parsed.

mod throttle;
mod wire;

use log::{debug, info};
use std::collections::HashSet;
use std::time::Duration;

use crate::airport::cache::DirectoryLoader;
use crate::airport::client::Transport;
use crate::airport::config::AirportConfig;
use crate::airport::error::{AirportError, AirportResult};
use crate::airport::types::AirportDirectory;

use throttle::PageThrottle;
use wire::DirectoryPage;

/// Fetches the full airport directory from a paginated endpoint.
pub struct PagedDirectoryFetcher<T> {
    transport: T,
    first_page_url: String,
    page_delay: Duration,
    max_pages: usize,
    max_rate_limit_retries: u32,
    max_retry_wait: Duration,
}

impl<T: Transport> PagedDirectoryFetcher<T> {
    pub fn new(transport: T, config: &AirportConfig) -> Self {
        Self {
            transport,
            first_page_url: config.directory_url.clone(),
            page_delay: config.page_delay,
            max_pages: config.max_pages,
            max_rate_limit_retries: config.max_rate_limit_retries,
            max_retry_wait: config.max_retry_wait,
        }
    }

    /// Fetch every page and return the assembled directory in page order.
    ///
    /// # Errors
    ///
    /// - `AirportError::UpstreamUnavailable` if a page request fails, the
    ///   listing runs past `max_pages`, a `next` link points at a page that
    ///   was already visited, or rate limiting outlasts the retry budget
    /// - `AirportError::Parse` if a page body is not a valid listing
    pub async fn fetch(&self) -> AirportResult<AirportDirectory> {
        let mut throttle = PageThrottle::new(
            self.page_delay,
            self.max_rate_limit_retries,
            self.max_retry_wait,
        );
        let mut airports = Vec::new();
        let mut visited = HashSet::new();
        let mut next_url = Some(self.first_page_url.clone());
        let mut pages = 0usize;

        while let Some(url) = next_url.take() {
            if pages >= self.max_pages {
                return Err(AirportError::UpstreamUnavailable(format!(
                    "directory listing exceeded {} pages",
                    self.max_pages
                )));
            }
            if !visited.insert(url.clone()) {
                return Err(AirportError::UpstreamUnavailable(format!(
                    "directory pagination revisits {url}"
                )));
            }

            let page = self.fetch_page(&url, &mut throttle).await?;
            pages += 1;

            let before = airports.len();
            airports.extend(
                page.data
                    .into_iter()
                    .filter_map(|resource| resource.attributes.into_record()),
            );
            debug!(
                "Directory page {pages} ({url}): {} airports",
                airports.len() - before
            );

            next_url = page
                .links
                .as_ref()
                .and_then(|links| links.continuation())
                .map(str::to_string);
        }

        info!(
            "Fetched airport directory: {} airports across {pages} pages",
            airports.len()
        );
        Ok(AirportDirectory::new(airports))
    }

    async fn fetch_page(&self, url: &str, throttle: &mut PageThrottle) -> AirportResult<DirectoryPage> {
        throttle.reset();
        loop {
            throttle.pause().await;
            match self.transport.get(url).await {
                Ok(body) => return Ok(serde_json::from_slice(&body)?),
                Err(AirportError::RateLimited { retry_after }) => {
                    throttle.backoff(retry_after).await?;
                }
                Err(AirportError::Parse(msg)) => return Err(AirportError::Parse(msg)),
                Err(e) => {
                    return Err(AirportError::UpstreamUnavailable(format!(
                        "directory page {url}: {e}"
                    )));
                }
            }
        }
    }
}

impl<T: Transport> DirectoryLoader for PagedDirectoryFetcher<T> {
    async fn load(&self) -> AirportResult<AirportDirectory> {
        self.fetch().await
    }
}
