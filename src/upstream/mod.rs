//! Upstream catalogue client
//!
//! [`MarvelClient::fetch_page`] issues one signed, retried page request.
//! [`MarvelClient::retrieve_all`] reads page 0 to learn the catalogue size, then
//! fetches every remaining page concurrently and merges the results.
//!
//! The fan-out is fail-together: every launched page runs to completion even
//! after a sibling has failed, and any failure discards the whole batch so an
//! incomplete snapshot is never handed to the reconciler.

use crate::characters::Character;
use crate::config::{RetryConfig, UpstreamConfig};
use crate::error::{Error, Result};
use crate::retry::execute_with_retry;
use crate::signer::sign;
use reqwest::StatusCode;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

mod types;

pub use types::{CharacterData, Envelope, Page};

/// Client for the paginated upstream characters endpoint
#[derive(Clone, Debug)]
pub struct MarvelClient {
    http: reqwest::Client,
    config: Arc<UpstreamConfig>,
    retry: RetryConfig,
}

impl MarvelClient {
    /// Create a client with the configured request timeout
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: UpstreamConfig, retry: RetryConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("marvel-forwarder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: Arc::new(config),
            retry,
        })
    }

    /// Page size used by [`retrieve_all`](Self::retrieve_all)
    pub fn page_limit(&self) -> i64 {
        self.config.page_limit
    }

    /// Fetch and decode one page
    ///
    /// Each attempt is signed with a fresh timestamp. Non-200 answers and
    /// transport failures are retried; a body that fails to decode is not.
    pub async fn fetch_page(
        &self,
        offset: i64,
        limit: i64,
        cancel: &CancellationToken,
    ) -> Result<Page> {
        let body = execute_with_retry(&self.retry, cancel, || self.get_page_body(offset, limit))
            .await?;

        let envelope: Envelope = serde_json::from_slice(&body)?;
        debug!(
            offset,
            limit,
            total = envelope.data.total,
            count = envelope.data.count,
            "Fetched page"
        );
        Ok(envelope.data)
    }

    async fn get_page_body(&self, offset: i64, limit: i64) -> Result<Vec<u8>> {
        let ts = chrono::Utc::now().timestamp();
        let hash = sign(ts, &self.config.public_key, &self.config.private_key);

        let response = self
            .http
            .get(self.config.base_url.clone())
            .query(&[
                ("ts", ts.to_string()),
                ("apikey", self.config.public_key.clone()),
                ("hash", hash),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                url: self.config.base_url.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch the whole catalogue
    ///
    /// Page 0 is fetched first; its `total` fixes the page range `1..=total/limit`
    /// for the rest of the run. Every remaining page is fetched on its own task.
    /// Results are merged in page order.
    pub async fn retrieve_all(&self, cancel: &CancellationToken) -> Result<Vec<Character>> {
        let limit = self.config.page_limit;
        if limit <= 0 {
            return Err(Error::InvalidLimit(limit));
        }

        let first = self
            .fetch_page(0, limit, cancel)
            .await
            .map_err(|e| match e {
                Error::Cancelled => Error::Cancelled,
                e => Error::InitialFetchFailed(Box::new(e)),
            })?;

        let pages = page_count(first.total, limit);
        info!(total = first.total, limit, pages, "Starting concurrent page fetches");

        let mut tasks = JoinSet::new();
        for page_index in 1..=pages {
            let client = self.clone();
            let cancel = cancel.clone();
            tasks.spawn(async move {
                debug!(page_index, "Starting page worker");
                let result = client
                    .fetch_page(page_index * limit, limit, &cancel)
                    .await;
                debug!(page_index, ok = result.is_ok(), "Page worker finished");
                (page_index, result)
            });
        }
        let launched = tasks.len();

        let mut fetched: BTreeMap<i64, Page> = BTreeMap::new();
        let mut failures: BTreeMap<i64, Error> = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page_index, Ok(page))) => {
                    fetched.insert(page_index, page);
                }
                Ok((page_index, Err(e))) => {
                    error!(page_index, error = %e, "Page fetch failed");
                    failures.insert(page_index, e);
                }
                Err(e) => {
                    error!(error = %e, "Page worker did not complete");
                    // Unknown page index; sort after every real page
                    let key = i64::MAX - failures.len() as i64;
                    failures.insert(key, Error::Other(format!("page worker aborted: {e}")));
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if let Some((_, first_error)) = failures.pop_first() {
            return Err(Error::PartialFetchFailed {
                failed: failures.len() + 1,
                launched,
                first: Box::new(first_error),
            });
        }

        let mut batch = first.into_characters();
        for page in fetched.into_values() {
            batch.extend(page.into_characters());
        }

        info!(characters = batch.len(), pages = launched + 1, "Retrieved catalogue");
        Ok(batch)
    }
}

/// Number of pages to fetch after page 0
fn page_count(total: i64, limit: i64) -> i64 {
    (total / limit).max(0)
}
