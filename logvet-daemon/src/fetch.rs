//! HTTP implementation of the `LogFetcher` collaborator.
//!
//! Fetch failures surface as `RetrievalError` and abort the submission;
//! no partial report is ever produced from an unreadable log.

use std::time::Duration;

use metrics::{counter, histogram};
use tracing::debug;

use logvet_core::collaborator::{BoxFuture, LogFetcher};
use logvet_core::config::FetchConfig;
use logvet_core::error::RetrievalError;
use logvet_core::metrics as metric_names;
use logvet_core::types::LogDocument;

/// `LogFetcher` backed by `reqwest` with a per-request timeout from
/// `[fetch]` config.
pub struct HttpLogFetcher {
    client: reqwest::Client,
}

impl HttpLogFetcher {
    /// Build the fetcher from the `[fetch]` config section.
    pub fn new(config: &FetchConfig) -> Result<Self, RetrievalError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RetrievalError::RequestFailed {
                url: String::new(),
                reason: format!("failed to build http client: {e}"),
            })?;
        Ok(Self { client })
    }

    async fn fetch_inner(&self, url: &str) -> Result<LogDocument, RetrievalError> {
        if !url.starts_with("https://") {
            return Err(RetrievalError::InvalidUrl(url.to_owned()));
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::TimedOut {
                    url: url.to_owned(),
                }
            } else {
                RetrievalError::RequestFailed {
                    url: url.to_owned(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RetrievalError::RequestFailed {
                url: url.to_owned(),
                reason: format!("unexpected status {status}"),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RetrievalError::UnreadableBody {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        debug!(url, bytes = body.len(), "fetched log document");
        Ok(LogDocument::new(body))
    }
}

impl LogFetcher for HttpLogFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<LogDocument, RetrievalError>> {
        Box::pin(async move {
            let started = std::time::Instant::now();
            let result = self.fetch_inner(url).await;

            let outcome = if result.is_ok() { "success" } else { "failure" };
            counter!(
                metric_names::FETCH_REQUESTS_TOTAL,
                metric_names::LABEL_RESULT => outcome
            )
            .increment(1);
            histogram!(metric_names::FETCH_DURATION_SECONDS)
                .record(started.elapsed().as_secs_f64());

            result
        })
    }
}
