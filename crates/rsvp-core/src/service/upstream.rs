//! Timeout and bounded retry for outbound calls
//!
//! Every call to the store directory or the policy source goes through
//! [`UpstreamPolicy::call`]: each attempt is bounded by a timeout, transient
//! failures back off exponentially, permanent failures stop immediately.

use serde::de::DeserializeOwned;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Failure of a single outbound call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The attempt exceeded its deadline
    #[error("timed out")]
    Timeout,

    /// The upstream does not know the requested entity
    #[error("not found")]
    NotFound,

    /// Connection failure, 5xx, 429 and friends; worth retrying
    #[error("transient failure: {0}")]
    Transient(String),

    /// The upstream rejected the request or sent garbage; retrying won't help
    #[error("permanent failure: {0}")]
    Permanent(String),
}

impl UpstreamError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transient(_))
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        if status == reqwest::StatusCode::NOT_FOUND {
            Self::NotFound
        } else if status.is_server_error()
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || status == reqwest::StatusCode::REQUEST_TIMEOUT
        {
            Self::Transient(format!("upstream returned {}", status))
        } else {
            Self::Permanent(format!("upstream returned {}", status))
        }
    }

    /// Classify a transport-level reqwest failure
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Permanent(format!("malformed response: {}", err))
        } else if let Some(status) = err.status() {
            Self::from_status(status)
        } else {
            Self::Transient(err.to_string())
        }
    }
}

/// Timeout and retry settings for one class of outbound calls
#[derive(Debug, Clone)]
pub struct UpstreamPolicy {
    /// Deadline for a single attempt
    pub timeout: Duration,
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Backoff after the first failed attempt
    pub initial_backoff: Duration,
    /// Upper bound on backoff
    pub max_backoff: Duration,
}

impl Default for UpstreamPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(3),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(1),
        }
    }
}

impl UpstreamPolicy {
    /// Backoff to wait after the given failed attempt (0-indexed), doubling each time
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Run `op` under this policy
    ///
    /// Returns the last error once attempts are exhausted or a permanent
    /// failure occurs.
    pub async fn call<T, F, Fut>(&self, operation: &'static str, mut op: F) -> Result<T, UpstreamError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(UpstreamError::Timeout),
            };

            match result {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(operation, attempt, "[Upstream] Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let backoff = self.backoff_for_attempt(attempt - 1);
                    warn!(
                        operation,
                        attempt,
                        max_attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %e,
                        "[Upstream] Transient failure, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    warn!(operation, attempt, error = %e, "[Upstream] Giving up");
                    return Err(e);
                }
            }
        }
    }
}

/// Build an endpoint URL by appending path segments to a base URL
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, UpstreamError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| UpstreamError::Permanent(format!("{} cannot be a base URL", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Parse and validate a service base URL
pub(crate) fn parse_base_url(base_url: &str) -> anyhow::Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| anyhow::anyhow!("Invalid upstream URL '{}': {}", base_url, e))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("Upstream URL '{}' cannot be a base URL", base_url);
    }
    Ok(url)
}

/// Build the HTTP client shared by the upstream adapters
pub(crate) fn build_http_client(timeout: Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(crate::branding::user_agent())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

/// GET a JSON document, classifying every failure
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
) -> Result<T, UpstreamError> {
    debug!(%url, "[Upstream] GET");
    let response = client
        .get(url)
        .send()
        .await
        .map_err(UpstreamError::from_reqwest)?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::from_status(status));
    }

    response.json::<T>().await.map_err(UpstreamError::from_reqwest)
}
