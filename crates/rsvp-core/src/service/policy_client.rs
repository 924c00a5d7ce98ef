//! Reservation policy lookup

use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::upstream::{build_http_client, endpoint, get_json, parse_base_url, UpstreamError};
use crate::domain::ReservationPolicy;

/// Source of per-store reservation policies
#[async_trait]
pub trait PolicySource: Send + Sync {
    /// Current policy for a store; stores without one get the no-deposit policy
    async fn get_policy(&self, store_id: &str) -> Result<ReservationPolicy, UpstreamError>;
}

/// HTTP client for the policy service: `GET {base}/stores/{storeId}/policy`
pub struct HttpPolicySource {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpPolicySource {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            client: build_http_client(timeout)?,
        })
    }
}

#[async_trait]
impl PolicySource for HttpPolicySource {
    async fn get_policy(&self, store_id: &str) -> Result<ReservationPolicy, UpstreamError> {
        let url = endpoint(&self.base_url, &["stores", store_id, "policy"])?;
        match get_json::<ReservationPolicy>(&self.client, url).await {
            Ok(policy) => Ok(policy),
            Err(UpstreamError::NotFound) => {
                tracing::debug!(store_id, "[PolicySource] No policy on record, using no-deposit");
                Ok(ReservationPolicy::no_deposit(store_id))
            }
            Err(e) => Err(e),
        }
    }
}
