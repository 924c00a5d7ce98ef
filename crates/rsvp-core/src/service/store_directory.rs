//! Store directory client
//!
//! The store-directory service owns the authoritative store ownership facts.
//! Nothing here caches: every authorization decision reads fresh data.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::upstream::{build_http_client, endpoint, get_json, parse_base_url, UpstreamError};
use crate::domain::StoreOwnershipFact;

/// Narrow capability used by authorization and booking.
///
/// Swappable for a cached or event-sourced projection without touching callers.
#[async_trait]
pub trait StoreDirectory: Send + Sync {
    /// Does the directory confirm `user_id` as the registered owner of `store_id`?
    async fn check_store_owner(&self, user_id: &str, store_id: &str) -> Result<bool, UpstreamError>;

    /// Full ownership fact for a store
    async fn get_store_details(&self, store_id: &str) -> Result<StoreOwnershipFact, UpstreamError>;
}

/// Owner-check payloads accepted from the directory
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwnerCheckResponse {
    Flag(bool),
    Verdict {
        #[serde(rename = "isOwner")]
        is_owner: bool,
    },
    Fact(StoreOwnershipFact),
}

impl OwnerCheckResponse {
    fn confirms(&self, user_id: &str) -> bool {
        match self {
            Self::Flag(owner) => *owner,
            Self::Verdict { is_owner } => *is_owner,
            Self::Fact(fact) => fact.is_owned_by(user_id),
        }
    }
}

/// HTTP client for the store-directory service
///
/// - `GET {base}/stores/{storeId}/owner?ownerId={userId}`
/// - `GET {base}/stores/{storeId}`
pub struct HttpStoreDirectory {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpStoreDirectory {
    /// Create a client; `timeout` bounds each HTTP request
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            client: build_http_client(timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }
}

#[async_trait]
impl StoreDirectory for HttpStoreDirectory {
    async fn check_store_owner(&self, user_id: &str, store_id: &str) -> Result<bool, UpstreamError> {
        let mut url = endpoint(&self.base_url, &["stores", store_id, "owner"])?;
        url.query_pairs_mut().append_pair("ownerId", user_id);

        match get_json::<OwnerCheckResponse>(&self.client, url).await {
            Ok(response) => {
                let confirmed = response.confirms(user_id);
                tracing::debug!(store_id, user_id, confirmed, "[StoreDirectory] Owner check");
                Ok(confirmed)
            }
            // Unknown store: nobody owns it as far as authorization is concerned
            Err(UpstreamError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn get_store_details(&self, store_id: &str) -> Result<StoreOwnershipFact, UpstreamError> {
        let url = endpoint(&self.base_url, &["stores", store_id])?;
        get_json(&self.client, url).await
    }
}
