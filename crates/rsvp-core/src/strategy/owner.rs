//! Store-owner cancellation, verified against the store directory

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use super::{CancellationStrategy, Requester};
use crate::domain::{Reservation, Role};
use crate::error::{ReservationError, ReservationResult};
use crate::service::{StoreDirectory, UpstreamError, UpstreamPolicy};

/// Store owners may cancel reservations at stores the directory says they own.
///
/// The directory call is bounded by the upstream policy: each attempt times
/// out, transient failures are retried, and exhaustion surfaces as
/// `UpstreamUnavailable`.
pub struct OwnerStrategy {
    directory: Arc<dyn StoreDirectory>,
    upstream: UpstreamPolicy,
}

impl OwnerStrategy {
    pub fn new(directory: Arc<dyn StoreDirectory>, upstream: UpstreamPolicy) -> Self {
        Self { directory, upstream }
    }
}

#[async_trait]
impl CancellationStrategy for OwnerStrategy {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn supports(&self, role: Role) -> bool {
        role == Role::Owner
    }

    async fn authorize(&self, requester: &Requester, reservation: &Reservation) -> ReservationResult<()> {
        let user_id = requester.user_id.as_str();
        let store_id = reservation.store_id.as_str();

        let confirmed = match self
            .upstream
            .call("check_store_owner", || {
                self.directory.check_store_owner(user_id, store_id)
            })
            .await
        {
            Ok(confirmed) => confirmed,
            Err(UpstreamError::NotFound) => false,
            Err(e) => {
                warn!(store_id, user_id, error = %e, "[OwnerStrategy] Store directory unavailable");
                return Err(ReservationError::UpstreamUnavailable(format!(
                    "store directory: {}",
                    e
                )));
            }
        };

        debug!(store_id, user_id, confirmed, "[OwnerStrategy] Ownership verified");

        if confirmed {
            Ok(())
        } else {
            Err(ReservationError::Forbidden(format!(
                "user {} is not the owner of store {}",
                user_id, store_id
            )))
        }
    }
}
