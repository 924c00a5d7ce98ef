use async_trait::async_trait;

use super::{CancellationStrategy, Requester};
use crate::domain::{Reservation, Role};
use crate::error::{ReservationError, ReservationResult};

/// Customers may cancel only reservations they booked
pub struct CustomerStrategy;

#[async_trait]
impl CancellationStrategy for CustomerStrategy {
    fn name(&self) -> &'static str {
        "customer"
    }

    fn supports(&self, role: Role) -> bool {
        role == Role::Customer
    }

    async fn authorize(&self, requester: &Requester, reservation: &Reservation) -> ReservationResult<()> {
        if reservation.is_booked_by(&requester.user_id) {
            Ok(())
        } else {
            Err(ReservationError::Forbidden(format!(
                "user {} did not book reservation {}",
                requester.user_id, reservation.id
            )))
        }
    }
}
