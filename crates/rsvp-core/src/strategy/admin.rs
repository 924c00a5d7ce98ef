use async_trait::async_trait;

use super::{CancellationStrategy, Requester};
use crate::domain::{Reservation, Role};
use crate::error::ReservationResult;

/// Platform operators may cancel anything, no external check
pub struct AdminStrategy;

#[async_trait]
impl CancellationStrategy for AdminStrategy {
    fn name(&self) -> &'static str {
        "admin"
    }

    fn supports(&self, role: Role) -> bool {
        role == Role::Admin
    }

    async fn authorize(&self, requester: &Requester, reservation: &Reservation) -> ReservationResult<()> {
        tracing::info!(
            admin = %requester.user_id,
            reservation_id = %reservation.id,
            "[AdminStrategy] Administrative cancellation"
        );
        Ok(())
    }
}
