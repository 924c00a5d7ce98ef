//! Optimistic commit loop shared by cancellation and completion

use anyhow::anyhow;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{Reservation, TransitionPlan};
use crate::error::{ReservationError, ReservationResult};
use crate::repository::{ReservationRepository, TransitionResult};

/// Version conflicts tolerated before giving up
const MAX_CONFLICTS: usize = 5;

pub(crate) async fn load(
    repo: &dyn ReservationRepository,
    id: Uuid,
) -> ReservationResult<Reservation> {
    repo.get(&id)
        .await?
        .ok_or_else(|| ReservationError::NotFound(format!("reservation {}", id)))
}

/// Commit `plan`, re-planning against fresh state after each version conflict.
///
/// Returns the updated reservation, or `None` when the plan (or a re-plan
/// after a concurrent winner) is a no-op.
pub(crate) async fn commit<F>(
    repo: &dyn ReservationRepository,
    id: Uuid,
    mut plan: TransitionPlan,
    replan: F,
) -> ReservationResult<Option<Reservation>>
where
    F: Fn(&Reservation) -> ReservationResult<TransitionPlan>,
{
    let mut conflicts = 0;

    loop {
        let transition = match plan {
            TransitionPlan::NoOp => return Ok(None),
            TransitionPlan::Apply(transition) => transition,
        };

        match repo.apply_transition(&transition).await? {
            TransitionResult::Applied(updated) => return Ok(Some(updated)),
            TransitionResult::VersionConflict => {
                conflicts += 1;
                if conflicts >= MAX_CONFLICTS {
                    return Err(ReservationError::Internal(anyhow!(
                        "reservation {} kept changing, gave up after {} version conflicts",
                        id,
                        conflicts
                    )));
                }
                debug!(
                    reservation_id = %id,
                    expected_version = transition.expected_version,
                    "[Transition] Version conflict, re-planning"
                );
                let current = load(repo, id).await?;
                plan = replan(&current)?;
            }
        }
    }
}
