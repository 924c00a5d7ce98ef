//! Concurrent cancellations of the same reservation

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use pretty_assertions::assert_eq;
use rsvp_core::CancelOutcome;
use tests::events::{cancellations, collect_events};
use tests::fixtures::*;
use tests::*;
use tokio::sync::Barrier;

#[tokio::test]
async fn test_racing_owner_cancels_emit_one_event() {
    let reservation = booked_reservation(CUSTOMER, STORE);
    let id = reservation.id;

    // Both requests load version 1 and pass authorization before either commits
    let barrier = Arc::new(Barrier::new(2));
    let mut h = ReservationTestHarness::builder()
        .store(MockReservationStore::new().with_reservation(reservation))
        .directory(standard_directory().with_barrier(barrier))
        .build();

    let cancellation = &h.services.cancellation;
    let (a, b) = tokio::join!(
        cancellation.cancel(OWNER, id, "OWNER"),
        cancellation.cancel(OWNER, id, "OWNER"),
    );

    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|o| o.as_str());
    assert_eq!(
        outcomes,
        vec![CancelOutcome::AlreadyCancelled, CancelOutcome::Cancelled]
    );

    assert_eq!(h.store.conflicts(), 1);
    assert_eq!(h.store.transitions_applied(), 1);
    assert_eq!(h.store.reservation(&id).unwrap().version, 2);
    assert_eq!(h.store.outbox_records().len(), 1);

    let events = collect_events(&mut h.events, Duration::from_millis(50)).await;
    assert_eq!(cancellations(&events), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn test_mixed_role_race_has_single_winner() {
    let reservation = booked_reservation(CUSTOMER, STORE);
    let id = reservation.id;
    let h = ReservationTestHarness::builder()
        .store(MockReservationStore::new().with_reservation(reservation))
        .build();
    let services = Arc::new(h.services);

    let tasks = [(CUSTOMER, "CUSTOMER"), (ADMIN, "ADMIN"), (OWNER, "OWNER")].map(|(user, role)| {
        let services = services.clone();
        tokio::spawn(async move { services.cancellation.cancel(user, id, role).await })
    });

    let cancelled = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .filter(|outcome| *outcome == CancelOutcome::Cancelled)
        .count();

    assert_eq!(cancelled, 1);
    assert_eq!(h.store.recorded_events(&id).len(), 1);
}
