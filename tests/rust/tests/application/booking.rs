//! ReservationAppService: booking, lookup, listing, completion

use pretty_assertions::assert_eq;
use rsvp_core::{BookingRequest, CompleteOutcome, DepositRule, UpstreamError, MAX_HEADCOUNT};
use tests::events::drain;
use tests::fixtures::*;
use tests::*;
use uuid::Uuid;

fn request(user_id: &str, store_id: &str, h: u32, headcount: u32) -> BookingRequest {
    BookingRequest {
        user_id: user_id.to_string(),
        store_id: store_id.to_string(),
        reserved_at: at(h, 0),
        headcount,
    }
}

#[tokio::test]
async fn test_book_records_reservation_and_event() {
    let mut h = ReservationTestHarness::new();

    let reservation = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 19, 2))
        .await
        .unwrap();

    assert_eq!(reservation.status, ReservationStatus::Booked);
    assert_eq!(reservation.version, 1);
    assert_eq!(reservation.deposit, 0);
    assert_eq!(h.store.reservation(&reservation.id), Some(reservation.clone()));

    assert_eq!(
        drain(&mut h.events),
        vec![DomainEvent::ReservationBooked {
            reservation_id: reservation.id,
            user_id: CUSTOMER.to_string(),
            store_id: STORE.to_string(),
        }]
    );
    assert_eq!(h.store.pending_count(), 0);
}

#[tokio::test]
async fn test_booking_applies_deposit_policy() {
    let h = ReservationTestHarness::builder()
        .policies(MockPolicySource::new().with_policy(per_person_policy(STORE, 1500)))
        .build();

    let reservation = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 12, 4))
        .await
        .unwrap();

    assert_eq!(reservation.deposit, 6000);
}

#[tokio::test]
async fn test_booking_trims_identifiers() {
    let h = ReservationTestHarness::new();

    let reservation = h
        .services
        .reservations
        .book(request("  cust-1 ", " store-1", 19, 2))
        .await
        .unwrap();

    assert_eq!(reservation.user_id, CUSTOMER);
    assert_eq!(reservation.store_id, STORE);
}

#[tokio::test]
async fn test_booking_validates_input() {
    let h = ReservationTestHarness::new();

    for bad in [
        request("", STORE, 19, 2),
        request(CUSTOMER, "  ", 19, 2),
        request(CUSTOMER, STORE, 19, 0),
        request(CUSTOMER, STORE, 19, MAX_HEADCOUNT + 1),
        request(CUSTOMER, STORE, 19, u32::MAX),
    ] {
        let err = h.services.reservations.book(bad).await.unwrap_err();
        assert!(matches!(err, ReservationError::InvalidRequest(_)));
    }
    assert_eq!(h.directory.detail_lookups(), 0);
    assert!(h.store.outbox_records().is_empty());
}

#[tokio::test]
async fn test_booking_outside_operating_hours_is_rejected() {
    let h = ReservationTestHarness::new();

    let err = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 23, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, ReservationError::InvalidRequest(msg) if msg.contains("closed")));
}

#[tokio::test]
async fn test_booking_unknown_store_is_not_found() {
    let h = ReservationTestHarness::new();

    let err = h
        .services
        .reservations
        .book(request(CUSTOMER, "store-x", 19, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, ReservationError::NotFound(msg) if msg.contains("store-x")));
}

#[tokio::test]
async fn test_policy_outage_fails_booking() {
    let h = ReservationTestHarness::new();
    h.policies.script(
        std::iter::repeat(Scripted::Fail(UpstreamError::Transient("502".into()))).take(3),
    );

    let err = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 19, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, ReservationError::UpstreamUnavailable(msg) if msg.contains("policy")));
    assert!(h.store.outbox_records().is_empty());
}

#[tokio::test]
async fn test_largest_party_is_accepted() {
    let h = ReservationTestHarness::builder()
        .policies(MockPolicySource::new().with_policy(per_person_policy(STORE, 1500)))
        .build();

    let reservation = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 19, MAX_HEADCOUNT))
        .await
        .unwrap();

    assert_eq!(reservation.deposit, 1500 * i64::from(MAX_HEADCOUNT));
}

#[tokio::test]
async fn test_overflowing_deposit_fails_booking() {
    let h = ReservationTestHarness::builder()
        .policies(MockPolicySource::new().with_policy(per_person_policy(STORE, i64::MAX / 2)))
        .build();

    let err = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 19, 4))
        .await
        .unwrap_err();

    assert!(matches!(err, ReservationError::UpstreamUnavailable(msg) if msg.contains("deposit")));
    assert!(h.store.outbox_records().is_empty());
}

#[tokio::test]
async fn test_negative_deposit_policy_fails_booking() {
    let h = ReservationTestHarness::builder()
        .policies(MockPolicySource::new().with_policy(ReservationPolicy {
            store_id: STORE.to_string(),
            deposit_rule: DepositRule::Flat { amount: -2000 },
        }))
        .build();

    let err = h
        .services
        .reservations
        .book(request(CUSTOMER, STORE, 19, 2))
        .await
        .unwrap_err();

    assert!(matches!(err, ReservationError::UpstreamUnavailable(_)));
    assert!(h.store.outbox_records().is_empty());
}

#[tokio::test]
async fn test_get_and_list() {
    let mine = booked_reservation(CUSTOMER, STORE);
    let also_mine = booked_reservation(CUSTOMER, OTHER_STORE);
    let theirs = booked_reservation(OTHER_CUSTOMER, STORE);
    let h = ReservationTestHarness::builder()
        .store(
            MockReservationStore::new()
                .with_reservation(mine.clone())
                .with_reservation(also_mine.clone())
                .with_reservation(theirs.clone()),
        )
        .build();
    let service = &h.services.reservations;

    assert_eq!(service.get(mine.id).await.unwrap(), mine);
    assert!(matches!(
        service.get(Uuid::new_v4()).await,
        Err(ReservationError::NotFound(_))
    ));

    let by_user = service.list_for_user(CUSTOMER).await.unwrap();
    assert_eq!(by_user.len(), 2);
    assert!(by_user.iter().all(|r| r.user_id == CUSTOMER));

    let by_store = service.list_for_store(STORE).await.unwrap();
    let mut ids: Vec<_> = by_store.iter().map(|r| r.id).collect();
    ids.sort();
    let mut expected = vec![mine.id, theirs.id];
    expected.sort();
    assert_eq!(ids, expected);

    assert!(service.list_for_user("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_complete_is_idempotent() {
    let reservation = booked_reservation(CUSTOMER, STORE);
    let id = reservation.id;
    let mut h = ReservationTestHarness::builder()
        .store(MockReservationStore::new().with_reservation(reservation))
        .build();

    assert_eq!(
        h.services.reservations.complete(id).await.unwrap(),
        CompleteOutcome::Completed
    );
    assert_eq!(
        h.services.reservations.complete(id).await.unwrap(),
        CompleteOutcome::AlreadyCompleted
    );

    assert_eq!(h.store.reservation(&id).unwrap().status, ReservationStatus::Completed);
    assert_eq!(
        drain(&mut h.events),
        vec![DomainEvent::ReservationCompleted { reservation_id: id }]
    );
}

#[tokio::test]
async fn test_cancelled_reservation_cannot_be_completed() {
    let reservation = reservation_in(ReservationStatus::Cancelled);
    let id = reservation.id;
    let h = ReservationTestHarness::builder()
        .store(MockReservationStore::new().with_reservation(reservation))
        .build();

    let err = h.services.reservations.complete(id).await.unwrap_err();
    assert!(matches!(err, ReservationError::InvalidState { action: "complete", .. }));
}
