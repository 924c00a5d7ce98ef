//! Book, cancel and inspect through HTTP with real storage

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tests::events::{cancellations, collect_events};
use tests::fixtures::*;
use tests::DomainEvent;
use tower::ServiceExt;

use super::{config, server, upstream_server};

async fn call(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_book_and_owner_cancel_over_http() {
    let upstream = upstream_server().await;
    let dir = TempDir::new().unwrap();
    let server = server(config(&dir.path().join("rsvp.db"), &upstream));
    let mut events = server.services().subscribe();
    let router = server.router();

    let (status, booked) = call(
        &router,
        post(
            "/reservations",
            json!({
                "userId": CUSTOMER,
                "storeId": STORE,
                "reservedAt": "2026-12-24T20:00:00",
                "headcount": 4,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booked["deposit"], 2000);
    let id = booked["id"].as_str().unwrap().to_string();

    // A different owner is turned away
    let (status, body) = call(
        &router,
        post(
            &format!("/reservations/{}/cancel", id),
            json!({ "userId": OTHER_OWNER, "role": "OWNER" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    // The store owner succeeds, twice, with one event
    for expected in ["CANCELLED", "ALREADY_CANCELLED"] {
        let (status, body) = call(
            &router,
            post(
                &format!("/reservations/{}/cancel", id),
                json!({ "userId": OWNER, "role": "owner" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], expected);
    }

    let (status, fetched) = call(
        &router,
        Request::get(format!("/reservations/{}", id))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["status"], "CANCELLED");
    assert_eq!(fetched["version"], 2);

    let received = collect_events(&mut events, Duration::from_millis(100)).await;
    assert!(matches!(received[0], DomainEvent::ReservationBooked { .. }));
    assert_eq!(cancellations(&received), 1);
    assert_eq!(received.len(), 2);
}

#[tokio::test]
async fn test_directory_outage_leaves_reservation_booked() {
    let upstream = upstream_server().await;
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("rsvp.db");

    // Book while the directory is up
    let id = {
        let server = server(config(&db_path, &upstream));
        let reservation = server
            .services()
            .reservations
            .book(rsvp_core::BookingRequest {
                user_id: CUSTOMER.to_string(),
                store_id: STORE.to_string(),
                reserved_at: at(18, 0),
                headcount: 2,
            })
            .await
            .unwrap();
        reservation.id
    };

    // Then point the gateway at a directory that only fails
    let broken = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::any())
        .respond_with(wiremock::ResponseTemplate::new(503))
        .mount(&broken)
        .await;

    let router = server(config(&db_path, &broken)).router();
    let (status, body) = call(
        &router,
        post(
            &format!("/reservations/{}/cancel", id),
            json!({ "userId": OWNER, "role": "OWNER" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");

    // The customer path doesn't need the directory
    let (status, body) = call(
        &router,
        post(
            &format!("/reservations/{}/cancel", id),
            json!({ "userId": CUSTOMER, "role": "CUSTOMER" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "CANCELLED");
}
