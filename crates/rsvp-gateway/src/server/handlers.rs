//! HTTP handlers for the gateway server

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
};
use rsvp_core::{
    ApplicationServices, BookingRequest, CancelOutcome, Reservation, ReservationError,
    ReservationStatus,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::error::{ApiError, Correlate, CorrelationId};

/// App state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<ApplicationServices>,
}

impl AppState {
    pub fn new(services: Arc<ApplicationServices>) -> Self {
        Self { services }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    debug!("[Gateway] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Body of `POST /reservations/{id}/cancel`
///
/// Identity comes from the upstream authentication layer; the gateway trusts it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    pub user_id: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub reservation_id: Uuid,
    pub status: ReservationStatus,
    pub outcome: CancelOutcome,
}

/// Query of `GET /reservations`; exactly one filter is required
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<String>,
    pub store_id: Option<String>,
}

/// A path segment that isn't a UUID can't name a reservation
fn parse_reservation_id(raw: &str) -> Result<Uuid, ReservationError> {
    raw.parse()
        .map_err(|_| ReservationError::NotFound(format!("reservation {}", raw)))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ReservationError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ReservationError::InvalidRequest(rejection.body_text()))
}

/// `POST /reservations/{id}/cancel`
pub async fn cancel_reservation(
    State(state): State<AppState>,
    correlation: CorrelationId,
    Path(id): Path<String>,
    body: Result<Json<CancelRequest>, JsonRejection>,
) -> Result<Json<CancelResponse>, ApiError> {
    let reservation_id = parse_reservation_id(&id).correlate(&correlation)?;
    let request = json_body(body).correlate(&correlation)?;

    if request.user_id.trim().is_empty() {
        return Err(ApiError::new(
            ReservationError::InvalidRequest("userId is required".into()),
            &correlation,
        ));
    }

    let outcome = state
        .services
        .cancellation
        .cancel(request.user_id.trim(), reservation_id, &request.role)
        .await
        .correlate(&correlation)?;

    Ok(Json(CancelResponse {
        reservation_id,
        status: ReservationStatus::Cancelled,
        outcome,
    }))
}

/// `POST /reservations`
pub async fn book_reservation(
    State(state): State<AppState>,
    correlation: CorrelationId,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let request = json_body(body).correlate(&correlation)?;

    let reservation = state
        .services
        .reservations
        .book(request)
        .await
        .correlate(&correlation)?;

    Ok((StatusCode::CREATED, Json(reservation)))
}

/// `GET /reservations/{id}`
pub async fn get_reservation(
    State(state): State<AppState>,
    correlation: CorrelationId,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation_id = parse_reservation_id(&id).correlate(&correlation)?;

    let reservation = state
        .services
        .reservations
        .get(reservation_id)
        .await
        .correlate(&correlation)?;

    Ok(Json(reservation))
}

/// `GET /reservations?userId=…` or `GET /reservations?storeId=…`
pub async fn list_reservations(
    State(state): State<AppState>,
    correlation: CorrelationId,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let service = &state.services.reservations;
    let filter = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    let result = match (filter(query.user_id), filter(query.store_id)) {
        (Some(user_id), None) => service.list_for_user(user_id.trim()).await,
        (None, Some(store_id)) => service.list_for_store(store_id.trim()).await,
        _ => Err(ReservationError::InvalidRequest(
            "exactly one of userId or storeId is required".into(),
        )),
    };

    Ok(Json(result.correlate(&correlation)?))
}
