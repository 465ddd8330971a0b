//! HTTP handlers for trip operations
//!
//! Handlers are thin: decode, call the service, encode. Every error is a
//! [`LedgerError`], which renders itself as an [`ErrorResponse`] body.
//!
//! [`ErrorResponse`]: crate::core::error::ErrorResponse

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::LedgerError;
use crate::core::trip::{CreateTripInput, Trip, TripPatch, TripStatus};
use crate::earnings::{self, TripStats};
use crate::sync::{ShipmentOrder, SyncReport};

use super::AppState;
use super::extract::LedgerJson;

type HandlerResult<T> = Result<Json<T>, LedgerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Date,
    Earnings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query parameters for `GET /trips`
#[derive(Debug, Default, Deserialize)]
pub struct ListTripsQuery {
    pub status: Option<TripStatus>,
    pub transporter_id: Option<String>,
    /// Only trips still open for acceptance
    #[serde(default)]
    pub pending: bool,
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Serialize)]
pub struct ListTripsResponse {
    pub trips: Vec<Trip>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AcceptTripRequest {
    pub transporter_id: String,
}

#[derive(Debug, Serialize)]
pub struct EarningsSummary {
    pub transporter_id: String,
    pub total_earnings: u64,
    pub pending_earnings: u64,
    pub paid_earnings: u64,
    pub total_earnings_display: String,
}

/// POST /trips
pub async fn create_trip(
    State(state): State<AppState>,
    LedgerJson(input): LedgerJson<CreateTripInput>,
) -> Result<(StatusCode, Json<Trip>), LedgerError> {
    let trip = state.trips.create(input).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

/// GET /trips
pub async fn list_trips(
    State(state): State<AppState>,
    Query(query): Query<ListTripsQuery>,
) -> HandlerResult<ListTripsResponse> {
    let mut trips = if query.pending {
        state.trips.list_pending().await?
    } else {
        state.trips.list_all().await?
    };

    if let Some(status) = query.status {
        trips.retain(|trip| trip.status == status);
    }
    if let Some(transporter_id) = &query.transporter_id {
        trips.retain(|trip| trip.belongs_to(transporter_id));
    }

    let descending = query.order == SortOrder::Desc;
    let trips = match query.sort {
        Some(SortKey::Date) => earnings::sort_by_date(&trips, descending),
        Some(SortKey::Earnings) => earnings::sort_by_earnings(&trips, descending),
        None => trips,
    };

    Ok(Json(ListTripsResponse {
        count: trips.len(),
        trips,
    }))
}

/// GET /trips/{id}
pub async fn get_trip(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult<Trip> {
    Ok(Json(state.trips.get(&id).await?))
}

/// POST /trips/{id}/accept
pub async fn accept_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    LedgerJson(request): LedgerJson<AcceptTripRequest>,
) -> HandlerResult<Trip> {
    Ok(Json(state.trips.accept(&id, &request.transporter_id).await?))
}

/// POST /trips/{id}/start
pub async fn start_trip(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult<Trip> {
    Ok(Json(state.trips.start(&id).await?))
}

/// POST /trips/{id}/complete
pub async fn complete_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> HandlerResult<Trip> {
    Ok(Json(state.trips.complete(&id).await?))
}

/// POST /trips/{id}/cancel
pub async fn cancel_trip(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult<Trip> {
    Ok(Json(state.trips.cancel(&id).await?))
}

/// POST /trips/{id}/pay
pub async fn pay_trip(State(state): State<AppState>, Path(id): Path<Uuid>) -> HandlerResult<Trip> {
    Ok(Json(state.trips.mark_paid(&id).await?))
}

/// GET /transporters/{id}/stats
pub async fn transporter_stats(
    State(state): State<AppState>,
    Path(transporter_id): Path<String>,
) -> HandlerResult<TripStats> {
    let trips = state.trips.list_by_transporter(&transporter_id).await?;
    Ok(Json(earnings::trip_stats(&trips, &transporter_id)))
}

/// GET /transporters/{id}/earnings
pub async fn transporter_earnings(
    State(state): State<AppState>,
    Path(transporter_id): Path<String>,
) -> HandlerResult<EarningsSummary> {
    let trips = state.trips.list_by_transporter(&transporter_id).await?;
    let total = earnings::total_earnings(&trips);

    Ok(Json(EarningsSummary {
        total_earnings: total,
        pending_earnings: earnings::pending_earnings(&trips),
        paid_earnings: earnings::paid_earnings(&trips),
        total_earnings_display: earnings::format_rwf(total),
        transporter_id,
    }))
}

/// POST /orders/sync
pub async fn sync_orders(
    State(state): State<AppState>,
    LedgerJson(orders): LedgerJson<Vec<ShipmentOrder>>,
) -> HandlerResult<SyncReport> {
    Ok(Json(state.sync.ensure_trips_for_orders(&orders).await?))
}

/// PATCH /admin/trips/{id}
pub async fn override_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    LedgerJson(patch): LedgerJson<TripPatch>,
) -> HandlerResult<Trip> {
    Ok(Json(state.overrides.apply(&id, patch).await?))
}
