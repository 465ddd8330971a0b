//! Route table

use axum::{
    Router,
    routing::{get, patch, post},
};
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::AppState;
use super::handlers;

/// Build the full router: public trip routes plus the `/admin` override routes
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    let trips = Router::new()
        .route("/trips", post(handlers::create_trip).get(handlers::list_trips))
        .route("/trips/{id}", get(handlers::get_trip))
        .route("/trips/{id}/accept", post(handlers::accept_trip))
        .route("/trips/{id}/start", post(handlers::start_trip))
        .route("/trips/{id}/complete", post(handlers::complete_trip))
        .route("/trips/{id}/cancel", post(handlers::cancel_trip))
        .route("/trips/{id}/pay", post(handlers::pay_trip))
        .route("/transporters/{id}/stats", get(handlers::transporter_stats))
        .route("/transporters/{id}/earnings", get(handlers::transporter_earnings))
        .route("/orders/sync", post(handlers::sync_orders));

    let admin = Router::new().route("/trips/{id}", patch(handlers::override_trip));

    trips
        .nest("/admin", admin)
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
