//! Optimistic read-modify-write loop shared by every trip mutation

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::{LedgerResult, TripError};
use crate::core::store::TripRepository;
use crate::core::trip::Trip;

/// Load a trip, apply `mutate` to a copy and store it if nobody else wrote first
///
/// On a lost race the trip is re-read and `mutate` runs again against the
/// fresh copy, so status checks inside `mutate` always see the latest state.
/// A failing `mutate` leaves the stored record untouched.
pub(crate) async fn write_with_retry<F>(
    repository: &dyn TripRepository,
    id: &Uuid,
    max_retries: u32,
    action: &'static str,
    mut mutate: F,
) -> LedgerResult<Trip>
where
    F: FnMut(&mut Trip, DateTime<Utc>) -> Result<(), TripError> + Send,
{
    for attempt in 0..=max_retries {
        let mut trip = repository
            .get(id)
            .await?
            .ok_or(TripError::NotFound { id: *id })?;
        let expected_version = trip.version;

        mutate(&mut trip, Utc::now())?;

        if let Some(stored) = repository.replace(trip, expected_version).await? {
            return Ok(stored);
        }

        tracing::debug!(trip_id = %id, action, attempt, "lost write race, re-reading trip");
        tokio::task::yield_now().await;
    }

    tracing::warn!(trip_id = %id, action, max_retries, "giving up after repeated write conflicts");
    Err(TripError::Conflict { id: *id }.into())
}
