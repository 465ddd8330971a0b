//! Repository trait for trip persistence
//!
//! The lifecycle rules live in `TripService`; implementations of
//! [`TripRepository`] only store records. Writes are guarded by the trip's
//! `version` so that two callers racing on the same trip cannot both win.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::core::error::LedgerResult;
use crate::core::trip::Trip;

/// Storage backend for trips
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Insert a new trip
    ///
    /// Fails with `TripError::DuplicateOrder` if another trip already carries
    /// the same `order_id`.
    async fn insert(&self, trip: Trip) -> LedgerResult<Trip>;

    /// Get a trip by ID
    async fn get(&self, id: &Uuid) -> LedgerResult<Option<Trip>>;

    /// List every stored trip, oldest first
    async fn list(&self) -> LedgerResult<Vec<Trip>>;

    /// Find the trip linked to a shipper order
    async fn find_by_order(&self, order_id: &str) -> LedgerResult<Option<Trip>>;

    /// Replace a stored trip if its version still equals `expected_version`
    ///
    /// On success the stored copy has `version = expected_version + 1` and is
    /// returned. `Ok(None)` means the version moved on (a concurrent writer won).
    /// Fails with `TripError::NotFound` if the trip does not exist.
    async fn replace(&self, trip: Trip, expected_version: u64) -> LedgerResult<Option<Trip>>;

    /// Next value of the per-day display id sequence, starting at 1
    async fn next_display_sequence(&self, date: NaiveDate) -> LedgerResult<u32>;
}
