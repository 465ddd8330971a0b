//! Administrative override for trips
//!
//! [`TripOverrides`] writes arbitrary field values without consulting the
//! lifecycle. It exists for support staff correcting bad data and is kept
//! apart from `TripService`, so the validated transitions and the trusted
//! path are never reached through the same handle.

use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{LedgerResult, TripError};
use crate::core::events::{EventBus, TripEvent, TripRef};
use crate::core::store::TripRepository;
use crate::core::trip::{Trip, TripPatch};
use crate::core::validation::validate_patch;

use super::service::TripService;
use super::write::write_with_retry;

#[derive(Clone)]
pub struct TripOverrides {
    repository: Arc<dyn TripRepository>,
    events: EventBus,
    max_retries: u32,
}

impl TripOverrides {
    pub fn new(repository: Arc<dyn TripRepository>, events: EventBus, max_retries: u32) -> Self {
        Self {
            repository,
            events,
            max_retries,
        }
    }

    /// Share the repository and event bus of an existing trip service
    pub fn from_service(service: &TripService) -> Self {
        Self::new(
            service.repository().clone(),
            service.events().clone(),
            service.config().max_write_retries,
        )
    }

    /// Merge `patch` into the stored trip
    ///
    /// An empty patch returns the trip unchanged without writing.
    pub async fn apply(&self, id: &Uuid, patch: TripPatch) -> LedgerResult<Trip> {
        validate_patch(&patch)?;

        if patch.is_empty() {
            return self
                .repository
                .get(id)
                .await?
                .ok_or_else(|| TripError::NotFound { id: *id }.into());
        }

        let trip = write_with_retry(
            self.repository.as_ref(),
            id,
            self.max_retries,
            "override",
            |trip, _now| {
                patch.clone().apply_to(trip);
                Ok(())
            },
        )
        .await?;

        tracing::warn!(
            trip_id = %trip.id,
            display_id = %trip.display_id,
            status = %trip.status,
            fields = ?patch,
            "trip overridden outside the lifecycle"
        );
        self.events.publish(TripEvent::Overridden(TripRef::from(&trip)));

        Ok(trip)
    }
}
