//! Trip store: creation, validated status transitions and list filters

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::core::error::{LedgerResult, TripError};
use crate::core::events::{EventBus, TripEvent, TripRef};
use crate::core::store::TripRepository;
use crate::core::trip::{CreateTripInput, EarningsStatus, Trip, TripStatus, format_display_id};
use crate::core::validation::{validate_create_input, validate_transporter_id};

use super::write::write_with_retry;

/// Owns the trip collection and enforces the lifecycle
///
/// ```text
/// pending     --accept(transporter)--> accepted
/// accepted    --start----------------> in_transit
/// accepted    --complete-------------> completed
/// in_transit  --complete-------------> completed
/// pending|accepted|in_transit --cancel--> cancelled
/// completed (earned) --mark_paid-----> completed (paid)
/// ```
///
/// Every mutating call returns the stored trip. A failed call leaves the
/// stored record unchanged.
#[derive(Clone)]
pub struct TripService {
    repository: Arc<dyn TripRepository>,
    events: EventBus,
    config: Arc<LedgerConfig>,
}

impl TripService {
    pub fn new(repository: Arc<dyn TripRepository>, events: EventBus, config: Arc<LedgerConfig>) -> Self {
        Self {
            repository,
            events,
            config,
        }
    }

    pub fn repository(&self) -> &Arc<dyn TripRepository> {
        &self.repository
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Create a pending trip
    pub async fn create(&self, input: CreateTripInput) -> LedgerResult<Trip> {
        validate_create_input(&input)?;

        // Refuse a known duplicate before it consumes a display sequence.
        // Two creators racing on one order can still leave a gap.
        if let Some(order_id) = &input.order_id {
            if self.repository.find_by_order(order_id).await?.is_some() {
                return Err(TripError::DuplicateOrder {
                    order_id: order_id.clone(),
                }
                .into());
            }
        }

        let rate = input
            .rate_per_unit
            .unwrap_or(self.config.pricing.default_rate_per_unit);
        let today = Utc::now().date_naive();
        let sequence = self.repository.next_display_sequence(today).await?;
        let display_id = format_display_id(&self.config.display_id_prefix, today, sequence);

        let trip = self
            .repository
            .insert(Trip::new(input, rate, display_id))
            .await?;

        tracing::info!(
            trip_id = %trip.id,
            display_id = %trip.display_id,
            total_rate = trip.earnings.total_rate,
            "trip created"
        );
        self.events.publish(TripEvent::Created(TripRef::from(&trip)));

        Ok(trip)
    }

    pub async fn get(&self, id: &Uuid) -> LedgerResult<Trip> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| TripError::NotFound { id: *id }.into())
    }

    /// Assign a pending trip to a transporter
    pub async fn accept(&self, id: &Uuid, transporter_id: &str) -> LedgerResult<Trip> {
        validate_transporter_id(transporter_id)?;

        let trip = self
            .write(id, "accept", |trip, now| {
                require(trip, TripStatus::Accepted, "accept")?;
                trip.transporter_id = Some(transporter_id.to_string());
                trip.status = TripStatus::Accepted;
                trip.accepted_at = Some(now);
                Ok(())
            })
            .await?;

        self.announce(&trip, TripEvent::Accepted(TripRef::from(&trip)));
        Ok(trip)
    }

    /// Put an accepted trip on the road
    pub async fn start(&self, id: &Uuid) -> LedgerResult<Trip> {
        let trip = self
            .write(id, "start", |trip, now| {
                require(trip, TripStatus::InTransit, "start")?;
                trip.status = TripStatus::InTransit;
                trip.started_at = Some(now);
                Ok(())
            })
            .await?;

        self.announce(&trip, TripEvent::Started(TripRef::from(&trip)));
        Ok(trip)
    }

    /// Finish an accepted or in-transit trip and mark its earnings earned
    pub async fn complete(&self, id: &Uuid) -> LedgerResult<Trip> {
        let trip = self
            .write(id, "complete", |trip, now| {
                require(trip, TripStatus::Completed, "complete")?;
                trip.status = TripStatus::Completed;
                trip.completed_at = Some(now);
                trip.earnings.status = EarningsStatus::Earned;
                trip.earnings.completed_at = Some(now);
                Ok(())
            })
            .await?;

        self.announce(
            &trip,
            TripEvent::Completed {
                trip: TripRef::from(&trip),
                total_rate: trip.earnings.total_rate,
            },
        );
        Ok(trip)
    }

    /// Cancel a trip that has not reached a terminal status
    pub async fn cancel(&self, id: &Uuid) -> LedgerResult<Trip> {
        let trip = self
            .write(id, "cancel", |trip, now| {
                require(trip, TripStatus::Cancelled, "cancel")?;
                trip.status = TripStatus::Cancelled;
                trip.cancelled_at = Some(now);
                Ok(())
            })
            .await?;

        self.announce(&trip, TripEvent::Cancelled(TripRef::from(&trip)));
        Ok(trip)
    }

    /// Record payout of a completed trip's earnings
    pub async fn mark_paid(&self, id: &Uuid) -> LedgerResult<Trip> {
        let trip = self
            .write(id, "pay", |trip, now| {
                if trip.status != TripStatus::Completed
                    || trip.earnings.status != EarningsStatus::Earned
                {
                    return Err(invalid_state(trip, "pay"));
                }
                trip.earnings.status = EarningsStatus::Paid;
                trip.earnings.paid_at = Some(now);
                Ok(())
            })
            .await?;

        self.announce(
            &trip,
            TripEvent::Paid {
                trip: TripRef::from(&trip),
                total_rate: trip.earnings.total_rate,
            },
        );
        Ok(trip)
    }

    pub async fn list_all(&self) -> LedgerResult<Vec<Trip>> {
        self.repository.list().await
    }

    pub async fn list_by_status(&self, status: TripStatus) -> LedgerResult<Vec<Trip>> {
        self.filtered(|trip| trip.status == status).await
    }

    pub async fn list_by_transporter(&self, transporter_id: &str) -> LedgerResult<Vec<Trip>> {
        self.filtered(|trip| trip.belongs_to(transporter_id)).await
    }

    /// Trips a transporter can still claim: pending and unassigned
    pub async fn list_pending(&self) -> LedgerResult<Vec<Trip>> {
        self.filtered(Trip::is_open).await
    }

    async fn filtered(&self, keep: impl Fn(&Trip) -> bool) -> LedgerResult<Vec<Trip>> {
        let mut trips = self.repository.list().await?;
        trips.retain(|trip| keep(trip));
        Ok(trips)
    }

    async fn write<F>(&self, id: &Uuid, action: &'static str, mutate: F) -> LedgerResult<Trip>
    where
        F: FnMut(&mut Trip, DateTime<Utc>) -> Result<(), TripError> + Send,
    {
        let result = write_with_retry(
            self.repository.as_ref(),
            id,
            self.config.max_write_retries,
            action,
            mutate,
        )
        .await;

        if let Err(e) = &result {
            tracing::debug!(trip_id = %id, action, error = %e, "trip transition refused");
        }
        result
    }

    fn announce(&self, trip: &Trip, event: TripEvent) {
        tracing::info!(
            trip_id = %trip.id,
            display_id = %trip.display_id,
            status = %trip.status,
            transporter_id = trip.transporter_id.as_deref().unwrap_or("-"),
            "trip {}",
            event.action()
        );
        self.events.publish(event);
    }
}

fn require(trip: &Trip, next: TripStatus, action: &'static str) -> Result<(), TripError> {
    if trip.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(invalid_state(trip, action))
    }
}

fn invalid_state(trip: &Trip, action: &'static str) -> TripError {
    TripError::InvalidState {
        id: trip.id,
        status: trip.status,
        action,
    }
}
