//! Keeps trips and shipper orders aligned

use serde::Serialize;

use crate::config::PlaceholderContact;
use crate::core::error::{LedgerError, LedgerResult, TripError, ValidationError};
use crate::core::trip::{CreateTripInput, Location, Shipment, Trip, TripStatus};
use crate::trips::TripService;

use super::order::{ShipmentOrder, derive_trip_patch};

/// Outcome of a batch reconciliation
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    /// Trips created by this call
    pub created: Vec<Trip>,
    /// Orders that already had a trip
    pub already_linked: Vec<String>,
    pub failed: Vec<OrderFailure>,
}

#[derive(Debug, Serialize)]
pub struct OrderFailure {
    pub order_id: String,
    pub code: String,
    pub message: String,
}

/// Creates trips for orders and carries order status onto linked trips
#[derive(Clone)]
pub struct StatusSynchronizer {
    trips: TripService,
    placeholder: PlaceholderContact,
}

impl StatusSynchronizer {
    pub fn new(trips: TripService) -> Self {
        let placeholder = trips.config().placeholder_contact.clone();
        Self { trips, placeholder }
    }

    /// Build and store a pending trip for `order`, linked by order id
    pub async fn create_trip_from_order(&self, order: &ShipmentOrder) -> LedgerResult<Trip> {
        let input = CreateTripInput {
            shipment: Shipment {
                cargo_id: order.cargo_id.clone(),
                cargo_name: order.cargo_name.clone(),
                quantity: order.quantity,
                unit: order.unit,
                total_value: order.total_value,
            },
            pickup: self.with_contact(
                &order.id,
                order.pickup.clone(),
                order.shipper_name.as_deref(),
                order.shipper_phone.as_deref(),
            ),
            delivery: self.with_contact(
                &order.id,
                order.delivery.clone(),
                order.receiver_name.as_deref(),
                order.receiver_phone.as_deref(),
            ),
            rate_per_unit: order.rate_per_unit,
            estimated_duration_minutes: order.estimated_duration_minutes,
            order_id: Some(order.id.clone()),
        };

        let trip = self.trips.create(input).await?;
        tracing::info!(order_id = %order.id, trip_id = %trip.id, "trip created from order");
        Ok(trip)
    }

    /// Create a trip for every order that has none
    ///
    /// Safe to repeat: orders already linked (by the order's `trip_id` or by
    /// a trip carrying the order id) are skipped, and a racing creator is
    /// reported as already linked rather than duplicated.
    pub async fn ensure_trips_for_orders(&self, orders: &[ShipmentOrder]) -> LedgerResult<SyncReport> {
        let mut report = SyncReport::default();

        for order in orders {
            if self.linked_trip(order).await?.is_some() {
                report.already_linked.push(order.id.clone());
                continue;
            }

            match self.create_trip_from_order(order).await {
                Ok(trip) => report.created.push(trip),
                Err(LedgerError::Trip(TripError::DuplicateOrder { order_id })) => {
                    tracing::debug!(order_id = %order_id, "order linked concurrently");
                    report.already_linked.push(order_id);
                }
                Err(e @ LedgerError::Validation(_)) => {
                    tracing::warn!(order_id = %order.id, error = %e, "order cannot become a trip");
                    report.failed.push(OrderFailure {
                        order_id: order.id.clone(),
                        code: e.error_code().to_string(),
                        message: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            created = report.created.len(),
            already_linked = report.already_linked.len(),
            failed = report.failed.len(),
            "order reconciliation finished"
        );
        Ok(report)
    }

    /// Order → Trip direction: walk the linked trip forward to the order's status
    ///
    /// Every step goes through the validated `TripService` transitions, so
    /// timestamps and earnings are stamped exactly as for a direct call. An
    /// order behind its trip (or a terminal trip asked to move) fails with
    /// `TripError::InvalidState`; the trip is left as it was. Returns `None`
    /// when the order has no linked trip.
    pub async fn apply_order_status(&self, order: &ShipmentOrder) -> LedgerResult<Option<Trip>> {
        let Some(mut trip) = self.linked_trip(order).await? else {
            return Ok(None);
        };

        let target = derive_trip_patch(order).status.unwrap_or(TripStatus::Pending);

        while trip.status != target {
            trip = match (trip.status, target) {
                (TripStatus::Pending | TripStatus::Accepted | TripStatus::InTransit, TripStatus::Cancelled) => {
                    self.trips.cancel(&trip.id).await?
                }
                (TripStatus::Pending, TripStatus::Accepted | TripStatus::InTransit | TripStatus::Completed) => {
                    let Some(transporter_id) = order.transporter_id.as_deref() else {
                        return Err(ValidationError::field(
                            "transporter_id",
                            format!("order {} is {} but names no transporter", order.id, target),
                        )
                        .into());
                    };
                    self.trips.accept(&trip.id, transporter_id).await?
                }
                (TripStatus::Accepted, TripStatus::InTransit) => self.trips.start(&trip.id).await?,
                (TripStatus::Accepted | TripStatus::InTransit, TripStatus::Completed) => {
                    self.trips.complete(&trip.id).await?
                }
                (status, _) => {
                    tracing::warn!(
                        order_id = %order.id,
                        trip_id = %trip.id,
                        trip_status = %status,
                        order_status = %target,
                        "order status is behind its trip"
                    );
                    return Err(TripError::InvalidState {
                        id: trip.id,
                        status,
                        action: "sync",
                    }
                    .into());
                }
            };
        }

        Ok(Some(trip))
    }

    async fn linked_trip(&self, order: &ShipmentOrder) -> LedgerResult<Option<Trip>> {
        if let Some(trip_id) = order.trip_id {
            if let Some(trip) = self.trips.repository().get(&trip_id).await? {
                return Ok(Some(trip));
            }
        }
        self.trips.repository().find_by_order(&order.id).await
    }

    // TODO: source contact details from the user-profile service instead of the placeholder
    fn with_contact(
        &self,
        order_id: &str,
        mut location: Location,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Location {
        if location.contact_name.is_none() {
            location.contact_name = name.map(String::from);
        }
        if location.contact_phone.is_none() {
            location.contact_phone = phone.map(String::from);
        }
        if location.contact_name.is_none() || location.contact_phone.is_none() {
            tracing::debug!(order_id, address = %location.address, "using placeholder contact");
            location
                .contact_name
                .get_or_insert_with(|| self.placeholder.name.clone());
            location
                .contact_phone
                .get_or_insert_with(|| self.placeholder.phone.clone());
        }
        location
    }
}
