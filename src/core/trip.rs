//! Trip domain model and lifecycle state machine

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Lifecycle status of a trip
///
/// `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Pending,
    Accepted,
    InTransit,
    Completed,
    Cancelled,
}

impl TripStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [TripStatus; 5] = [
        TripStatus::Pending,
        TripStatus::Accepted,
        TripStatus::InTransit,
        TripStatus::Completed,
        TripStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "pending",
            TripStatus::Accepted => "accepted",
            TripStatus::InTransit => "in_transit",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    /// Whether the lifecycle permits moving from `self` to `next`
    pub fn can_transition_to(&self, next: TripStatus) -> bool {
        use TripStatus::*;
        matches!(
            (self, next),
            (Pending, Accepted)
                | (Pending, Cancelled)
                | (Accepted, InTransit)
                | (Accepted, Completed)
                | (Accepted, Cancelled)
                | (InTransit, Completed)
                | (InTransit, Cancelled)
        )
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown trip status '{}'", s))
    }
}

/// Payment state of a trip's earnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarningsStatus {
    Pending,
    Earned,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentUnit {
    Kg,
    Tons,
    Bags,
}

/// Cargo payload carried by a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Shipment {
    pub cargo_id: String,
    #[validate(length(min = 1, max = 120, message = "must be 1 to 120 characters"))]
    pub cargo_name: String,
    #[validate(range(exclusive_min = 0.0, max = 1_000_000.0, message = "must be greater than zero and at most 1,000,000"))]
    pub quantity: f64,
    pub unit: ShipmentUnit,
    /// Declared cargo value in RWF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<u64>,
}

/// A pickup or delivery point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(range(min = -90.0, max = 90.0, message = "must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(length(min = 1, message = "is required"))]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
}

/// Upper bound on a per-unit rate, in RWF. Matches the `rate_per_unit` rule on [`CreateTripInput`]
pub const MAX_RATE_PER_UNIT: u64 = 10_000_000;

/// Upper bound on a shipment quantity. Matches the `quantity` rule on [`Shipment`]
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// Monetary record attached to a trip, in integer RWF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Earnings {
    pub rate_per_unit: u64,
    pub total_rate: u64,
    pub status: EarningsStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Earnings {
    pub fn new(rate_per_unit: u64, quantity: f64) -> Self {
        Self {
            rate_per_unit,
            total_rate: total_rate(rate_per_unit, quantity),
            status: EarningsStatus::Pending,
            completed_at: None,
            paid_at: None,
        }
    }
}

/// `rate × quantity`, rounded to whole RWF
pub fn total_rate(rate_per_unit: u64, quantity: f64) -> u64 {
    let total = (rate_per_unit as f64 * quantity).round();
    if total.is_finite() && total > 0.0 {
        total as u64
    } else {
        0
    }
}

/// A single transport job from pickup to delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    /// Human-readable id, e.g. `TRIP-20240315-007`
    pub display_id: String,
    /// Back-reference to the shipper order this trip was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
    pub status: TripStatus,
    pub shipment: Shipment,
    pub pickup: Location,
    pub delivery: Location,
    pub earnings: Earnings,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,
    /// Incremented on every stored write
    pub version: u64,
}

impl Trip {
    /// Build a fresh pending trip. The caller supplies the resolved rate and display id.
    pub fn new(input: CreateTripInput, rate_per_unit: u64, display_id: String) -> Self {
        let earnings = Earnings::new(rate_per_unit, input.shipment.quantity);
        Self {
            id: Uuid::new_v4(),
            display_id,
            order_id: input.order_id,
            transporter_id: None,
            status: TripStatus::Pending,
            shipment: input.shipment,
            pickup: input.pickup,
            delivery: input.delivery,
            earnings,
            created_at: Utc::now(),
            accepted_at: None,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            estimated_duration_minutes: input.estimated_duration_minutes,
            version: 0,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.transporter_id.is_some()
    }

    /// Pending and not yet claimed by any transporter
    pub fn is_open(&self) -> bool {
        self.status == TripStatus::Pending && self.transporter_id.is_none()
    }

    pub fn belongs_to(&self, transporter_id: &str) -> bool {
        self.transporter_id.as_deref() == Some(transporter_id)
    }
}

/// Input accepted by `TripService::create`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTripInput {
    #[validate(nested)]
    pub shipment: Shipment,
    #[validate(nested)]
    pub pickup: Location,
    #[validate(nested)]
    pub delivery: Location,
    /// Falls back to the configured default rate
    #[serde(default)]
    #[validate(range(min = 1, max = 10_000_000, message = "must be between 1 and 10,000,000 RWF"))]
    pub rate_per_unit: Option<u64>,
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// Field-by-field overwrite used by the administrative override path
///
/// `None` leaves the field untouched. Lifecycle timestamps are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TripStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment: Option<Shipment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_unit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings_status: Option<EarningsStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_minutes: Option<u32>,
}

impl TripPatch {
    pub fn is_empty(&self) -> bool {
        *self == TripPatch::default()
    }

    /// Merge the patch into `trip`, recomputing the total when pricing inputs change
    pub fn apply_to(self, trip: &mut Trip) {
        let reprice = self.shipment.is_some() || self.rate_per_unit.is_some();

        if let Some(status) = self.status {
            trip.status = status;
        }
        if let Some(transporter_id) = self.transporter_id {
            trip.transporter_id = Some(transporter_id);
        }
        if let Some(shipment) = self.shipment {
            trip.shipment = shipment;
        }
        if let Some(pickup) = self.pickup {
            trip.pickup = pickup;
        }
        if let Some(delivery) = self.delivery {
            trip.delivery = delivery;
        }
        if let Some(rate) = self.rate_per_unit {
            trip.earnings.rate_per_unit = rate;
        }
        if let Some(earnings_status) = self.earnings_status {
            trip.earnings.status = earnings_status;
        }
        if let Some(minutes) = self.estimated_duration_minutes {
            trip.estimated_duration_minutes = Some(minutes);
        }

        if reprice {
            trip.earnings.total_rate =
                total_rate(trip.earnings.rate_per_unit, trip.shipment.quantity);
        }
    }
}

/// Format a display id: `PREFIX-YYYYMMDD-###`
pub fn format_display_id(prefix: &str, date: NaiveDate, sequence: u32) -> String {
    format!("{}-{}-{:03}", prefix, date.format("%Y%m%d"), sequence)
}
