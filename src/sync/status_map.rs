//! Status mapping between shipper orders and trips
//!
//! Both directions are exhaustive `match`es: adding a status to either enum
//! fails to compile until its counterpart is decided.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::core::trip::TripStatus;

/// Status of a shipper-facing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Accepted,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Parse a status string, `None` for anything unrecognised
    pub fn parse(value: &str) -> Option<Self> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OrderStatus> for TripStatus {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => TripStatus::Pending,
            OrderStatus::Accepted => TripStatus::Accepted,
            OrderStatus::InProgress => TripStatus::InTransit,
            OrderStatus::Completed => TripStatus::Completed,
            OrderStatus::Cancelled => TripStatus::Cancelled,
        }
    }
}

impl From<TripStatus> for OrderStatus {
    fn from(status: TripStatus) -> Self {
        match status {
            TripStatus::Pending => OrderStatus::Pending,
            TripStatus::Accepted => OrderStatus::Accepted,
            TripStatus::InTransit => OrderStatus::InProgress,
            TripStatus::Completed => OrderStatus::Completed,
            TripStatus::Cancelled => OrderStatus::Cancelled,
        }
    }
}

/// Deserialize an optional status, mapping unknown strings to `None`
pub(crate) fn lenient_status<'de, D>(deserializer: D) -> Result<Option<OrderStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(OrderStatus::parse))
}
