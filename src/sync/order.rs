//! Shipper order records as seen by the synchroniser
//!
//! Orders are owned by the cargo/order backend. This crate only reads them
//! and derives patches for the caller to persist there.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::trip::{Location, ShipmentUnit, Trip, TripPatch, TripStatus};

use super::status_map::{OrderStatus, lenient_status};

/// Shipper-facing counterpart of a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentOrder {
    pub id: String,
    pub cargo_id: String,
    pub cargo_name: String,
    pub quantity: f64,
    pub unit: ShipmentUnit,
    pub pickup: Location,
    pub delivery: Location,
    #[serde(default)]
    pub rate_per_unit: Option<u64>,
    #[serde(default)]
    pub total_value: Option<u64>,
    #[serde(default)]
    pub estimated_duration_minutes: Option<u32>,
    #[serde(default)]
    pub shipper_name: Option<String>,
    #[serde(default)]
    pub shipper_phone: Option<String>,
    #[serde(default)]
    pub receiver_name: Option<String>,
    #[serde(default)]
    pub receiver_phone: Option<String>,
    /// Unrecognised values deserialize as `None`
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub transporter_id: Option<String>,
    #[serde(default)]
    pub trip_id: Option<Uuid>,
}

/// Fields of an order that follow its trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
    pub trip_id: Uuid,
}

/// Trip → Order: the patch to persist against the order store
pub fn derive_order_patch(trip: &Trip) -> OrderPatch {
    OrderPatch {
        status: trip.status.into(),
        transporter_id: trip.transporter_id.clone(),
        trip_id: trip.id,
    }
}

/// Order → Trip: status and assignment only; a missing order status means pending
pub fn derive_trip_patch(order: &ShipmentOrder) -> TripPatch {
    let status = order.status.map(TripStatus::from).unwrap_or(TripStatus::Pending);
    TripPatch {
        status: Some(status),
        transporter_id: order.transporter_id.clone(),
        ..Default::default()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trip::{CreateTripInput, Shipment};

    #[test]
    fn test_unknown_order_status_deserializes_to_none() {
        let mut value = serde_json::to_value(fixtures::order("O1")).unwrap();
        value["status"] = serde_json::json!("awaiting_payment");

        let order: ShipmentOrder = serde_json::from_value(value).unwrap();
        assert_eq!(order.status, None);
        assert_eq!(derive_trip_patch(&order).status, Some(TripStatus::Pending));
    }

    #[test]
    fn test_missing_status_field_is_pending() {
        let mut value = serde_json::to_value(fixtures::order("O1")).unwrap();
        value.as_object_mut().unwrap().remove("status");

        let order: ShipmentOrder = serde_json::from_value(value).unwrap();
        assert_eq!(derive_trip_patch(&order).status, Some(TripStatus::Pending));
    }

    #[test]
    fn test_trip_patch_carries_transporter() {
        let mut order = fixtures::order("O2");
        order.status = Some(OrderStatus::InProgress);
        order.transporter_id = Some("T1".to_string());

        let patch = derive_trip_patch(&order);
        assert_eq!(patch.status, Some(TripStatus::InTransit));
        assert_eq!(patch.transporter_id.as_deref(), Some("T1"));
        assert!(patch.shipment.is_none());
    }

    #[test]
    fn test_order_patch_from_trip() {
        let order = fixtures::order("O3");
        let input = CreateTripInput {
            shipment: Shipment {
                cargo_id: order.cargo_id.clone(),
                cargo_name: order.cargo_name.clone(),
                quantity: order.quantity,
                unit: order.unit,
                total_value: None,
            },
            pickup: order.pickup.clone(),
            delivery: order.delivery.clone(),
            rate_per_unit: None,
            estimated_duration_minutes: None,
            order_id: Some(order.id.clone()),
        };
        let mut trip = Trip::new(input, 500, "TRIP-1".to_string());
        trip.status = TripStatus::InTransit;
        trip.transporter_id = Some("T4".to_string());

        let patch = derive_order_patch(&trip);
        assert_eq!(patch.status, OrderStatus::InProgress);
        assert_eq!(patch.transporter_id.as_deref(), Some("T4"));
        assert_eq!(patch.trip_id, trip.id);
    }
}
