//! Shared test harness for trip repository and service testing
//!
//! Provides input builders, a wired-up service factory and the
//! `trip_repository_tests!` contract macro.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod repository_tests;

use std::sync::Arc;

use agrilink::config::LedgerConfig;
use agrilink::core::events::EventBus;
use agrilink::core::store::TripRepository;
use agrilink::core::trip::{CreateTripInput, Location, Shipment, ShipmentUnit, Trip};
use agrilink::storage::InMemoryTripRepository;
use agrilink::sync::{OrderStatus, ShipmentOrder};
use agrilink::trips::TripService;

pub fn location(address: &str) -> Location {
    Location {
        latitude: -1.9441,
        longitude: 30.0619,
        address: address.to_string(),
        contact_name: Some("Aline".to_string()),
        contact_phone: Some("+250788555000".to_string()),
    }
}

/// Maize bags from Musanze to Kigali
pub fn trip_input(quantity: f64, rate_per_unit: Option<u64>) -> CreateTripInput {
    CreateTripInput {
        shipment: Shipment {
            cargo_id: "cargo-maize".to_string(),
            cargo_name: "Maize".to_string(),
            quantity,
            unit: ShipmentUnit::Bags,
            total_value: Some(1_500_000),
        },
        pickup: location("Musanze cooperative store"),
        delivery: location("Kigali wholesale depot"),
        rate_per_unit,
        estimated_duration_minutes: Some(180),
        order_id: None,
    }
}

/// A trip record that has not been stored yet
pub fn unsaved_trip(order_id: Option<&str>) -> Trip {
    let mut input = trip_input(10.0, Some(500));
    input.order_id = order_id.map(String::from);
    Trip::new(input, 500, "TRIP-20240315-001".to_string())
}

pub fn order(id: &str) -> ShipmentOrder {
    ShipmentOrder {
        id: id.to_string(),
        cargo_id: format!("cargo-{}", id),
        cargo_name: "Beans".to_string(),
        quantity: 30.0,
        unit: ShipmentUnit::Bags,
        pickup: Location {
            contact_name: None,
            contact_phone: None,
            ..location("Huye collection point")
        },
        delivery: location("Nyabugogo market"),
        rate_per_unit: Some(700),
        total_value: None,
        estimated_duration_minutes: None,
        shipper_name: None,
        shipper_phone: None,
        receiver_name: None,
        receiver_phone: None,
        status: Some(OrderStatus::Pending),
        transporter_id: None,
        trip_id: None,
    }
}

pub fn in_memory_service() -> TripService {
    service_with(Arc::new(InMemoryTripRepository::new()), LedgerConfig::default())
}

pub fn service_with(repository: Arc<dyn TripRepository>, config: LedgerConfig) -> TripService {
    TripService::new(repository, EventBus::new(256), Arc::new(config))
}
