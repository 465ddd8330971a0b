//! Status synchronisation between trips and shipper orders
//!
//! Trips and orders are separate records with separate status vocabularies.
//! This module maps one onto the other in either direction; the caller picks
//! the direction for each call and persists any order-side patch itself.

pub mod order;
pub mod status_map;
pub mod synchronizer;

pub use order::{OrderPatch, ShipmentOrder, derive_order_patch, derive_trip_patch};
pub use status_map::OrderStatus;
pub use synchronizer::{OrderFailure, StatusSynchronizer, SyncReport};
