//! Core module containing the trip model, errors and storage seam

pub mod error;
pub mod events;
pub mod store;
pub mod trip;
pub mod validation;

pub use error::{LedgerError, LedgerResult, TripError, ValidationError};
pub use events::{EventBus, EventEnvelope, TripEvent};
pub use store::TripRepository;
pub use trip::{
    CreateTripInput, Earnings, EarningsStatus, Location, Shipment, ShipmentUnit, Trip, TripPatch,
    TripStatus,
};
