//! # Agrilink trip ledger
//!
//! Trip lifecycle, order synchronisation and earnings aggregation for a
//! two-sided agricultural logistics marketplace: shippers list cargo,
//! transporters accept and run the trips that move it.
//!
//! ## Components
//!
//! - **Trip store** ([`trips::TripService`]): creation and the validated
//!   `pending → accepted → in_transit → completed` lifecycle, with
//!   cancellation from any non-terminal status. Writes are optimistic, so two
//!   transporters racing to accept the same trip produce one winner.
//! - **Administrative override** ([`trips::TripOverrides`]): trusted field
//!   merge that skips the lifecycle, kept on its own type.
//! - **Status synchroniser** ([`sync::StatusSynchronizer`]): maps shipper
//!   order status onto trip status and back, and creates trips for orders.
//! - **Earnings aggregator** ([`earnings`]): pure reducers producing
//!   dashboard totals and per-transporter statistics.
//! - **Storage** ([`core::TripRepository`], [`storage::InMemoryTripRepository`]).
//! - **HTTP** ([`server`]): axum routes over all of the above.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agrilink::prelude::*;
//!
//! let state = AppState::in_memory(LedgerConfig::default());
//! let trip = state.trips.create(input).await?;
//! let trip = state.trips.accept(&trip.id, "T1").await?;
//! let trip = state.trips.start(&trip.id).await?;
//! let trip = state.trips.complete(&trip.id).await?;
//!
//! assert_eq!(earnings::total_earnings(&[trip]), 25_000);
//! ```

pub mod config;
pub mod core;
pub mod earnings;
pub mod server;
pub mod storage;
pub mod sync;
pub mod trips;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        CreateTripInput, Earnings, EarningsStatus, Location, Shipment, ShipmentUnit, Trip,
        TripPatch, TripStatus,
    };

    // === Errors ===
    pub use crate::core::error::{
        ConfigError, ErrorResponse, FieldValidationError, LedgerError, LedgerResult,
        StorageError, TripError, ValidationError,
    };

    // === Events ===
    pub use crate::core::events::{EventBus, EventEnvelope, TripEvent, TripRef};

    // === Services ===
    pub use crate::core::store::TripRepository;
    pub use crate::storage::InMemoryTripRepository;
    pub use crate::sync::{
        OrderPatch, OrderStatus, ShipmentOrder, StatusSynchronizer, SyncReport,
        derive_order_patch, derive_trip_patch,
    };
    pub use crate::trips::{TripOverrides, TripService};

    // === Aggregation ===
    pub use crate::earnings::{self, TripStats};

    // === Config & Server ===
    pub use crate::config::LedgerConfig;
    pub use crate::server::{AppState, build_router, serve};
}
