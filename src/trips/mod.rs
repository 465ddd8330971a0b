//! Trip store and administrative override

pub mod admin;
pub mod service;
mod write;

pub use admin::TripOverrides;
pub use service::TripService;
