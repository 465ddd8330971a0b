//! Trip lifecycle events
//!
//! Every successful write in the trip store publishes a [`TripEvent`] on the
//! [`EventBus`]. The bus uses `tokio::sync::broadcast`, so notification
//! consumers (order synchronisation, dashboards, push) are decoupled from the
//! transition that produced the event.
//!
//! ```rust,ignore
//! let bus = EventBus::new(1024);
//! let mut rx = bus.subscribe();
//!
//! service.accept(&trip_id, "T1").await?;
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("{} -> {}", envelope.event.display_id(), envelope.event.status());
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::core::trip::{Trip, TripStatus};

/// Snapshot of the fields every event carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRef {
    pub trip_id: Uuid,
    pub display_id: String,
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transporter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
}

impl From<&Trip> for TripRef {
    fn from(trip: &Trip) -> Self {
        Self {
            trip_id: trip.id,
            display_id: trip.display_id.clone(),
            status: trip.status,
            transporter_id: trip.transporter_id.clone(),
            order_id: trip.order_id.clone(),
        }
    }
}

/// A write to the trip store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TripEvent {
    Created(TripRef),
    Accepted(TripRef),
    Started(TripRef),
    Completed { trip: TripRef, total_rate: u64 },
    Cancelled(TripRef),
    Paid { trip: TripRef, total_rate: u64 },
    /// Written through the administrative override path
    Overridden(TripRef),
}

impl TripEvent {
    pub fn trip(&self) -> &TripRef {
        match self {
            TripEvent::Created(t)
            | TripEvent::Accepted(t)
            | TripEvent::Started(t)
            | TripEvent::Cancelled(t)
            | TripEvent::Overridden(t) => t,
            TripEvent::Completed { trip, .. } | TripEvent::Paid { trip, .. } => trip,
        }
    }

    pub fn trip_id(&self) -> Uuid {
        self.trip().trip_id
    }

    pub fn display_id(&self) -> &str {
        &self.trip().display_id
    }

    pub fn status(&self) -> TripStatus {
        self.trip().status
    }

    /// Get the action name
    pub fn action(&self) -> &'static str {
        match self {
            TripEvent::Created(_) => "created",
            TripEvent::Accepted(_) => "accepted",
            TripEvent::Started(_) => "started",
            TripEvent::Completed { .. } => "completed",
            TripEvent::Cancelled(_) => "cancelled",
            TripEvent::Paid { .. } => "paid",
            TripEvent::Overridden(_) => "overridden",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: TripEvent,
}

impl EventEnvelope {
    pub fn new(event: TripEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Cheap to clone; all clones share one channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Receivers that fall more than `capacity` events behind observe `Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Returns the number of receivers that will see the event.
    pub fn publish(&self, event: TripEvent) -> usize {
        tracing::trace!(action = event.action(), trip_id = %event.trip_id(), "publishing trip event");
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Subscribe to events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
