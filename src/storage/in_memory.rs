//! In-memory implementation of TripRepository for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::core::error::{LedgerResult, StorageError, TripError};
use crate::core::store::TripRepository;
use crate::core::trip::Trip;

const BACKEND: &str = "in-memory";

#[derive(Default)]
struct State {
    trips: HashMap<Uuid, Trip>,
    /// order_id -> trip id
    by_order: HashMap<String, Uuid>,
    sequences: HashMap<NaiveDate, u32>,
}

/// In-memory trip repository
///
/// Uses a single RwLock so that the version check and the write in
/// [`TripRepository::replace`] happen atomically.
#[derive(Clone, Default)]
pub struct InMemoryTripRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryTripRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|e| {
            StorageError::LockPoisoned {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|e| {
            StorageError::LockPoisoned {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl TripRepository for InMemoryTripRepository {
    async fn insert(&self, trip: Trip) -> LedgerResult<Trip> {
        let mut state = self.write()?;

        if let Some(order_id) = &trip.order_id {
            if state.by_order.contains_key(order_id) {
                return Err(TripError::DuplicateOrder {
                    order_id: order_id.clone(),
                }
                .into());
            }
            state.by_order.insert(order_id.clone(), trip.id);
        }

        state.trips.insert(trip.id, trip.clone());

        Ok(trip)
    }

    async fn get(&self, id: &Uuid) -> LedgerResult<Option<Trip>> {
        let state = self.read()?;
        Ok(state.trips.get(id).cloned())
    }

    async fn list(&self) -> LedgerResult<Vec<Trip>> {
        let state = self.read()?;
        let mut trips: Vec<Trip> = state.trips.values().cloned().collect();
        trips.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.display_id.cmp(&b.display_id))
        });
        Ok(trips)
    }

    async fn find_by_order(&self, order_id: &str) -> LedgerResult<Option<Trip>> {
        let state = self.read()?;
        Ok(state
            .by_order
            .get(order_id)
            .and_then(|id| state.trips.get(id))
            .cloned())
    }

    async fn replace(&self, mut trip: Trip, expected_version: u64) -> LedgerResult<Option<Trip>> {
        let mut state = self.write()?;

        let current = state
            .trips
            .get(&trip.id)
            .ok_or(TripError::NotFound { id: trip.id })?;

        if current.version != expected_version {
            return Ok(None);
        }

        let previous_order = current.order_id.clone();
        if previous_order != trip.order_id {
            if let Some(order_id) = &trip.order_id {
                if state.by_order.get(order_id).is_some_and(|id| *id != trip.id) {
                    return Err(TripError::DuplicateOrder {
                        order_id: order_id.clone(),
                    }
                    .into());
                }
                state.by_order.insert(order_id.clone(), trip.id);
            }
            if let Some(old) = previous_order {
                state.by_order.remove(&old);
            }
        }

        trip.version = expected_version + 1;
        state.trips.insert(trip.id, trip.clone());

        Ok(Some(trip))
    }

    async fn next_display_sequence(&self, date: NaiveDate) -> LedgerResult<u32> {
        let mut state = self.write()?;
        let counter = state.sequences.entry(date).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }
}
