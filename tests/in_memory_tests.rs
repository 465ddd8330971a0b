//! Integration tests for InMemoryTripRepository using the storage test harness.
//!
//! This file invokes `trip_repository_tests!` to validate that
//! InMemoryTripRepository conforms to the TripRepository contract.

#[macro_use]
mod storage_harness;

use agrilink::storage::InMemoryTripRepository;
use storage_harness::*;

trip_repository_tests!(InMemoryTripRepository::new());
