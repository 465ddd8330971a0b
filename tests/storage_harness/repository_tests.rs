//! Macro-generated test suite for `TripRepository` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use agrilink::storage::InMemoryTripRepository;
//!
//! trip_repository_tests!(InMemoryTripRepository::new());
//! ```
//!
//! # Generated Tests
//!
//! - `test_insert_and_get`: insert then retrieve, all fields equal
//! - `test_get_nonexistent`: random id returns None
//! - `test_list_empty` / `test_list_oldest_first`
//! - `test_replace_increments_version`
//! - `test_replace_stale_version_returns_none`: record left untouched
//! - `test_replace_nonexistent_is_not_found`
//! - `test_order_index`: find_by_order and duplicate rejection
//! - `test_display_sequence`: per-day counters start at 1
//! - `test_concurrent_replace_single_winner`: parallel CAS from spawned tasks

/// Generate a full `TripRepository` conformance test suite.
///
/// `$factory` must evaluate to a `TripRepository + Clone + 'static`. It is
/// re-evaluated for each test to keep tests isolated.
#[macro_export]
macro_rules! trip_repository_tests {
    ($factory:expr) => {
        mod trip_repository_contract_tests {
            use super::*;
            use agrilink::core::store::TripRepository;
            use agrilink::core::trip::TripStatus;
            use chrono::{Duration, NaiveDate};
            use uuid::Uuid;

            #[tokio::test]
            async fn test_insert_and_get() {
                let repo = $factory;
                let trip = unsaved_trip(None);

                let inserted = repo.insert(trip.clone()).await.unwrap();
                assert_eq!(inserted, trip);

                let fetched = repo.get(&trip.id).await.unwrap();
                assert_eq!(fetched, Some(trip));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let repo = $factory;
                assert!(repo.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let repo = $factory;
                assert!(repo.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_oldest_first() {
                let repo = $factory;
                let mut older = unsaved_trip(None);
                older.created_at = older.created_at - Duration::minutes(5);
                let newer = unsaved_trip(None);

                repo.insert(newer.clone()).await.unwrap();
                repo.insert(older.clone()).await.unwrap();

                let ids: Vec<_> = repo.list().await.unwrap().into_iter().map(|t| t.id).collect();
                assert_eq!(ids, vec![older.id, newer.id]);
            }

            #[tokio::test]
            async fn test_replace_increments_version() {
                let repo = $factory;
                let mut trip = repo.insert(unsaved_trip(None)).await.unwrap();

                trip.status = TripStatus::Cancelled;
                let stored = repo.replace(trip.clone(), 0).await.unwrap().unwrap();
                assert_eq!(stored.version, 1);

                let stored = repo.replace(stored.clone(), 1).await.unwrap().unwrap();
                assert_eq!(stored.version, 2);
                assert_eq!(repo.get(&trip.id).await.unwrap().unwrap().version, 2);
            }

            #[tokio::test]
            async fn test_replace_stale_version_returns_none() {
                let repo = $factory;
                let trip = repo.insert(unsaved_trip(None)).await.unwrap();
                repo.replace(trip.clone(), 0).await.unwrap().unwrap();

                let mut stale = trip.clone();
                stale.status = TripStatus::Cancelled;
                assert!(repo.replace(stale, 0).await.unwrap().is_none());

                let current = repo.get(&trip.id).await.unwrap().unwrap();
                assert_eq!(current.status, TripStatus::Pending);
            }

            #[tokio::test]
            async fn test_replace_nonexistent_is_not_found() {
                let repo = $factory;
                let err = repo.replace(unsaved_trip(None), 0).await.unwrap_err();
                assert!(err.is_not_found());
            }

            #[tokio::test]
            async fn test_order_index() {
                let repo = $factory;
                let linked = repo.insert(unsaved_trip(Some("ORD-7"))).await.unwrap();

                let found = repo.find_by_order("ORD-7").await.unwrap().unwrap();
                assert_eq!(found.id, linked.id);
                assert!(repo.find_by_order("ORD-8").await.unwrap().is_none());

                let err = repo.insert(unsaved_trip(Some("ORD-7"))).await.unwrap_err();
                assert_eq!(err.error_code(), "TRIP_DUPLICATE_ORDER");
            }

            #[tokio::test]
            async fn test_display_sequence() {
                let repo = $factory;
                let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
                let next_day = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();

                assert_eq!(repo.next_display_sequence(day).await.unwrap(), 1);
                assert_eq!(repo.next_display_sequence(day).await.unwrap(), 2);
                assert_eq!(repo.next_display_sequence(next_day).await.unwrap(), 1);
                assert_eq!(repo.next_display_sequence(day).await.unwrap(), 3);
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
            async fn test_concurrent_replace_single_winner() {
                let repo = $factory;
                let trip = repo.insert(unsaved_trip(None)).await.unwrap();

                let mut handles = Vec::new();
                for _ in 0..16 {
                    let repo = repo.clone();
                    let trip = trip.clone();
                    handles.push(tokio::spawn(async move {
                        repo.replace(trip, 0).await.unwrap().is_some()
                    }));
                }

                let mut winners = 0;
                for handle in handles {
                    if handle.await.unwrap() {
                        winners += 1;
                    }
                }
                assert_eq!(winners, 1);
                assert_eq!(repo.get(&trip.id).await.unwrap().unwrap().version, 1);
            }
        }
    };
}
