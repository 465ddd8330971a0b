//! Earnings aggregation over trip snapshots
//!
//! Everything here is a pure function of the slice it is given. Money is
//! integer RWF throughout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::trip::{EarningsStatus, Trip, TripStatus};

/// Totals saturate at `u64::MAX` instead of overflowing
fn saturating_sum<'a>(trips: impl Iterator<Item = &'a Trip>) -> u64 {
    trips
        .map(|trip| trip.earnings.total_rate)
        .fold(0u64, u64::saturating_add)
}

fn sum_where(trips: &[Trip], status: EarningsStatus) -> u64 {
    saturating_sum(trips.iter().filter(|trip| trip.earnings.status == status))
}

/// Sum of `total_rate` over trips whose earnings are earned
pub fn total_earnings(trips: &[Trip]) -> u64 {
    sum_where(trips, EarningsStatus::Earned)
}

/// Sum of `total_rate` over trips whose earnings are still pending
pub fn pending_earnings(trips: &[Trip]) -> u64 {
    sum_where(trips, EarningsStatus::Pending)
}

/// Sum of `total_rate` over trips already paid out
pub fn paid_earnings(trips: &[Trip]) -> u64 {
    sum_where(trips, EarningsStatus::Paid)
}

/// Dashboard figures for one transporter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripStats {
    pub total_trips: usize,
    /// Accepted but not yet started
    pub pending_trips: usize,
    /// On the road
    pub active_trips: usize,
    pub completed_trips: usize,
    pub cancelled_trips: usize,
    pub total_earnings: u64,
    pub pending_earnings: u64,
    pub average_earnings_per_trip: u64,
    /// Percentage of the transporter's trips that completed, 0–100
    pub completion_rate: f64,
}

/// Aggregate the trips assigned to `transporter_id`
pub fn trip_stats(trips: &[Trip], transporter_id: &str) -> TripStats {
    let mine: Vec<Trip> = trips
        .iter()
        .filter(|trip| trip.belongs_to(transporter_id))
        .cloned()
        .collect();

    let count = |status: TripStatus| mine.iter().filter(|t| t.status == status).count();

    let total_trips = mine.len();
    let completed_trips = count(TripStatus::Completed);
    let total = total_earnings(&mine);

    let average_earnings_per_trip = if completed_trips == 0 {
        0
    } else {
        total / completed_trips as u64
    };
    let completion_rate = if total_trips == 0 {
        0.0
    } else {
        completed_trips as f64 / total_trips as f64 * 100.0
    };

    TripStats {
        total_trips,
        pending_trips: count(TripStatus::Accepted),
        active_trips: count(TripStatus::InTransit),
        completed_trips,
        cancelled_trips: count(TripStatus::Cancelled),
        total_earnings: total,
        pending_earnings: pending_earnings(&mine),
        average_earnings_per_trip,
        completion_rate,
    }
}

/// Trips ordered by creation time; ties keep their input order
pub fn sort_by_date(trips: &[Trip], descending: bool) -> Vec<Trip> {
    let mut sorted = trips.to_vec();
    if descending {
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    } else {
        sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    }
    sorted
}

/// Trips ordered by `total_rate`; ties keep their input order
pub fn sort_by_earnings(trips: &[Trip], descending: bool) -> Vec<Trip> {
    let mut sorted = trips.to_vec();
    if descending {
        sorted.sort_by(|a, b| b.earnings.total_rate.cmp(&a.earnings.total_rate));
    } else {
        sorted.sort_by(|a, b| a.earnings.total_rate.cmp(&b.earnings.total_rate));
    }
    sorted
}

/// Earned or paid trips whose earnings completed in `[from, to)`
pub fn earnings_between(trips: &[Trip], from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    saturating_sum(
        trips
            .iter()
            .filter(|trip| {
                matches!(
                    trip.earnings.status,
                    EarningsStatus::Earned | EarningsStatus::Paid
                )
            })
            .filter(|trip| {
                trip.earnings
                    .completed_at
                    .is_some_and(|at| at >= from && at < to)
            }),
    )
}

/// `25000` → `"RWF 25,000"`
pub fn format_rwf(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("RWF {}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trip::fixtures;
    use chrono::Duration;

    fn trip(rate: u64, status: TripStatus, earnings: EarningsStatus, transporter: Option<&str>) -> Trip {
        let mut t = Trip::new(fixtures::input(1.0, Some(rate)), rate, "TRIP-1".to_string());
        t.status = status;
        t.earnings.status = earnings;
        t.transporter_id = transporter.map(String::from);
        t
    }

    #[test]
    fn test_totals_by_earnings_status() {
        let trips = vec![
            trip(1_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
            trip(2_000, TripStatus::Completed, EarningsStatus::Paid, Some("T1")),
            trip(4_000, TripStatus::Accepted, EarningsStatus::Pending, Some("T1")),
            trip(8_000, TripStatus::Completed, EarningsStatus::Earned, Some("T2")),
        ];
        assert_eq!(total_earnings(&trips), 9_000);
        assert_eq!(paid_earnings(&trips), 2_000);
        assert_eq!(pending_earnings(&trips), 4_000);
    }

    #[test]
    fn test_pending_trip_does_not_change_total() {
        let mut trips = vec![trip(1_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1"))];
        let before = total_earnings(&trips);
        trips.push(trip(50_000, TripStatus::Pending, EarningsStatus::Pending, None));
        assert_eq!(total_earnings(&trips), before);
    }

    #[test]
    fn test_stats_for_unknown_transporter_are_zero() {
        let trips = vec![trip(1_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1"))];
        let stats = trip_stats(&trips, "nobody");
        assert_eq!(stats, TripStats::default());
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[test]
    fn test_stats_counts_and_rates() {
        let trips = vec![
            trip(3_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
            trip(4_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
            trip(5_000, TripStatus::Accepted, EarningsStatus::Pending, Some("T1")),
            trip(6_000, TripStatus::InTransit, EarningsStatus::Pending, Some("T1")),
            trip(7_000, TripStatus::Cancelled, EarningsStatus::Pending, Some("T1")),
            trip(9_000, TripStatus::Completed, EarningsStatus::Earned, Some("T2")),
        ];
        let stats = trip_stats(&trips, "T1");

        assert_eq!(stats.total_trips, 5);
        assert_eq!(stats.pending_trips, 1);
        assert_eq!(stats.active_trips, 1);
        assert_eq!(stats.completed_trips, 2);
        assert_eq!(stats.cancelled_trips, 1);
        assert_eq!(stats.total_earnings, 7_000);
        assert_eq!(stats.pending_earnings, 18_000);
        assert_eq!(stats.average_earnings_per_trip, 3_500);
        assert!((stats.completion_rate - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut trips = vec![
            trip(1, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
            trip(1, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
            trip(1, TripStatus::Accepted, EarningsStatus::Pending, Some("T1")),
            trip(1, TripStatus::Accepted, EarningsStatus::Pending, Some("T1")),
        ];
        for t in &mut trips {
            t.earnings.total_rate = u64::MAX;
        }

        assert_eq!(total_earnings(&trips), u64::MAX);
        assert_eq!(pending_earnings(&trips), u64::MAX);
        let stats = trip_stats(&trips, "T1");
        assert_eq!(stats.total_earnings, u64::MAX);
        assert_eq!(stats.average_earnings_per_trip, u64::MAX / 2);
    }

    #[test]
    fn test_average_is_integer_division() {
        let trips = vec![
            trip(1_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
            trip(1_001, TripStatus::Completed, EarningsStatus::Earned, Some("T1")),
        ];
        assert_eq!(trip_stats(&trips, "T1").average_earnings_per_trip, 1_000);
    }

    #[test]
    fn test_sorts_do_not_mutate_input_and_are_idempotent() {
        let now = Utc::now();
        let mut trips = vec![
            trip(2_000, TripStatus::Pending, EarningsStatus::Pending, None),
            trip(9_000, TripStatus::Pending, EarningsStatus::Pending, None),
            trip(5_000, TripStatus::Pending, EarningsStatus::Pending, None),
        ];
        trips[0].created_at = now - Duration::hours(1);
        trips[1].created_at = now - Duration::hours(3);
        trips[2].created_at = now - Duration::hours(2);
        let original = trips.clone();

        let by_date = sort_by_date(&trips, true);
        assert_eq!(
            by_date.iter().map(|t| t.earnings.total_rate).collect::<Vec<_>>(),
            vec![2_000, 5_000, 9_000]
        );
        assert_eq!(sort_by_date(&by_date, true), by_date);

        let by_earnings = sort_by_earnings(&trips, false);
        assert_eq!(
            by_earnings.iter().map(|t| t.earnings.total_rate).collect::<Vec<_>>(),
            vec![2_000, 5_000, 9_000]
        );
        assert_eq!(sort_by_earnings(&by_earnings, false), by_earnings);

        assert_eq!(trips, original);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let now = Utc::now();
        let mut trips = vec![
            trip(1_000, TripStatus::Pending, EarningsStatus::Pending, None),
            trip(1_000, TripStatus::Pending, EarningsStatus::Pending, None),
        ];
        trips[0].created_at = now;
        trips[1].created_at = now;
        let ids: Vec<_> = trips.iter().map(|t| t.id).collect();

        let sorted: Vec<_> = sort_by_earnings(&trips, true).iter().map(|t| t.id).collect();
        assert_eq!(sorted, ids);
        let sorted: Vec<_> = sort_by_date(&trips, true).iter().map(|t| t.id).collect();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn test_earnings_between_window() {
        let now = Utc::now();
        let mut inside = trip(3_000, TripStatus::Completed, EarningsStatus::Earned, Some("T1"));
        inside.earnings.completed_at = Some(now - Duration::days(1));
        let mut outside = trip(5_000, TripStatus::Completed, EarningsStatus::Paid, Some("T1"));
        outside.earnings.completed_at = Some(now - Duration::days(10));
        let open = trip(7_000, TripStatus::Accepted, EarningsStatus::Pending, Some("T1"));

        let week = earnings_between(&[inside, outside, open], now - Duration::days(7), now);
        assert_eq!(week, 3_000);
    }

    #[test]
    fn test_format_rwf() {
        assert_eq!(format_rwf(0), "RWF 0");
        assert_eq!(format_rwf(950), "RWF 950");
        assert_eq!(format_rwf(25_000), "RWF 25,000");
        assert_eq!(format_rwf(1_234_567), "RWF 1,234,567");
    }
}
