//! Operational status classification.
//!
//! A flight's board status depends on its raw upstream status, its scheduled
//! and estimated times, and the current time. Nothing here keeps state or
//! reads the clock; callers pass `now` in.

use std::fmt;

use chrono::Duration;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::clock::IstDateTime;
use crate::flight::{Direction, Flight, OperationalStatus};

/// Status shown on the board and counted in the status charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlightStatus {
    /// Arrival whose estimated time has passed.
    Arrived,
    /// Departure whose estimated time has passed.
    Departed,
    /// Departure within the boarding window.
    Boarding,
    /// Estimate within the delay threshold of the schedule.
    OnTime,
    /// Estimate later than the schedule by more than the threshold.
    Delayed,
    /// Cancelled upstream.
    Cancelled,
}

/// Labels counted for arrivals, in chart order.
pub const ARRIVAL_STATUSES: [FlightStatus; 4] = [
    FlightStatus::Arrived,
    FlightStatus::OnTime,
    FlightStatus::Delayed,
    FlightStatus::Cancelled,
];

/// Labels counted for departures, in chart order.
pub const DEPARTURE_STATUSES: [FlightStatus; 5] = [
    FlightStatus::Departed,
    FlightStatus::Boarding,
    FlightStatus::OnTime,
    FlightStatus::Delayed,
    FlightStatus::Cancelled,
];

impl FlightStatus {
    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Arrived => "Arrived",
            Self::Departed => "Departed",
            Self::Boarding => "Boarding",
            Self::OnTime => "On Time",
            Self::Delayed => "Delayed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FlightStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Minute thresholds used by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    /// Estimated minus scheduled above this many minutes is a delay.
    pub delay_minutes: i64,
    /// A departure estimated within this many minutes from now is boarding.
    pub boarding_window_minutes: i64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            delay_minutes: 30,
            boarding_window_minutes: 40,
        }
    }
}

/// Classify a flight at `now`.
///
/// Returns `None` when the flight has no status badge: its raw status is
/// neither `operating` nor `cancelled`, its direction is unknown, or either
/// time fails to parse.
#[must_use]
pub fn classify(
    flight: &Flight,
    now: &IstDateTime,
    thresholds: StatusThresholds,
) -> Option<FlightStatus> {
    match flight.operational_status {
        Some(OperationalStatus::Cancelled) => return Some(FlightStatus::Cancelled),
        Some(OperationalStatus::Operating) => {}
        _ => return None,
    }

    let direction = flight.direction?;

    let (Some(scheduled), Some(estimated)) = (flight.scheduled_time(), flight.estimated_time())
    else {
        debug!(
            flight = %flight.flight,
            scheduled = flight.scheduled.display(),
            estimated = flight.estimated.display(),
            "unclassifiable times"
        );
        return None;
    };

    if *now >= estimated {
        return Some(match direction {
            Direction::Arrival => FlightStatus::Arrived,
            Direction::Departure => FlightStatus::Departed,
        });
    }

    if direction == Direction::Departure
        && estimated <= *now + Duration::minutes(thresholds.boarding_window_minutes)
    {
        return Some(FlightStatus::Boarding);
    }

    if estimated - scheduled > Duration::minutes(thresholds.delay_minutes) {
        Some(FlightStatus::Delayed)
    } else {
        Some(FlightStatus::OnTime)
    }
}

/// Count of flights with a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// The status.
    pub status: FlightStatus,
    /// Number of flights.
    pub count: usize,
}

/// Status counts per direction, for the status pie charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBreakdown {
    /// Counts over [`ARRIVAL_STATUSES`], in that order.
    pub arrivals: Vec<StatusCount>,
    /// Counts over [`DEPARTURE_STATUSES`], in that order.
    pub departures: Vec<StatusCount>,
}

impl StatusBreakdown {
    /// Classify every listed flight at `now` and count the results.
    #[must_use]
    pub fn compute(flights: &[Flight], now: &IstDateTime, thresholds: StatusThresholds) -> Self {
        let mut arrivals: Vec<StatusCount> = ARRIVAL_STATUSES
            .iter()
            .map(|&status| StatusCount { status, count: 0 })
            .collect();
        let mut departures: Vec<StatusCount> = DEPARTURE_STATUSES
            .iter()
            .map(|&status| StatusCount { status, count: 0 })
            .collect();

        for flight in flights.iter().filter(|f| f.is_listed()) {
            let Some(status) = classify(flight, now, thresholds) else {
                continue;
            };
            let bucket = match flight.direction {
                Some(Direction::Arrival) => &mut arrivals,
                Some(Direction::Departure) => &mut departures,
                None => continue,
            };
            if let Some(entry) = bucket.iter_mut().find(|c| c.status == status) {
                entry.count += 1;
            }
        }

        Self {
            arrivals,
            departures,
        }
    }

    /// Count for one direction and status.
    #[must_use]
    pub fn count(&self, direction: Direction, status: FlightStatus) -> usize {
        self.side(direction)
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }

    /// Non-empty slices for one direction, as drawn in a pie chart.
    #[must_use]
    pub fn slices(&self, direction: Direction) -> Vec<StatusCount> {
        self.side(direction)
            .iter()
            .copied()
            .filter(|c| c.count > 0)
            .collect()
    }

    fn side(&self, direction: Direction) -> &[StatusCount] {
        match direction {
            Direction::Arrival => &self.arrivals,
            Direction::Departure => &self.departures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ist_at;
    use crate::flight::fixtures::{arrival, departure, with_status};
    use crate::flight::Slot;

    const DAY: &str = "2026-10-19";

    fn at(time: &str) -> IstDateTime {
        ist_at(DAY, time)
    }

    fn ts(time: &str) -> String {
        format!("{DAY}T{time}")
    }

    fn status(flight: &Flight, now: &str) -> Option<FlightStatus> {
        classify(flight, &at(now), StatusThresholds::default())
    }

    #[test]
    fn test_cancelled_regardless_of_times() {
        let flight = with_status(arrival("AI 1", "garbage", "-"), "CANCELLED");
        assert_eq!(status(&flight, "12:00:00"), Some(FlightStatus::Cancelled));

        let flight = with_status(
            departure("AI 2", &ts("08:00:00"), &ts("08:00:00")),
            "cancelled",
        );
        assert_eq!(status(&flight, "23:00:00"), Some(FlightStatus::Cancelled));
    }

    #[test]
    fn test_non_operating_statuses_unclassified() {
        let base = arrival("AI 3", &ts("10:00:00"), &ts("10:00:00"));
        for raw in ["not operating", "ontime", "diverted"] {
            let flight = with_status(base.clone(), raw);
            assert_eq!(status(&flight, "09:00:00"), None, "status {raw}");
        }

        let mut unset = base;
        unset.operational_status = None;
        assert_eq!(status(&unset, "09:00:00"), None);
    }

    #[test]
    fn test_arrival_zero_drift_on_time() {
        let flight = arrival("6E 10", &ts("10:00:00"), &ts("10:00:00"));
        assert_eq!(status(&flight, "09:00:00"), Some(FlightStatus::OnTime));
    }

    #[test]
    fn test_arrival_thirty_minutes_is_on_time() {
        let flight = arrival("6E 11", &ts("10:00:00"), &ts("10:30:00"));
        assert_eq!(status(&flight, "09:00:00"), Some(FlightStatus::OnTime));
    }

    #[test]
    fn test_arrival_thirty_one_minutes_delayed() {
        let flight = arrival("6E 12", &ts("10:00:00"), &ts("10:31:00"));
        assert_eq!(status(&flight, "09:00:00"), Some(FlightStatus::Delayed));
    }

    #[test]
    fn test_arrived_even_if_delayed() {
        let flight = arrival("6E 13", &ts("10:00:00"), &ts("11:30:00"));
        assert_eq!(status(&flight, "11:30:00"), Some(FlightStatus::Arrived));
        assert_eq!(status(&flight, "12:00:00"), Some(FlightStatus::Arrived));
    }

    #[test]
    fn test_departure_boarding_beats_delay() {
        let flight = departure("UK 20", &ts("10:00:00"), &ts("11:00:00"));
        // 30 minutes before ETOD, an hour late: still boarding
        assert_eq!(status(&flight, "10:30:00"), Some(FlightStatus::Boarding));
        // Exactly at the window edge
        assert_eq!(status(&flight, "10:20:00"), Some(FlightStatus::Boarding));
        // Outside the window the delay shows
        assert_eq!(status(&flight, "10:19:59"), Some(FlightStatus::Delayed));
    }

    #[test]
    fn test_departed() {
        let flight = departure("UK 21", &ts("10:00:00"), &ts("10:05:00"));
        assert_eq!(status(&flight, "10:05:00"), Some(FlightStatus::Departed));
    }

    #[test]
    fn test_departure_on_time_outside_window() {
        let flight = departure("UK 22", &ts("18:00:00"), &ts("18:10:00"));
        assert_eq!(status(&flight, "12:00:00"), Some(FlightStatus::OnTime));
    }

    #[test]
    fn test_arrivals_never_board() {
        let flight = arrival("UK 23", &ts("10:00:00"), &ts("10:10:00"));
        assert_eq!(status(&flight, "10:00:00"), Some(FlightStatus::OnTime));
    }

    #[test]
    fn test_unparsable_times_unclassified() {
        let flight = arrival("AI 4", &ts("10:00:00"), "later");
        assert_eq!(status(&flight, "09:00:00"), None);

        let mut flight = departure("AI 5", &ts("10:00:00"), &ts("10:00:00"));
        flight.scheduled = Slot::Placeholder;
        assert_eq!(status(&flight, "09:00:00"), None);
    }

    #[test]
    fn test_unknown_direction_unclassified() {
        let mut flight = arrival("AI 6", &ts("10:00:00"), &ts("10:00:00"));
        flight.direction = None;
        assert_eq!(status(&flight, "09:00:00"), None);
    }

    #[test]
    fn test_custom_thresholds() {
        let flight = departure("G8 1", &ts("10:00:00"), &ts("10:20:00"));
        let strict = StatusThresholds {
            delay_minutes: 15,
            boarding_window_minutes: 10,
        };
        assert_eq!(
            classify(&flight, &at("09:00:00"), strict),
            Some(FlightStatus::Delayed)
        );
        assert_eq!(
            classify(&flight, &at("10:15:00"), strict),
            Some(FlightStatus::Boarding)
        );
    }

    #[test]
    fn test_ontime_placeholder_unclassified() {
        let flight = with_status(arrival("AI 7", &ts("10:00:00"), "-"), "ontime");
        assert_eq!(
            classify(&flight, &at("09:00:00"), StatusThresholds::default()),
            None
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(FlightStatus::OnTime.to_string(), "On Time");
        assert_eq!(
            serde_json::to_string(&FlightStatus::Boarding).unwrap(),
            "\"Boarding\""
        );
    }

    #[test]
    fn test_breakdown_counts() {
        let flights = vec![
            arrival("A1", &ts("08:00:00"), &ts("08:00:00")),
            arrival("A2", &ts("13:00:00"), &ts("13:00:00")),
            arrival("A3", &ts("13:00:00"), &ts("14:00:00")),
            with_status(arrival("A4", &ts("13:00:00"), &ts("13:00:00")), "cancelled"),
            with_status(arrival("A5", &ts("13:00:00"), &ts("13:00:00")), "not operating"),
            departure("D1", &ts("12:10:00"), &ts("12:20:00")),
            departure("D2", &ts("09:00:00"), &ts("09:00:00")),
        ];

        let breakdown =
            StatusBreakdown::compute(&flights, &at("12:00:00"), StatusThresholds::default());

        assert_eq!(breakdown.count(Direction::Arrival, FlightStatus::Arrived), 1);
        assert_eq!(breakdown.count(Direction::Arrival, FlightStatus::OnTime), 1);
        assert_eq!(breakdown.count(Direction::Arrival, FlightStatus::Delayed), 1);
        assert_eq!(breakdown.count(Direction::Arrival, FlightStatus::Cancelled), 1);
        assert_eq!(breakdown.count(Direction::Departure, FlightStatus::Boarding), 1);
        assert_eq!(breakdown.count(Direction::Departure, FlightStatus::Departed), 1);
        assert_eq!(breakdown.arrivals.len(), 4);
        assert_eq!(breakdown.departures.len(), 5);

        let slices = breakdown.slices(Direction::Departure);
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.count > 0));
    }

    #[test]
    fn test_breakdown_is_idempotent() {
        let flights = vec![
            arrival("A1", &ts("08:00:00"), &ts("08:45:00")),
            departure("D1", &ts("12:10:00"), &ts("12:20:00")),
        ];
        let now = at("10:00:00");
        let first = StatusBreakdown::compute(&flights, &now, StatusThresholds::default());
        let second = StatusBreakdown::compute(&flights, &now, StatusThresholds::default());
        assert_eq!(first, second);
    }
}
