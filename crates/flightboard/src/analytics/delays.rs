//! Scheduled-versus-estimated delay points for one day.

use chrono::NaiveDate;
use serde::Serialize;

use super::rounded_ratio;
use crate::clock::{format_minutes, minute_of_day};
use crate::flight::{Direction, Flight};

/// A slice of the day used to filter delay points by scheduled time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    /// e.g. `06:00 - 12:00`
    pub label: &'static str,
    /// First minute of day, inclusive.
    pub start_minute: u32,
    /// Last minute of day, exclusive.
    pub end_minute: u32,
}

impl TimeWindow {
    /// Whether `minute` falls inside the window.
    #[must_use]
    pub fn contains(&self, minute: u32) -> bool {
        (self.start_minute..self.end_minute).contains(&minute)
    }
}

/// The four six-hour windows.
pub const TIME_WINDOWS: [TimeWindow; 4] = [
    TimeWindow {
        label: "00:00 - 06:00",
        start_minute: 0,
        end_minute: 360,
    },
    TimeWindow {
        label: "06:00 - 12:00",
        start_minute: 360,
        end_minute: 720,
    },
    TimeWindow {
        label: "12:00 - 18:00",
        start_minute: 720,
        end_minute: 1080,
    },
    TimeWindow {
        label: "18:00 - 00:00",
        start_minute: 1080,
        end_minute: 1440,
    },
];

/// One flight on the delay scatter plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DelayPoint {
    /// Flight number.
    pub flight: String,
    /// Arrival or departure.
    pub direction: Direction,
    /// Carrier.
    pub airline: Option<String>,
    /// Origin for arrivals, destination for departures.
    pub counterpart: Option<String>,
    /// Scheduled minute of day.
    pub scheduled_minute: u32,
    /// Estimated minute of day.
    pub estimated_minute: u32,
    /// `HH:MM` of the schedule.
    pub scheduled_label: String,
    /// `HH:MM` of the estimate.
    pub estimated_label: String,
    /// Estimated minus scheduled. Negative when early.
    pub delay_minutes: i64,
    /// `delay_minutes` within the threshold.
    pub on_time: bool,
}

/// Delay points with on-time percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DelayReport {
    /// Day the points belong to.
    pub day: Option<NaiveDate>,
    /// Arrival points in input order.
    pub arrivals: Vec<DelayPoint>,
    /// Departure points in input order.
    pub departures: Vec<DelayPoint>,
    /// Rounded share of arrivals on time, 0 when there are none.
    pub arrival_on_time_pct: u32,
    /// Rounded share of departures on time, 0 when there are none.
    pub departure_on_time_pct: u32,
}

impl DelayReport {
    /// Points of `direction` scheduled within `window`.
    #[must_use]
    pub fn in_window(&self, direction: Direction, window: &TimeWindow) -> Vec<&DelayPoint> {
        let points = match direction {
            Direction::Arrival => &self.arrivals,
            Direction::Departure => &self.departures,
        };
        points
            .iter()
            .filter(|p| window.contains(p.scheduled_minute))
            .collect()
    }
}

/// Build delay points for listed flights scheduled on `day`.
///
/// Flights missing either time, or with a time that does not parse, are left
/// out.
#[must_use]
pub fn delay_report(flights: &[Flight], day: NaiveDate, threshold_minutes: i64) -> DelayReport {
    let mut report = DelayReport {
        day: Some(day),
        ..DelayReport::default()
    };

    for flight in flights.iter().filter(|f| f.is_listed()) {
        let Some(direction) = flight.direction else {
            continue;
        };
        let (Some(scheduled), Some(estimated)) = (flight.scheduled_time(), flight.estimated_time())
        else {
            continue;
        };
        if scheduled.date_naive() != day {
            continue;
        }

        let delay_minutes = (estimated - scheduled).num_minutes();
        let point = DelayPoint {
            flight: flight.flight.clone(),
            direction,
            airline: flight.airline.clone(),
            counterpart: flight.counterpart().map(str::to_string),
            scheduled_minute: minute_of_day(&scheduled),
            estimated_minute: minute_of_day(&estimated),
            scheduled_label: format_minutes(minute_of_day(&scheduled)),
            estimated_label: format_minutes(minute_of_day(&estimated)),
            delay_minutes,
            on_time: delay_minutes <= threshold_minutes,
        };
        match direction {
            Direction::Arrival => report.arrivals.push(point),
            Direction::Departure => report.departures.push(point),
        }
    }

    report.arrival_on_time_pct = on_time_pct(&report.arrivals);
    report.departure_on_time_pct = on_time_pct(&report.departures);
    report
}

fn on_time_pct(points: &[DelayPoint]) -> u32 {
    if points.is_empty() {
        return 0;
    }
    let on_time = points.iter().filter(|p| p.on_time).count() as u64;
    u32::try_from(rounded_ratio(on_time * 100, points.len() as u64)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::fixtures::{arrival, departure, with_status};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_points_and_on_time_share() {
        let flights = vec![
            arrival("A1", "2026-10-19T07:00:00", "2026-10-19T07:30:00"),
            arrival("A2", "2026-10-19T08:00:00", "2026-10-19T08:31:00"),
            arrival("A3", "2026-10-19T13:00:00", "2026-10-19T12:50:00"),
            departure("D1", "2026-10-19T19:00:00", "2026-10-19T20:00:00"),
        ];

        let report = delay_report(&flights, day(), 30);
        assert_eq!(report.arrivals.len(), 3);
        assert_eq!(report.departures.len(), 1);

        let a1 = &report.arrivals[0];
        assert_eq!(a1.scheduled_minute, 420);
        assert_eq!(a1.estimated_minute, 450);
        assert_eq!(a1.scheduled_label, "07:00");
        assert_eq!(a1.delay_minutes, 30);
        assert!(a1.on_time);

        assert!(!report.arrivals[1].on_time);
        assert_eq!(report.arrivals[2].delay_minutes, -10);
        assert!(report.arrivals[2].on_time);

        // 2 of 3
        assert_eq!(report.arrival_on_time_pct, 67);
        assert_eq!(report.departure_on_time_pct, 0);
    }

    #[test]
    fn test_other_days_and_unlisted_are_skipped() {
        let flights = vec![
            arrival("A1", "2026-10-20T07:00:00", "2026-10-20T07:00:00"),
            with_status(arrival("A2", "2026-10-19T07:00:00", "2026-10-19T07:00:00"), "not operating"),
            arrival("A3", "2026-10-19T07:00:00", "-"),
        ];
        let report = delay_report(&flights, day(), 30);
        assert!(report.arrivals.is_empty());
        assert_eq!(report.arrival_on_time_pct, 0);
    }

    #[test]
    fn test_window_filter() {
        let flights = vec![
            arrival("A1", "2026-10-19T05:59:00", "2026-10-19T06:10:00"),
            arrival("A2", "2026-10-19T06:00:00", "2026-10-19T06:00:00"),
            arrival("A3", "2026-10-19T23:59:00", "2026-10-19T23:59:00"),
        ];
        let report = delay_report(&flights, day(), 30);

        let early = report.in_window(Direction::Arrival, &TIME_WINDOWS[0]);
        assert_eq!(early.len(), 1);
        assert_eq!(early[0].flight, "A1");

        let morning = report.in_window(Direction::Arrival, &TIME_WINDOWS[1]);
        assert_eq!(morning.len(), 1);
        assert_eq!(morning[0].flight, "A2");

        assert_eq!(report.in_window(Direction::Arrival, &TIME_WINDOWS[3]).len(), 1);
        assert!(report.in_window(Direction::Departure, &TIME_WINDOWS[3]).is_empty());
    }

    #[test]
    fn test_delay_crossing_midnight() {
        let flights = vec![departure("D1", "2026-10-19T23:50:00", "2026-10-20T00:20:00")];
        let report = delay_report(&flights, day(), 30);
        let point = &report.departures[0];
        assert_eq!(point.delay_minutes, 30);
        assert_eq!(point.estimated_minute, 20);
        assert!(point.on_time);
    }
}
