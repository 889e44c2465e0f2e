//! Hourly capacity and peak-hour detection.
//!
//! Flights are bucketed by the IST hour of their estimated time (ETOA for
//! arrivals, ETOD for departures). Rows without an estimate, including
//! future rows carrying the `-` placeholder, are skipped quietly; estimates
//! that are present but unparsable are skipped with a warning.

use chrono::Timelike;
use serde::Serialize;
use tracing::warn;

use super::rounded_ratio;
use crate::flight::{Direction, Flight, Slot};

/// Number of hourly buckets.
pub const HOURS_PER_DAY: u32 = 24;

/// Traffic in one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourSlot {
    /// Hour of day, 0–23.
    pub hour: u32,
    /// `HH:00`
    pub label: String,
    /// Arrivals estimated in this hour.
    pub arrivals: u32,
    /// Departures estimated in this hour.
    pub departures: u32,
    /// Arrivals plus departures.
    pub total: u32,
    /// `total` as a percentage of the theoretical maximum, capped at 100.
    pub utilization_pct: u32,
}

/// The busiest hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakHour {
    /// Hour of day.
    pub hour: u32,
    /// `HH:00 - HH:00`
    pub interval: String,
    /// Flights in that hour.
    pub total: u32,
    /// Utilization in that hour.
    pub utilization_pct: u32,
}

/// Hourly traffic with peaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    /// Flights per hour treated as full utilization.
    pub theoretical_max: u32,
    /// All 24 hours, in order.
    pub hours: Vec<HourSlot>,
    /// Busiest hour by combined total. `None` when there are no flights.
    pub peak: Option<PeakHour>,
    /// Busiest hour for arrivals alone.
    pub peak_arrival_hour: Option<u32>,
    /// Busiest hour for departures alone.
    pub peak_departure_hour: Option<u32>,
}

impl CapacityReport {
    /// The slot for `hour`.
    #[must_use]
    pub fn hour(&self, hour: u32) -> Option<&HourSlot> {
        self.hours.get(hour as usize)
    }
}

/// `HH:00`
#[must_use]
pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// `HH:00 - HH:00` for the hour starting at `hour`.
#[must_use]
pub fn interval_label(hour: u32) -> String {
    format!("{} - {}", hour_label(hour), hour_label((hour + 1) % HOURS_PER_DAY))
}

/// Percentage of `max` used by `total`, rounded half up and capped at 100.
#[must_use]
pub fn utilization_pct(total: u32, max: u32) -> u32 {
    if max == 0 {
        return 100;
    }
    let pct = rounded_ratio(u64::from(total) * 100, u64::from(max));
    u32::try_from(pct.min(100)).unwrap_or(100)
}

/// Bucket listed flights by estimated hour.
#[must_use]
pub fn hourly_capacity(flights: &[Flight], theoretical_max: u32) -> CapacityReport {
    let mut hours: Vec<HourSlot> = (0..HOURS_PER_DAY)
        .map(|hour| HourSlot {
            hour,
            label: hour_label(hour),
            arrivals: 0,
            departures: 0,
            total: 0,
            utilization_pct: 0,
        })
        .collect();

    for flight in flights.iter().filter(|f| f.is_listed()) {
        let Some(direction) = flight.direction else {
            continue;
        };
        let Slot::Assigned(raw) = &flight.estimated else {
            continue;
        };
        let Some(estimated) = flight.estimated_time() else {
            warn!(flight = %flight.flight, estimated = %raw, "skipping flight with invalid estimated time");
            continue;
        };

        let slot = &mut hours[estimated.hour() as usize];
        match direction {
            Direction::Arrival => slot.arrivals += 1,
            Direction::Departure => slot.departures += 1,
        }
        slot.total += 1;
    }

    for slot in &mut hours {
        slot.utilization_pct = utilization_pct(slot.total, theoretical_max);
    }

    let peak = busiest(&hours, |s| s.total).map(|hour| {
        let slot = &hours[hour as usize];
        PeakHour {
            hour,
            interval: interval_label(hour),
            total: slot.total,
            utilization_pct: slot.utilization_pct,
        }
    });
    let peak_arrival_hour = busiest(&hours, |s| s.arrivals);
    let peak_departure_hour = busiest(&hours, |s| s.departures);

    CapacityReport {
        theoretical_max,
        hours,
        peak,
        peak_arrival_hour,
        peak_departure_hour,
    }
}

/// First hour with the strictly greatest non-zero value.
fn busiest(hours: &[HourSlot], value: impl Fn(&HourSlot) -> u32) -> Option<u32> {
    let mut best: Option<(u32, u32)> = None;
    for slot in hours {
        let v = value(slot);
        if v > best.map_or(0, |(_, max)| max) {
            best = Some((slot.hour, v));
        }
    }
    best.map(|(hour, _)| hour)
}
