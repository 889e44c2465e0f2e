//! Parking stand analytics for PSTA (arrivals) and PSTD (departures).
//!
//! Only stands 1–80 and 201–220 exist at the airport. Anything else the
//! backend sends, including non-numeric values, is left out of every figure
//! here.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use serde::Serialize;

use super::rounded_ratio;
use crate::flight::{Direction, Flight};

/// Stand numbers that exist.
pub const VALID_STANDS: [RangeInclusive<u32>; 2] = [1..=80, 201..=220];

/// Width of a range bucket.
const BUCKET_WIDTH: u32 = 10;

/// Whether `stand` is a real stand number.
#[must_use]
pub fn is_valid_stand(stand: u32) -> bool {
    VALID_STANDS.iter().any(|r| r.contains(&stand))
}

/// First stand of the ten-stand bucket holding `stand`: 1, 11, ... 71, 201, 211.
#[must_use]
pub fn range_start(stand: u32) -> u32 {
    stand.div_ceil(BUCKET_WIDTH) * BUCKET_WIDTH - (BUCKET_WIDTH - 1)
}

/// `1-10`, `201-210`, ...
#[must_use]
pub fn range_label(start: u32) -> String {
    format!("{}-{}", start, start + BUCKET_WIDTH - 1)
}

/// Flights parked within one ten-stand range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandRange {
    /// e.g. `11-20`
    pub range: String,
    /// Flights in the range.
    pub flights: usize,
    /// Flights per stand.
    pub stands: BTreeMap<u32, usize>,
}

/// Summary figures over valid stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StandStats {
    /// Flights with a valid stand.
    pub flights: usize,
    /// Rounded mean stand number.
    pub average: Option<u32>,
    /// Median stand number; the rounded mean of the middle pair for even counts.
    pub median: Option<u32>,
    /// Stand with the most flights, lowest number on ties.
    pub most_used: Option<u32>,
    /// Stand with the fewest flights, lowest number on ties.
    pub least_used: Option<u32>,
}

/// Range buckets and statistics for one kind of stand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandReport {
    /// Non-empty ranges in stand order.
    pub ranges: Vec<StandRange>,
    /// Summary figures.
    pub stats: StandStats,
}

/// Stand reports for arrivals and departures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StandAnalysis {
    /// Arrival stands.
    pub psta: StandReport,
    /// Departure stands.
    pub pstd: StandReport,
}

/// Build PSTA and PSTD reports from listed flights.
#[must_use]
pub fn stand_analysis(flights: &[Flight]) -> StandAnalysis {
    StandAnalysis {
        psta: stand_report(&stands_for(flights, Direction::Arrival)),
        pstd: stand_report(&stands_for(flights, Direction::Departure)),
    }
}

fn stands_for(flights: &[Flight], direction: Direction) -> Vec<u32> {
    flights
        .iter()
        .filter(|f| f.is_listed() && f.direction == Some(direction))
        .filter_map(|f| f.stand.assigned())
        .filter_map(|s| s.parse::<u32>().ok())
        .filter(|&s| is_valid_stand(s))
        .collect()
}

/// Bucket and summarize a list of valid stand numbers.
#[must_use]
pub fn stand_report(stands: &[u32]) -> StandReport {
    let mut per_stand: BTreeMap<u32, usize> = BTreeMap::new();
    for &stand in stands {
        *per_stand.entry(stand).or_default() += 1;
    }

    let mut ranges: BTreeMap<u32, StandRange> = BTreeMap::new();
    for (&stand, &count) in &per_stand {
        let start = range_start(stand);
        let range = ranges.entry(start).or_insert_with(|| StandRange {
            range: range_label(start),
            flights: 0,
            stands: BTreeMap::new(),
        });
        range.flights += count;
        range.stands.insert(stand, count);
    }

    let mut most_used: Option<(u32, usize)> = None;
    let mut least_used: Option<(u32, usize)> = None;
    for (&stand, &count) in &per_stand {
        if most_used.map_or(true, |(_, max)| count > max) {
            most_used = Some((stand, count));
        }
        if least_used.map_or(true, |(_, min)| count < min) {
            least_used = Some((stand, count));
        }
    }

    let sum: u64 = stands.iter().map(|&s| u64::from(s)).sum();
    let average = (!stands.is_empty())
        .then(|| rounded_ratio(sum, stands.len() as u64))
        .and_then(|avg| u32::try_from(avg).ok());

    StandReport {
        ranges: ranges.into_values().collect(),
        stats: StandStats {
            flights: stands.len(),
            average,
            median: median(stands),
            most_used: most_used.map(|(stand, _)| stand),
            least_used: least_used.map(|(stand, _)| stand),
        },
    }
}

/// Median, rounding the mean of the middle pair half up.
#[must_use]
pub fn median(values: &[u32]) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]).div_ceil(2))
    }
}
