//! Aggregates behind the dashboard charts.
//!
//! Every function here is a pure transform over a slice of [`Flight`]s.
//! Flights that are not listed are ignored, and fields that are missing or
//! malformed only drop the flight from the aggregate that needed them.

pub mod capacity;
pub mod categories;
pub mod delays;
pub mod resources;
pub mod stands;

use chrono::NaiveDate;
use serde::Serialize;

use crate::clock::IstDateTime;
use crate::config::AnalyticsConfig;
use crate::flight::Flight;
use crate::status::StatusBreakdown;

pub use capacity::{hourly_capacity, CapacityReport, HourSlot, PeakHour};
pub use categories::{
    airline_report, mode_breakdown, top_routes, AirlineReport, ModeBreakdown, RouteReport,
};
pub use delays::{delay_report, DelayPoint, DelayReport, TimeWindow, TIME_WINDOWS};
pub use resources::{
    belt_usage, board_summary, gate_usage, BeltUsage, BoardSummary, GateGroup,
};
pub use stands::{stand_analysis, StandAnalysis, StandReport, StandStats};

/// `n / d` rounded half up. `d` must be non-zero.
pub(crate) fn rounded_ratio(n: u64, d: u64) -> u64 {
    (2 * n + d) / (2 * d)
}

/// Every aggregate for one dataset at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    /// The `now` the snapshot was computed at.
    pub generated_at: IstDateTime,
    /// Headline counters.
    pub summary: BoardSummary,
    /// Hourly traffic and peaks.
    pub capacity: CapacityReport,
    /// Status pie charts.
    pub statuses: StatusBreakdown,
    /// International versus domestic.
    pub modes: ModeBreakdown,
    /// Airline activity.
    pub airlines: AirlineReport,
    /// Popular origins and destinations.
    pub routes: RouteReport,
    /// Baggage belt usage.
    pub belts: Vec<BeltUsage>,
    /// Gate usage by gate number.
    pub gates: Vec<GateGroup>,
    /// Parking stand usage.
    pub stands: StandAnalysis,
    /// Delay scatter for the day of `generated_at`.
    pub delays: DelayReport,
}

impl Dashboard {
    /// Compute every aggregate over `flights` at `now`, with delays for today.
    #[must_use]
    pub fn compute(flights: &[Flight], now: &IstDateTime, config: &AnalyticsConfig) -> Self {
        Self::compute_for_day(flights, now.date_naive(), now, config)
    }

    /// Like [`compute`](Self::compute), but the delay scatter covers `day`.
    #[must_use]
    pub fn compute_for_day(
        flights: &[Flight],
        day: NaiveDate,
        now: &IstDateTime,
        config: &AnalyticsConfig,
    ) -> Self {
        Self {
            generated_at: *now,
            summary: board_summary(flights),
            capacity: hourly_capacity(flights, config.theoretical_max_capacity),
            statuses: StatusBreakdown::compute(flights, now, config.status_thresholds()),
            modes: mode_breakdown(flights),
            airlines: airline_report(flights),
            routes: top_routes(flights, config.top_routes),
            belts: belt_usage(flights),
            gates: gate_usage(flights),
            stands: stand_analysis(flights),
            delays: delay_report(flights, day, config.delay_threshold_minutes),
        }
    }
}
