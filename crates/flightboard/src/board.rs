//! Paginated arrival and departure tables.
//!
//! [`Pager`] holds the 1-based page the board is showing and implements both
//! manual navigation and the auto-cycle step. [`BoardRow`] is one formatted
//! table row.

use serde::Serialize;

use crate::clock::{format_board_date, format_board_time, parse_timestamp, IstDateTime};
use crate::flight::{Direction, Flight, Slot, PLACEHOLDER};
use crate::status::{classify, FlightStatus, StatusThresholds};

/// Page position within a table of listed flights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    current: usize,
}

impl Pager {
    /// A pager on page 1. A zero page size is treated as 1.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    /// The 1-based current page.
    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of pages needed for `rows` rows; 0 for an empty table.
    #[must_use]
    pub fn total_pages(&self, rows: usize) -> usize {
        rows.div_ceil(self.page_size)
    }

    fn last_page(&self, rows: usize) -> usize {
        self.total_pages(rows).max(1)
    }

    /// Jump to page 1.
    pub fn first(&mut self) {
        self.current = 1;
    }

    /// Step back one page, stopping at 1.
    pub fn previous(&mut self) {
        self.current = self.current.saturating_sub(1).max(1);
    }

    /// Step forward one page, stopping at the last.
    pub fn next(&mut self, rows: usize) {
        self.current = (self.current + 1).min(self.last_page(rows));
    }

    /// Jump to the last page.
    pub fn last(&mut self, rows: usize) {
        self.current = self.last_page(rows);
    }

    /// Jump to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize, rows: usize) {
        self.current = page.clamp(1, self.last_page(rows));
    }

    /// Auto-cycle step: the next page, wrapping from the last back to 1.
    pub fn advance(&mut self, rows: usize) {
        let total = self.total_pages(rows);
        self.current = if total == 0 {
            1
        } else {
            (self.current % total) + 1
        };
    }

    /// Pull the current page back into range after the data changed.
    pub fn clamp(&mut self, rows: usize) {
        self.current = self.current.clamp(1, self.last_page(rows));
    }

    /// Whether there is no earlier page.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    /// Whether there is no later page.
    #[must_use]
    pub fn is_last(&self, rows: usize) -> bool {
        self.current >= self.last_page(rows)
    }

    /// Listed flights on the current page.
    #[must_use]
    pub fn page_rows<'a>(&self, flights: &'a [Flight]) -> Vec<&'a Flight> {
        flights
            .iter()
            .filter(|f| f.is_listed())
            .skip((self.current - 1) * self.page_size)
            .take(self.page_size)
            .collect()
    }
}

/// Count of flights a table shows.
#[must_use]
pub fn listed_count(flights: &[Flight]) -> usize {
    flights.iter().filter(|f| f.is_listed()).count()
}

/// A date and time pair as shown in one table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimeCell {
    /// `Mon, 19 Oct 2026`, `-` for a placeholder, or the raw text if unparsable.
    pub date: String,
    /// `14:05:00`, or empty.
    pub time: String,
}

impl TimeCell {
    fn from_slot(slot: &Slot) -> Self {
        match slot {
            Slot::Assigned(raw) => match parse_timestamp(raw) {
                Some(dt) => Self::from_datetime(&dt),
                None => Self {
                    date: raw.clone(),
                    time: String::new(),
                },
            },
            Slot::Placeholder => Self {
                date: PLACEHOLDER.to_string(),
                time: String::new(),
            },
            Slot::Absent => Self::default(),
        }
    }

    fn from_datetime(dt: &IstDateTime) -> Self {
        Self {
            date: format_board_date(dt),
            time: format_board_time(dt),
        }
    }

    /// Single-line rendering.
    #[must_use]
    pub fn joined(&self) -> String {
        if self.time.is_empty() {
            self.date.clone()
        } else {
            format!("{} {}", self.date, self.time)
        }
    }
}

/// One row of the arrivals or departures table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardRow {
    /// Flight number.
    pub flight: String,
    /// Status badge, if any.
    pub status: Option<FlightStatus>,
    /// STOA or STOD.
    pub scheduled: TimeCell,
    /// `ARR` or `DEP`.
    pub flight_type: String,
    /// `INT`, `DOM` or whatever was sent.
    pub mode: String,
    /// Passenger count or `-`.
    pub passengers: String,
    /// ETOA or ETOD.
    pub estimated: TimeCell,
    /// Belt for arrivals, gate for departures.
    pub resource: String,
    /// PSTA or PSTD.
    pub stand: String,
    /// Carrier.
    pub airline: String,
    /// Origin for arrivals, destination for departures.
    pub counterpart: String,
}

impl BoardRow {
    /// Format `flight` for display at `now`.
    #[must_use]
    pub fn new(flight: &Flight, now: &IstDateTime, thresholds: StatusThresholds) -> Self {
        let resource = match flight.direction {
            Some(Direction::Arrival) => &flight.belt,
            Some(Direction::Departure) => &flight.gate,
            None => &Slot::Absent,
        };

        Self {
            flight: flight.flight.clone(),
            status: classify(flight, now, thresholds),
            scheduled: TimeCell::from_slot(&flight.scheduled),
            flight_type: flight.direction.map(|d| d.to_string()).unwrap_or_default(),
            mode: flight.mode.as_ref().map(ToString::to_string).unwrap_or_default(),
            passengers: flight.passengers.display().to_string(),
            estimated: TimeCell::from_slot(&flight.estimated),
            resource: resource.display().to_string(),
            stand: flight.stand.display().to_string(),
            airline: flight.airline.clone().unwrap_or_default(),
            counterpart: flight.counterpart().unwrap_or_default().to_string(),
        }
    }
}

/// Column headers for a table of `direction` rows.
#[must_use]
pub fn headers(direction: Direction) -> [&'static str; 11] {
    match direction {
        Direction::Arrival => [
            "Flight", "Status", "STOA", "Type", "Mode", "Passengers", "ETOA", "Belt", "PSTA",
            "Airline", "Origin",
        ],
        Direction::Departure => [
            "Flight", "Status", "STOD", "Type", "Mode", "Passengers", "ETOD", "Gate", "PSTD",
            "Airline", "Destination",
        ],
    }
}

/// Rows of the current page, formatted at `now`.
#[must_use]
pub fn page(
    pager: &Pager,
    flights: &[Flight],
    now: &IstDateTime,
    thresholds: StatusThresholds,
) -> Vec<BoardRow> {
    pager
        .page_rows(flights)
        .into_iter()
        .map(|flight| BoardRow::new(flight, now, thresholds))
        .collect()
}
