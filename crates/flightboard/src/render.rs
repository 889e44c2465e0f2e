//! Text rendering for the terminal.
//!
//! Tables, the analytics digest and the calendar are built as plain strings
//! so the binary only has to print them.

use chrono::{Datelike, NaiveDate};

use crate::analytics::capacity::hour_label;
use crate::analytics::{Dashboard, TIME_WINDOWS};
use crate::board::{headers, BoardRow, Pager};
use crate::calendar::{MonthView, WEEKDAYS};
use crate::clock::IstDateTime;
use crate::flight::Direction;
use crate::status::FlightStatus;

const BOARD_DATE_FORMAT: &str = "%a, %d %b %Y";

fn status_cell(status: Option<FlightStatus>) -> &'static str {
    status.map_or("", FlightStatus::label)
}

fn cells(row: &BoardRow) -> [String; 11] {
    [
        row.flight.clone(),
        status_cell(row.status).to_string(),
        row.scheduled.joined(),
        row.flight_type.clone(),
        row.mode.clone(),
        row.passengers.clone(),
        row.estimated.joined(),
        row.resource.clone(),
        row.stand.clone(),
        row.airline.clone(),
        row.counterpart.clone(),
    ]
}

/// One tab-separated line per row, no header.
#[must_use]
pub fn board_plain(rows: &[BoardRow]) -> String {
    rows.iter()
        .map(|row| cells(row).join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// An aligned table with a title line and a page footer.
#[must_use]
pub fn board_table(
    direction: Direction,
    date: NaiveDate,
    rows: &[BoardRow],
    page: usize,
    total_pages: usize,
    now: &IstDateTime,
) -> String {
    let title = match direction {
        Direction::Arrival => "Arrivals",
        Direction::Departure => "Departures",
    };
    let mut lines = vec![format!(
        "{title} for {}    Time: {}",
        date.format(BOARD_DATE_FORMAT),
        now.format("%d/%m/%Y, %H:%M:%S")
    )];

    if rows.is_empty() {
        lines.push(format!(
            "No information available for {}",
            date.format(BOARD_DATE_FORMAT)
        ));
        return lines.join("\n");
    }

    let header: Vec<String> = headers(direction).iter().map(ToString::to_string).collect();
    let body: Vec<[String; 11]> = rows.iter().map(cells).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    lines.push(format_line(&header[..]));
    lines.push(
        widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &body {
        lines.push(format_line(&row[..]));
    }
    lines.push(format!("Page {page} of {}", total_pages.max(1)));
    lines.join("\n")
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// Human-readable digest of a [`Dashboard`].
#[must_use]
pub fn dashboard_text(dashboard: &Dashboard) -> String {
    let mut lines = Vec::new();
    let s = &dashboard.summary;

    lines.push(format!(
        "Flight dashboard at {}",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S IST")
    ));
    lines.push(String::new());
    lines.push(format!(
        "Flights: {}  Arrivals: {}  Departures: {}  Active gates: {}  Active belts: {}",
        s.total_flights, s.arrivals, s.departures, s.active_gates, s.active_belts
    ));

    lines.push(String::new());
    lines.push("[Capacity]".to_string());
    match &dashboard.capacity.peak {
        Some(peak) => lines.push(format!(
            "  Peak hour: {} ({} flights, {}% of {})",
            peak.interval, peak.total, peak.utilization_pct, dashboard.capacity.theoretical_max
        )),
        None => lines.push("  Peak hour: N/A".to_string()),
    }
    lines.push(format!(
        "  Peak arrivals: {}  Peak departures: {}",
        or_na(dashboard.capacity.peak_arrival_hour.map(hour_label)),
        or_na(dashboard.capacity.peak_departure_hour.map(hour_label)),
    ));
    for slot in dashboard.capacity.hours.iter().filter(|h| h.total > 0) {
        lines.push(format!(
            "  {}  arr {:>3}  dep {:>3}  total {:>3}  {:>3}%",
            slot.label, slot.arrivals, slot.departures, slot.total, slot.utilization_pct
        ));
    }

    lines.push(String::new());
    lines.push("[Status]".to_string());
    for (name, direction) in [
        ("Arrivals", Direction::Arrival),
        ("Departures", Direction::Departure),
    ] {
        let slices: Vec<String> = dashboard
            .statuses
            .slices(direction)
            .iter()
            .map(|c| format!("{} {}", c.status, c.count))
            .collect();
        let summary = if slices.is_empty() {
            "-".to_string()
        } else {
            slices.join(", ")
        };
        lines.push(format!("  {name}: {summary}"));
    }

    lines.push(String::new());
    lines.push("[Mode]".to_string());
    let m = &dashboard.modes;
    lines.push(format!(
        "  International: {} (arr {}, dep {})",
        m.international.total, m.international.arrivals, m.international.departures
    ));
    lines.push(format!(
        "  Domestic:      {} (arr {}, dep {})",
        m.domestic.total, m.domestic.arrivals, m.domestic.departures
    ));

    lines.push(String::new());
    lines.push("[Airlines]".to_string());
    let a = &dashboard.airlines;
    lines.push(format!(
        "  Top arrivals: {}  Top departures: {}  Top overall: {}",
        or_na(a.top_arrivals.as_ref().map(|l| format!("{} ({})", l.airline, l.flights))),
        or_na(a.top_departures.as_ref().map(|l| format!("{} ({})", l.airline, l.flights))),
        or_na(a.top_total.as_ref().map(|l| format!("{} ({})", l.airline, l.flights))),
    ));
    for airline in &a.airlines {
        lines.push(format!(
            "  {:<24} arr {:>3}  dep {:>3}",
            airline.airline, airline.counts.arrivals, airline.counts.departures
        ));
    }

    lines.push(String::new());
    lines.push("[Routes]".to_string());
    let origins: Vec<String> = dashboard
        .routes
        .top_origins
        .iter()
        .map(|r| format!("{} {}", r.airport, r.flights))
        .collect();
    let destinations: Vec<String> = dashboard
        .routes
        .top_destinations
        .iter()
        .map(|r| format!("{} {}", r.airport, r.flights))
        .collect();
    lines.push(format!("  From: {}", origins.join(", ")));
    lines.push(format!("  To:   {}", destinations.join(", ")));

    lines.push(String::new());
    lines.push("[Belts]".to_string());
    for belt in &dashboard.belts {
        lines.push(format!("  Belt {:<4} {}", belt.belt, belt.flights));
    }
    lines.push("[Gates]".to_string());
    for group in &dashboard.gates {
        let gates: Vec<String> = group.gates.iter().map(|(g, n)| format!("{g} {n}")).collect();
        lines.push(format!(
            "  Gate {:<4} {}  ({})",
            group.gate_number,
            group.flights,
            gates.join(", ")
        ));
    }

    lines.push(String::new());
    lines.push("[Stands]".to_string());
    for (name, report) in [
        ("PSTA", &dashboard.stands.psta),
        ("PSTD", &dashboard.stands.pstd),
    ] {
        let st = &report.stats;
        lines.push(format!(
            "  {name}: {} flights, average {}, median {}, most used {}, least used {}",
            st.flights,
            or_na(st.average),
            or_na(st.median),
            or_na(st.most_used),
            or_na(st.least_used)
        ));
        for range in &report.ranges {
            lines.push(format!("    {:<8} {}", range.range, range.flights));
        }
    }

    lines.push(String::new());
    lines.push("[Delays]".to_string());
    let d = &dashboard.delays;
    lines.push(format!(
        "  On time: arrivals {}% of {}, departures {}% of {}",
        d.arrival_on_time_pct,
        d.arrivals.len(),
        d.departure_on_time_pct,
        d.departures.len()
    ));
    for window in &TIME_WINDOWS {
        lines.push(format!(
            "  {}  arr {:>3}  dep {:>3}",
            window.label,
            d.in_window(Direction::Arrival, window).len(),
            d.in_window(Direction::Departure, window).len()
        ));
    }

    lines.join("\n")
}

/// Key reminder shown under the live board.
///
/// Page keys are listed only when there is a page to move to.
#[must_use]
pub fn watch_hint(pager: &Pager, rows: usize) -> String {
    let mut keys = Vec::new();
    if !pager.is_first() {
        keys.push("p prev");
    }
    if !pager.is_last(rows) {
        keys.push("n next");
    }
    keys.extend(["+/- day", "</> month", "YYYY-MM-DD", "r refresh", "q quit"]);
    format!("Keys (then Enter): {}", keys.join("  "))
}

/// A month grid: today in brackets, the selected day in asterisks.
#[must_use]
pub fn calendar_text(view: &MonthView, today: NaiveDate, selected: Option<NaiveDate>) -> String {
    let mut lines = vec![
        format!("{:^27}", view.title()),
        WEEKDAYS.map(|d| format!("{d:>3}")).join(" "),
    ];

    for week in view.grid(today, selected) {
        if week.iter().all(Option::is_none) {
            continue;
        }
        let cells: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(c) if c.is_selected => format!("*{:>2}", c.date.day()),
                Some(c) if c.is_today => format!("[{:>2}", c.date.day()),
                Some(c) => format!("{:>3}", c.date.day()),
                None => "   ".to_string(),
            })
            .collect();
        lines.push(cells.join(" ").trim_end().to_string());
    }

    lines.join("\n")
}
