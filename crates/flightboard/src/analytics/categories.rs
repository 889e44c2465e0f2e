//! Categorical counters: service mode, airline and route popularity.

use std::collections::HashMap;

use serde::Serialize;

use crate::flight::{Direction, Flight, FlightMode};

/// Arrival/departure split of a group of flights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DirectionCounts {
    /// Arrivals.
    pub arrivals: usize,
    /// Departures.
    pub departures: usize,
    /// Both.
    pub total: usize,
}

impl DirectionCounts {
    fn add(&mut self, direction: Direction) {
        match direction {
            Direction::Arrival => self.arrivals += 1,
            Direction::Departure => self.departures += 1,
        }
        self.total += 1;
    }
}

/// International versus domestic traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeBreakdown {
    /// `INT` flights.
    pub international: DirectionCounts,
    /// Every other mode.
    pub domestic: DirectionCounts,
    /// Flights counted at all.
    pub total: usize,
}

/// Split flights by mode and direction.
///
/// Flights without a mode or a direction are not counted. Any mode other
/// than `INT` counts as domestic.
#[must_use]
pub fn mode_breakdown(flights: &[Flight]) -> ModeBreakdown {
    let mut breakdown = ModeBreakdown::default();

    for flight in flights.iter().filter(|f| f.is_listed()) {
        let (Some(mode), Some(direction)) = (&flight.mode, flight.direction) else {
            continue;
        };
        let bucket = if *mode == FlightMode::International {
            &mut breakdown.international
        } else {
            &mut breakdown.domestic
        };
        bucket.add(direction);
        breakdown.total += 1;
    }

    breakdown
}

/// Flights operated by one airline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirlineCount {
    /// Carrier name.
    pub airline: String,
    /// Per-direction counts.
    #[serde(flatten)]
    pub counts: DirectionCounts,
}

/// The airline with the most flights in some category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirlineLeader {
    /// Carrier name.
    pub airline: String,
    /// Its count.
    pub flights: usize,
}

/// Airline activity with leaders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AirlineReport {
    /// Airlines in the order they first appear.
    pub airlines: Vec<AirlineCount>,
    /// Most arrivals.
    pub top_arrivals: Option<AirlineLeader>,
    /// Most departures.
    pub top_departures: Option<AirlineLeader>,
    /// Most flights overall.
    pub top_total: Option<AirlineLeader>,
}

/// Count flights per airline and direction.
#[must_use]
pub fn airline_report(flights: &[Flight]) -> AirlineReport {
    let mut airlines: Vec<AirlineCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for flight in flights.iter().filter(|f| f.is_listed()) {
        let Some(name) = flight.airline.as_deref() else {
            continue;
        };
        let i = *index.entry(name).or_insert_with(|| {
            airlines.push(AirlineCount {
                airline: name.to_string(),
                counts: DirectionCounts::default(),
            });
            airlines.len() - 1
        });
        if let Some(direction) = flight.direction {
            airlines[i].counts.add(direction);
        }
    }

    let top_arrivals = leader(&airlines, |c| c.arrivals);
    let top_departures = leader(&airlines, |c| c.departures);
    let top_total = leader(&airlines, |c| c.total);

    AirlineReport {
        airlines,
        top_arrivals,
        top_departures,
        top_total,
    }
}

/// First airline with the strictly greatest non-zero count.
fn leader(
    airlines: &[AirlineCount],
    count: impl Fn(&DirectionCounts) -> usize,
) -> Option<AirlineLeader> {
    let mut best: Option<&AirlineCount> = None;
    let mut max = 0;
    for entry in airlines {
        let n = count(&entry.counts);
        if n > max {
            max = n;
            best = Some(entry);
        }
    }
    best.map(|entry| AirlineLeader {
        airline: entry.airline.clone(),
        flights: max,
    })
}

/// Flights to or from one airport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCount {
    /// Airport code.
    pub airport: String,
    /// Number of flights.
    pub flights: usize,
}

/// Most frequent origins and destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteReport {
    /// Origins of arrivals, most frequent first.
    pub top_origins: Vec<RouteCount>,
    /// Destinations of departures, most frequent first.
    pub top_destinations: Vec<RouteCount>,
}

/// Rank origins (arrivals) and destinations (departures), keeping `limit` of each.
///
/// Equal counts are ordered by airport code.
#[must_use]
pub fn top_routes(flights: &[Flight], limit: usize) -> RouteReport {
    let mut origins: HashMap<&str, usize> = HashMap::new();
    let mut destinations: HashMap<&str, usize> = HashMap::new();

    for flight in flights.iter().filter(|f| f.is_listed()) {
        match (flight.direction, flight.counterpart()) {
            (Some(Direction::Arrival), Some(origin)) => *origins.entry(origin).or_default() += 1,
            (Some(Direction::Departure), Some(destination)) => {
                *destinations.entry(destination).or_default() += 1;
            }
            _ => {}
        }
    }

    RouteReport {
        top_origins: ranked(origins, limit),
        top_destinations: ranked(destinations, limit),
    }
}

fn ranked(counts: HashMap<&str, usize>, limit: usize) -> Vec<RouteCount> {
    let mut ranked: Vec<RouteCount> = counts
        .into_iter()
        .map(|(airport, flights)| RouteCount {
            airport: airport.to_string(),
            flights,
        })
        .collect();
    ranked.sort_by(|a, b| b.flights.cmp(&a.flights).then_with(|| a.airport.cmp(&b.airport)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::fixtures::{arrival, departure, with_status};

    const T: &str = "2026-10-19T10:00:00";

    fn arr(airline: &str, origin: &str, mode: FlightMode) -> Flight {
        let mut flight = arrival("A", T, T);
        flight.airline = Some(airline.to_string());
        flight.origin = Some(origin.to_string());
        flight.mode = Some(mode);
        flight
    }

    fn dep(airline: &str, destination: &str, mode: FlightMode) -> Flight {
        let mut flight = departure("D", T, T);
        flight.airline = Some(airline.to_string());
        flight.destination = Some(destination.to_string());
        flight.mode = Some(mode);
        flight
    }

    #[test]
    fn test_mode_breakdown() {
        let mut no_mode = arr("IndiGo", "BLR", FlightMode::Domestic);
        no_mode.mode = None;
        let flights = vec![
            arr("Air India", "DXB", FlightMode::International),
            dep("Air India", "LHR", FlightMode::International),
            dep("Emirates", "DXB", FlightMode::International),
            arr("IndiGo", "BLR", FlightMode::Domestic),
            dep("IndiGo", "BOM", FlightMode::Other("CHT".to_string())),
            no_mode,
        ];

        let breakdown = mode_breakdown(&flights);
        assert_eq!(breakdown.total, 5);
        assert_eq!(breakdown.international.arrivals, 1);
        assert_eq!(breakdown.international.departures, 2);
        assert_eq!(breakdown.international.total, 3);
        assert_eq!(breakdown.domestic.arrivals, 1);
        assert_eq!(breakdown.domestic.departures, 1);
    }

    #[test]
    fn test_airline_report_order_and_leaders() {
        let flights = vec![
            arr("IndiGo", "BLR", FlightMode::Domestic),
            dep("Vistara", "BOM", FlightMode::Domestic),
            dep("Vistara", "MAA", FlightMode::Domestic),
            arr("Vistara", "CCU", FlightMode::Domestic),
            arr("IndiGo", "HYD", FlightMode::Domestic),
            with_status(dep("IndiGo", "GOI", FlightMode::Domestic), "not operating"),
        ];

        let report = airline_report(&flights);
        let names: Vec<&str> = report.airlines.iter().map(|a| a.airline.as_str()).collect();
        assert_eq!(names, vec!["IndiGo", "Vistara"]);
        assert_eq!(report.airlines[0].counts.departures, 0);

        assert_eq!(report.top_arrivals.unwrap().airline, "IndiGo");
        assert_eq!(report.top_departures.unwrap().airline, "Vistara");
        // The not-operating IndiGo departure is ignored
        let total = report.top_total.unwrap();
        assert_eq!(total.airline, "Vistara");
        assert_eq!(total.flights, 3);
    }

    #[test]
    fn test_airline_leader_first_wins_tie() {
        let flights = vec![
            arr("IndiGo", "BLR", FlightMode::Domestic),
            arr("SpiceJet", "BLR", FlightMode::Domestic),
        ];
        assert_eq!(airline_report(&flights).top_arrivals.unwrap().airline, "IndiGo");
    }

    #[test]
    fn test_top_routes() {
        let flights = vec![
            arr("X", "BLR", FlightMode::Domestic),
            arr("X", "DEL", FlightMode::Domestic),
            arr("X", "BLR", FlightMode::Domestic),
            arr("X", "AMD", FlightMode::Domestic),
            dep("X", "DXB", FlightMode::International),
        ];

        let routes = top_routes(&flights, 2);
        assert_eq!(routes.top_origins.len(), 2);
        assert_eq!(routes.top_origins[0].airport, "BLR");
        assert_eq!(routes.top_origins[0].flights, 2);
        // AMD and DEL tie at 1; code order decides
        assert_eq!(routes.top_origins[1].airport, "AMD");
        assert_eq!(routes.top_destinations[0].airport, "DXB");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mode_breakdown(&[]), ModeBreakdown::default());
        assert_eq!(airline_report(&[]), AirlineReport::default());
        assert_eq!(top_routes(&[], 10), RouteReport::default());
    }
}
