//! Belt and gate utilization, and the dashboard summary counters.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::flight::{Direction, Flight};

/// Flights assigned to one baggage belt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BeltUsage {
    /// Belt number as sent by the backend.
    pub belt: String,
    /// Number of flights.
    pub flights: usize,
}

/// Count flights per assigned belt, in numeric belt order.
#[must_use]
pub fn belt_usage(flights: &[Flight]) -> Vec<BeltUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for flight in flights.iter().filter(|f| f.is_listed()) {
        if let Some(belt) = flight.belt.assigned() {
            *counts.entry(belt).or_default() += 1;
        }
    }

    let mut usage: Vec<BeltUsage> = counts
        .into_iter()
        .map(|(belt, flights)| BeltUsage {
            belt: belt.to_string(),
            flights,
        })
        .collect();
    usage.sort_by(|a, b| numeric_order(&a.belt, &b.belt));
    usage
}

/// Flights at one numeric gate group, e.g. `12` for gates `12A` and `12B`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateGroup {
    /// Gate code with letters removed.
    pub gate_number: String,
    /// Flights across the group.
    pub flights: usize,
    /// Flights per original gate code.
    pub gates: BTreeMap<String, usize>,
}

/// Gate code with every ASCII letter removed, or `None` if nothing is left.
#[must_use]
pub fn gate_number(code: &str) -> Option<String> {
    static LETTERS: OnceLock<Regex> = OnceLock::new();
    let letters = LETTERS.get_or_init(|| Regex::new(r"[A-Za-z]").expect("Invalid regex pattern"));

    let stripped = letters.replace_all(code, "");
    let trimmed = stripped.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Group departures by gate number, in numeric order.
#[must_use]
pub fn gate_usage(flights: &[Flight]) -> Vec<GateGroup> {
    let mut groups: HashMap<String, GateGroup> = HashMap::new();

    for flight in flights
        .iter()
        .filter(|f| f.is_listed() && f.is_departure())
    {
        let Some(code) = flight.gate.assigned() else {
            continue;
        };
        let Some(number) = gate_number(code) else {
            continue;
        };
        let group = groups.entry(number.clone()).or_insert_with(|| GateGroup {
            gate_number: number,
            flights: 0,
            gates: BTreeMap::new(),
        });
        group.flights += 1;
        *group.gates.entry(code.to_string()).or_default() += 1;
    }

    let mut groups: Vec<GateGroup> = groups.into_values().collect();
    groups.sort_by(|a, b| numeric_order(&a.gate_number, &b.gate_number));
    groups
}

/// Numbers first in ascending order, then anything else lexically.
fn numeric_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Headline counters for the dashboard cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    /// Listed flights.
    pub total_flights: usize,
    /// Listed arrivals.
    pub arrivals: usize,
    /// Listed departures.
    pub departures: usize,
    /// Distinct gates with a departure assigned.
    pub active_gates: usize,
    /// Distinct belts with an arrival assigned.
    pub active_belts: usize,
}

/// Count listed flights and the distinct gates and belts in use.
#[must_use]
pub fn board_summary(flights: &[Flight]) -> BoardSummary {
    let mut summary = BoardSummary::default();
    let mut gates = BTreeSet::new();
    let mut belts = BTreeSet::new();

    for flight in flights.iter().filter(|f| f.is_listed()) {
        summary.total_flights += 1;
        match flight.direction {
            Some(Direction::Arrival) => {
                summary.arrivals += 1;
                if let Some(belt) = flight.belt.assigned() {
                    belts.insert(belt);
                }
            }
            Some(Direction::Departure) => {
                summary.departures += 1;
                if let Some(gate) = flight.gate.assigned() {
                    gates.insert(gate);
                }
            }
            None => {}
        }
    }

    summary.active_gates = gates.len();
    summary.active_belts = belts.len();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::fixtures::{arrival, departure, with_status};
    use crate::flight::Slot;

    const T: &str = "2026-10-19T10:00:00";

    fn at_gate(gate: &str) -> Flight {
        let mut flight = departure("D", T, T);
        flight.gate = Slot::from_str_value(gate);
        flight
    }

    fn on_belt(belt: &str) -> Flight {
        let mut flight = arrival("A", T, T);
        flight.belt = Slot::from_str_value(belt);
        flight
    }

    #[test]
    fn test_gate_number_strips_letters() {
        assert_eq!(gate_number("12A").as_deref(), Some("12"));
        assert_eq!(gate_number("B 7").as_deref(), Some("7"));
        assert_eq!(gate_number("ABC"), None);
        assert_eq!(gate_number(""), None);
    }

    #[test]
    fn test_gates_grouped_by_number() {
        let flights = vec![at_gate("12A"), at_gate("12B"), at_gate("3"), at_gate("C")];

        let groups = gate_usage(&flights);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].gate_number, "3");
        assert_eq!(groups[1].gate_number, "12");
        assert_eq!(groups[1].flights, 2);
        assert_eq!(groups[1].gates.get("12A"), Some(&1));
        assert_eq!(groups[1].gates.get("12B"), Some(&1));
    }

    #[test]
    fn test_gate_usage_ignores_arrivals_and_placeholders() {
        let mut arrival_with_gate = arrival("A", T, T);
        arrival_with_gate.gate = Slot::from_str_value("5");
        let flights = vec![
            arrival_with_gate,
            at_gate("-"),
            with_status(at_gate("9"), "not operating"),
        ];
        assert!(gate_usage(&flights).is_empty());
    }

    #[test]
    fn test_belt_usage_numeric_order() {
        let flights = vec![on_belt("10"), on_belt("2"), on_belt("2"), on_belt("X1"), on_belt("-")];

        let usage = belt_usage(&flights);
        let belts: Vec<&str> = usage.iter().map(|b| b.belt.as_str()).collect();
        assert_eq!(belts, vec!["2", "10", "X1"]);
        assert_eq!(usage[0].flights, 2);
    }

    #[test]
    fn test_board_summary() {
        let flights = vec![
            on_belt("1"),
            on_belt("1"),
            on_belt("4"),
            at_gate("12A"),
            at_gate("12B"),
            at_gate("-"),
            with_status(at_gate("20"), "not operating"),
        ];

        let summary = board_summary(&flights);
        assert_eq!(summary.total_flights, 6);
        assert_eq!(summary.arrivals, 3);
        assert_eq!(summary.departures, 3);
        assert_eq!(summary.active_belts, 2);
        assert_eq!(summary.active_gates, 2);
    }
}
