//! Flight records as served by the backend, and their canonical form.
//!
//! The backend schema is loose: numbers arrive as strings or floats, missing
//! values are `null`, `""` or `"-"`, and some columns go by several names.
//! [`RawFlight`] accepts all of that; [`Flight`] is what the rest of the crate
//! works with. Every fallback chain is resolved here, once.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::clock::{parse_timestamp, IstDateTime};

/// Marker the backend uses for "not yet assigned".
pub const PLACEHOLDER: &str = "-";

/// A flight row exactly as the backend sends it.
///
/// Every field is optional and loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawFlight {
    pub flight: Option<Value>,
    pub flight_type: Option<Value>,
    pub flight_mode: Option<Value>,
    pub operational_status: Option<Value>,
    pub stoa: Option<Value>,
    pub etoa: Option<Value>,
    pub stod: Option<Value>,
    pub etod: Option<Value>,
    pub origin: Option<Value>,
    pub destination: Option<Value>,
    pub airline: Option<Value>,
    pub arrival_belt_no: Option<Value>,
    pub dep_boarding_gate_no: Option<Value>,
    pub departure_gate: Option<Value>,
    pub psta: Option<Value>,
    pub pstd: Option<Value>,
    pub passenger_stand_time_departure: Option<Value>,
    #[serde(rename = "PSTD")]
    pub pstd_upper: Option<Value>,
    pub number_of_passenger: Option<Value>,
    pub passengers: Option<Value>,
}

/// An optional, assignable field such as a belt, gate, stand or estimate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Slot {
    /// A real value.
    Assigned(String),
    /// The backend sent `-`: known to be unassigned for now.
    Placeholder,
    /// The field was missing, null or empty.
    #[default]
    Absent,
}

impl Slot {
    /// Build a slot from a loosely typed JSON value.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        match value.and_then(value_to_string) {
            None => Self::Absent,
            Some(s) if s == PLACEHOLDER => Self::Placeholder,
            Some(s) => Self::Assigned(s),
        }
    }

    /// Build a slot from a string.
    #[cfg(test)]
    pub(crate) fn from_str_value(value: &str) -> Self {
        Self::from_value(Some(&Value::String(value.to_string())))
    }

    /// Use `other` only when this slot is absent. A placeholder is kept.
    #[must_use]
    pub fn or(self, other: Slot) -> Slot {
        match self {
            Self::Absent => other,
            assigned_or_placeholder => assigned_or_placeholder,
        }
    }

    /// The assigned value, if any.
    #[must_use]
    pub fn assigned(&self) -> Option<&str> {
        match self {
            Self::Assigned(s) => Some(s),
            Self::Placeholder | Self::Absent => None,
        }
    }

    /// Text for a table cell.
    #[must_use]
    pub fn display(&self) -> &str {
        match self {
            Self::Assigned(s) => s,
            Self::Placeholder => PLACEHOLDER,
            Self::Absent => "",
        }
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Assigned(s) => serializer.serialize_str(s),
            Self::Placeholder => serializer.serialize_str(PLACEHOLDER),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

/// Render a JSON scalar as text, treating null and empty values as missing.
fn value_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            // pandas emits integer columns containing nulls as floats
            #[allow(clippy::cast_possible_truncation)]
            (None, Some(f)) if f.fract() == 0.0 && f.is_finite() => (f as i64).to_string(),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Array(_) | Value::Object(_) => return None,
    };

    match text.as_str() {
        "" | "None" | "null" | "NaN" | "nan" => None,
        _ => Some(text),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(value_to_string)
}

/// Arrival or departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `ARR`
    Arrival,
    /// `DER` or `DEP`
    Departure,
}

impl Direction {
    /// Parse a backend `flight_type`, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ARR" => Some(Self::Arrival),
            "DER" | "DEP" => Some(Self::Departure),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrival => write!(f, "ARR"),
            Self::Departure => write!(f, "DEP"),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// International or domestic service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FlightMode {
    /// `INT`
    International,
    /// `DOM`
    Domestic,
    /// Anything else the backend sends.
    Other(String),
}

impl FlightMode {
    /// Parse a backend `flight_mode`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "" => None,
            "INT" => Some(Self::International),
            "DOM" => Some(Self::Domestic),
            _ => Some(Self::Other(trimmed.to_string())),
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::International => write!(f, "INT"),
            Self::Domestic => write!(f, "DOM"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl Serialize for FlightMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Raw upstream operational status.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationalStatus {
    /// `operating`
    Operating,
    /// `cancelled`
    Cancelled,
    /// `not operating`: hidden everywhere.
    NotOperating,
    /// `ontime`: forced on future-dated rows.
    OnTime,
    /// Anything else.
    Other(String),
}

impl OperationalStatus {
    /// Parse a backend `operational_status`, case-insensitively.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" => None,
            "operating" => Some(Self::Operating),
            "cancelled" => Some(Self::Cancelled),
            "not operating" => Some(Self::NotOperating),
            "ontime" => Some(Self::OnTime),
            _ => Some(Self::Other(trimmed.to_string())),
        }
    }
}

impl fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operating => write!(f, "operating"),
            Self::Cancelled => write!(f, "cancelled"),
            Self::NotOperating => write!(f, "not operating"),
            Self::OnTime => write!(f, "ontime"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl Serialize for OperationalStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A flight in canonical form.
///
/// `scheduled`/`estimated` and `stand` hold the arrival fields for arrivals
/// and the departure fields for departures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Flight {
    /// Flight number.
    pub flight: String,
    /// Arrival or departure; `None` when the backend sent something else.
    pub direction: Option<Direction>,
    /// International or domestic.
    pub mode: Option<FlightMode>,
    /// Raw upstream status.
    pub operational_status: Option<OperationalStatus>,
    /// STOA or STOD.
    pub scheduled: Slot,
    /// ETOA or ETOD.
    pub estimated: Slot,
    /// Origin airport (arrivals).
    pub origin: Option<String>,
    /// Destination airport (departures).
    pub destination: Option<String>,
    /// Carrier.
    pub airline: Option<String>,
    /// Baggage belt (arrivals).
    pub belt: Slot,
    /// Boarding gate (departures).
    pub gate: Slot,
    /// PSTA or PSTD.
    pub stand: Slot,
    /// Passenger count.
    pub passengers: Slot,
}

impl From<RawFlight> for Flight {
    fn from(raw: RawFlight) -> Self {
        let direction = text(raw.flight_type.as_ref()).and_then(|t| Direction::parse(&t));

        let arrival_times = (
            Slot::from_value(raw.stoa.as_ref()),
            Slot::from_value(raw.etoa.as_ref()),
        );
        let departure_times = (
            Slot::from_value(raw.stod.as_ref()),
            Slot::from_value(raw.etod.as_ref()),
        );
        let psta = Slot::from_value(raw.psta.as_ref());
        let pstd = Slot::from_value(raw.pstd.as_ref())
            .or(Slot::from_value(raw.passenger_stand_time_departure.as_ref()))
            .or(Slot::from_value(raw.pstd_upper.as_ref()));

        let ((scheduled, estimated), stand) = match direction {
            Some(Direction::Arrival) => (arrival_times, psta),
            Some(Direction::Departure) => (departure_times, pstd),
            None => {
                let (stoa, etoa) = arrival_times;
                let (stod, etod) = departure_times;
                ((stoa.or(stod), etoa.or(etod)), psta.or(pstd))
            }
        };

        Self {
            flight: text(raw.flight.as_ref()).unwrap_or_default(),
            direction,
            mode: text(raw.flight_mode.as_ref()).and_then(|m| FlightMode::parse(&m)),
            operational_status: text(raw.operational_status.as_ref())
                .and_then(|s| OperationalStatus::parse(&s)),
            scheduled,
            estimated,
            origin: text(raw.origin.as_ref()),
            destination: text(raw.destination.as_ref()),
            airline: text(raw.airline.as_ref()),
            belt: Slot::from_value(raw.arrival_belt_no.as_ref()),
            gate: Slot::from_value(raw.dep_boarding_gate_no.as_ref())
                .or(Slot::from_value(raw.departure_gate.as_ref())),
            stand,
            passengers: Slot::from_value(raw.number_of_passenger.as_ref())
                .or(Slot::from_value(raw.passengers.as_ref())),
        }
    }
}

impl Flight {
    /// Whether the flight may appear anywhere. `not operating` flights never do.
    #[must_use]
    pub fn is_listed(&self) -> bool {
        self.operational_status != Some(OperationalStatus::NotOperating)
    }

    /// Whether this is a departure.
    #[must_use]
    pub fn is_departure(&self) -> bool {
        self.direction == Some(Direction::Departure)
    }

    /// Parsed scheduled time.
    #[must_use]
    pub fn scheduled_time(&self) -> Option<IstDateTime> {
        self.scheduled.assigned().and_then(parse_timestamp)
    }

    /// Parsed estimated time.
    #[must_use]
    pub fn estimated_time(&self) -> Option<IstDateTime> {
        self.estimated.assigned().and_then(parse_timestamp)
    }

    /// The far end of the route: origin for arrivals, destination for departures.
    #[must_use]
    pub fn counterpart(&self) -> Option<&str> {
        match self.direction {
            Some(Direction::Arrival) => self.origin.as_deref(),
            Some(Direction::Departure) => self.destination.as_deref(),
            None => None,
        }
    }

    /// Copy of this flight with live fields masked if it is scheduled after `today`.
    ///
    /// Future rows carry no passenger count, estimate, belt, gate or stand yet,
    /// and show as on time.
    #[must_use]
    pub fn masked_if_future(&self, today: NaiveDate) -> Flight {
        let Some(scheduled) = self.scheduled_time() else {
            return self.clone();
        };
        if scheduled.date_naive() <= today {
            return self.clone();
        }

        let mut masked = self.clone();
        masked.passengers = Slot::Placeholder;
        masked.estimated = Slot::Placeholder;
        masked.stand = Slot::Placeholder;
        match self.direction {
            Some(Direction::Arrival) => masked.belt = Slot::Placeholder,
            Some(Direction::Departure) => masked.gate = Slot::Placeholder,
            None => {}
        }
        masked.operational_status = Some(OperationalStatus::OnTime);
        masked
    }
}

/// Builders for tests across the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    fn base(flight: &str, direction: Direction, scheduled: &str, estimated: &str) -> Flight {
        Flight {
            flight: flight.to_string(),
            direction: Some(direction),
            mode: Some(FlightMode::Domestic),
            operational_status: Some(OperationalStatus::Operating),
            scheduled: Slot::from_str_value(scheduled),
            estimated: Slot::from_str_value(estimated),
            airline: Some("IndiGo".to_string()),
            ..Flight::default()
        }
    }

    /// An operating arrival.
    pub(crate) fn arrival(flight: &str, stoa: &str, etoa: &str) -> Flight {
        base(flight, Direction::Arrival, stoa, etoa)
    }

    /// An operating departure.
    pub(crate) fn departure(flight: &str, stod: &str, etod: &str) -> Flight {
        base(flight, Direction::Departure, stod, etod)
    }

    /// Same flight with a different raw status.
    pub(crate) fn with_status(mut flight: Flight, status: &str) -> Flight {
        flight.operational_status = OperationalStatus::parse(status);
        flight
    }
}
