//! `flightboard` - Airport flight-information board
//!
//! This library provides the pieces behind the `fboard` binary: a client for
//! the flight backend, the time-relative status classifier, paginated
//! arrival and departure boards, and the operational analytics (hourly
//! capacity, status mix, routes, stands, gates, belts and delays).
//!
//! All clock arithmetic happens in Indian Standard Time (UTC+05:30).

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod api;
pub mod board;
pub mod calendar;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod flight;
pub mod logging;
pub mod render;
pub mod session;
pub mod state;
pub mod status;
pub mod ticker;

pub use analytics::Dashboard;
pub use api::{ApiClient, Feed, FlightSource};
pub use config::Config;
pub use error::{Error, Result};
pub use flight::Flight;
pub use logging::init_logging;
pub use session::Session;
pub use state::BoardState;
pub use status::{classify, FlightStatus};
pub use ticker::Ticker;
