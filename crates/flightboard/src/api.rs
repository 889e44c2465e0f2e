//! Backend client.
//!
//! Three read feeds (`/api/arrivals`, `/api/departures`, `/api/all_flights`)
//! and `/api/login`. A failed feed fetch is logged and turns into an empty
//! list; there are no retries. A failed login is an error.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::today_ist;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::flight::{Flight, RawFlight};
use crate::session::{Role, Session};

/// One of the backend's flight lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feed {
    /// Arrivals for the selected date.
    Arrivals,
    /// Departures for the selected date.
    Departures,
    /// Every flight, used by the analytics views.
    AllFlights,
}

impl Feed {
    /// All feeds.
    pub const ALL: [Feed; 3] = [Feed::Arrivals, Feed::Departures, Feed::AllFlights];

    /// Request path.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Arrivals => "/api/arrivals",
            Self::Departures => "/api/departures",
            Self::AllFlights => "/api/all_flights",
        }
    }

    /// Whether rows scheduled after today get their live fields masked.
    #[must_use]
    pub fn masks_future(self) -> bool {
        matches!(self, Self::Arrivals | Self::Departures)
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arrivals => write!(f, "arrivals"),
            Self::Departures => write!(f, "departures"),
            Self::AllFlights => write!(f, "all_flights"),
        }
    }
}

/// Body of a feed response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightsResponse {
    /// Rows.
    #[serde(default)]
    pub flights: Vec<RawFlight>,
    /// Matching flights before the backend trimmed the list.
    #[serde(default)]
    pub total: Option<usize>,
    /// Informational note, e.g. for past dates.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a login request.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Login name.
    pub username: &'a str,
    /// Password.
    pub password: &'a str,
}

/// Body of a login response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    /// Whether the credentials were accepted.
    #[serde(default)]
    pub success: bool,
    /// Echoed login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Granted role.
    #[serde(default)]
    pub role: Option<String>,
    /// Failure message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Anything that can supply flights and authenticate users.
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Fetch `feed` for `date`. Failures yield an empty list.
    async fn fetch(&self, feed: Feed, date: NaiveDate) -> Vec<Flight>;

    /// Authenticate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LoginRejected`] for bad credentials and transport or
    /// status errors otherwise.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;
}

/// HTTP client for the flight backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = config.api.base_url.trim_end_matches('/').to_string();
        if let Err(e) = reqwest::Url::parse(&base_url) {
            return Err(Error::InvalidUrl {
                url: config.api.base_url.clone(),
                message: e.to_string(),
            });
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch `feed` for `date`, surfacing every failure.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status or an
    /// undecodable body.
    pub async fn try_fetch(&self, feed: Feed, date: NaiveDate) -> Result<FlightsResponse> {
        let response = self
            .http
            .get(self.url(feed.path()))
            .query(&[("date", date.format("%Y-%m-%d").to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(feed.path(), status.as_u16(), body));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Canonicalize feed rows, masking future rows where the feed calls for it.
#[must_use]
pub fn prepare(feed: Feed, rows: Vec<RawFlight>, today: NaiveDate) -> Vec<Flight> {
    rows.into_iter()
        .map(Flight::from)
        .map(|flight| {
            if feed.masks_future() {
                flight.masked_if_future(today)
            } else {
                flight
            }
        })
        .collect()
}

#[async_trait]
impl FlightSource for ApiClient {
    async fn fetch(&self, feed: Feed, date: NaiveDate) -> Vec<Flight> {
        match self.try_fetch(feed, date).await {
            Ok(response) => {
                if let Some(message) = &response.message {
                    info!(%feed, %date, message = %message, "backend note");
                }
                debug!(
                    %feed,
                    %date,
                    rows = response.flights.len(),
                    total = ?response.total,
                    "fetched flights"
                );
                prepare(feed, response.flights, today_ist())
            }
            Err(e) => {
                warn!(%feed, %date, error = %e, "fetch failed, showing no flights");
                Vec::new()
            }
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let endpoint = "/api/login";
        let response = self
            .http
            .post(self.url(endpoint))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            let message = serde_json::from_str::<LoginResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or_else(|| "invalid username or password".to_string());
            return Err(Error::login_rejected(message));
        }
        if !status.is_success() {
            return Err(Error::api(endpoint, status.as_u16(), body));
        }

        let reply: LoginResponse = serde_json::from_str(&body)?;
        if !reply.success {
            return Err(Error::login_rejected(
                reply.message.unwrap_or_else(|| "login failed".to_string()),
            ));
        }

        let session = Session::new(
            reply.username.unwrap_or_else(|| username.to_string()),
            reply.role.map_or(Role::User, Role::from),
        );
        info!(username = %session.username, role = %session.role, "signed in");
        Ok(session)
    }
}
