//! Configuration management for flightboard.
//!
//! Configuration is loaded with figment from defaults, an optional TOML file
//! and `FLIGHTBOARD_` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::status::StatusThresholds;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the user config dir holding the config file.
const CONFIG_DIR_NAME: &str = "flightboard";

/// Environment variable prefix.
const ENV_PREFIX: &str = "FLIGHTBOARD_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (`FLIGHTBOARD_<SECTION>__<KEY>`)
/// 2. TOML config file at `~/.config/flightboard/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection settings.
    pub api: ApiConfig,
    /// Credentials used when none are given on the command line.
    pub auth: AuthConfig,
    /// Table paging and refresh timing.
    pub board: BoardConfig,
    /// Thresholds used by the status classifier and aggregators.
    pub analytics: AnalyticsConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the flight backend.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

/// Stored credentials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Login name.
    pub username: Option<String>,
    /// Password. Prefer the environment over the config file for this one.
    pub password: Option<String>,
}

/// Table paging and refresh timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// Seconds between automatic page advances in `watch` mode.
    pub cycle_interval_secs: u64,
    /// Milliseconds between "now" ticks that re-evaluate time-relative statuses.
    pub tick_interval_ms: u64,
    /// Seconds between backend re-fetches in `watch` mode. 0 disables polling.
    pub refresh_interval_secs: u64,
}

/// Thresholds used by the status classifier and aggregators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Flights per hour treated as 100% utilization.
    pub theoretical_max_capacity: u32,
    /// Estimated minus scheduled time above which a flight is delayed.
    pub delay_threshold_minutes: i64,
    /// Look-ahead window in which a departure is boarding.
    pub boarding_window_minutes: i64,
    /// Number of origins/destinations kept in route rankings.
    pub top_routes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: 30,
            cycle_interval_secs: 5,
            tick_interval_ms: 1000,
            refresh_interval_secs: 60,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            theoretical_max_capacity: 40,
            delay_threshold_minutes: 30,
            boarding_window_minutes: 40,
            top_routes: 10,
        }
    }
}

impl AnalyticsConfig {
    /// Classifier thresholds derived from this configuration.
    #[must_use]
    pub fn status_thresholds(&self) -> StatusThresholds {
        StatusThresholds {
            delay_minutes: self.delay_threshold_minutes,
            boarding_window_minutes: self.boarding_window_minutes,
        }
    }
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = reqwest::Url::parse(&self.api.base_url) {
            return Err(Error::ConfigValidation {
                message: format!("api.base_url '{}' is not a valid URL: {e}", self.api.base_url),
            });
        }

        let positive = [
            ("api.timeout_secs", self.api.timeout_secs),
            ("board.page_size", self.board.page_size as u64),
            ("board.cycle_interval_secs", self.board.cycle_interval_secs),
            ("board.tick_interval_ms", self.board.tick_interval_ms),
            (
                "analytics.theoretical_max_capacity",
                u64::from(self.analytics.theoretical_max_capacity),
            ),
        ];
        for (name, value) in positive {
            if value == 0 {
                return Err(Error::ConfigValidation {
                    message: format!("{name} must be greater than 0"),
                });
            }
        }

        if self.analytics.delay_threshold_minutes < 0 || self.analytics.boarding_window_minutes < 0
        {
            return Err(Error::ConfigValidation {
                message: "analytics thresholds cannot be negative".to_string(),
            });
        }

        Ok(())
    }

    /// Per-request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Interval between "now" ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.board.tick_interval_ms)
    }

    /// Interval between automatic page advances.
    #[must_use]
    pub fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.board.cycle_interval_secs)
    }

    /// Interval between backend re-fetches, or `None` when polling is off.
    #[must_use]
    pub fn refresh_interval(&self) -> Option<Duration> {
        if self.board.refresh_interval_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.board.refresh_interval_secs))
        }
    }
}
