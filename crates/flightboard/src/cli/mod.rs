//! Command-line interface for flightboard.
//!
//! This module provides the CLI structure for the `fboard` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::Verbosity;

pub use commands::{
    resolve_date, resolve_month, AnalyticsCommand, BoardCommand, CalendarCommand, ConfigCommand,
    LoginCommand, OutputFormat, WatchCommand, WatchInput, WatchView,
};

/// fboard - Airport arrivals, departures and traffic analytics
///
/// Signs in to the flight backend, shows paginated arrival and departure
/// boards, and summarizes the day's traffic: capacity, status, routes,
/// stands, gates, belts and delays.
#[derive(Debug, Parser)]
#[command(name = "fboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Backend username (overrides [auth] in the config)
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Backend password (overrides [auth] in the config)
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and show the granted role
    Login(LoginCommand),

    /// Show the arrivals board
    Arrivals(BoardCommand),

    /// Show the departures board
    Departures(BoardCommand),

    /// Show the traffic analytics digest
    Analytics(AnalyticsCommand),

    /// Keep a board or the analytics on screen, refreshing live
    Watch(WatchCommand),

    /// Show the date picker month grid
    Calendar(CalendarCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Username and password from the flags, falling back to `[auth]` in the config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredentials`] if either is missing from both.
    pub fn credentials(&self, config: &Config) -> Result<(String, String)> {
        let username = self
            .username
            .clone()
            .or_else(|| config.auth.username.clone());
        let password = self
            .password
            .clone()
            .or_else(|| config.auth.password.clone());

        match (username, password) {
            (Some(u), Some(p)) => Ok((u, p)),
            _ => Err(Error::MissingCredentials),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            username: None,
            password: None,
            command: Command::Login(LoginCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_debug() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "fboard");
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arrivals() {
        let args = vec!["fboard", "arrivals", "--date", "2026-10-19", "--page", "2"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Arrivals(cmd) = cli.command else {
            panic!("expected arrivals");
        };
        assert_eq!(cmd.date.as_deref(), Some("2026-10-19"));
        assert_eq!(cmd.page, 2);
        assert_eq!(cmd.format, OutputFormat::Table);
    }

    #[test]
    fn test_parse_analytics_json() {
        let args = vec!["fboard", "analytics", "-f", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Analytics(cmd) = cli.command else {
            panic!("expected analytics");
        };
        assert_eq!(cmd.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_watch_view() {
        let args = vec!["fboard", "watch", "departures"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Watch(cmd) = cli.command else {
            panic!("expected watch");
        };
        assert_eq!(cmd.view, WatchView::Departures);
    }

    #[test]
    fn test_parse_config_validate() {
        let args = vec!["fboard", "config", "validate", "--file", "/tmp/fb.toml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Validate { file: Some(_) })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["fboard", "-c", "/custom/config.toml", "calendar"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_credentials_prefer_flags() {
        let mut config = Config::default();
        config.auth.username = Some("user".to_string());
        config.auth.password = Some("user123".to_string());

        let mut cli = cli(0, false);
        assert_eq!(
            cli.credentials(&config).unwrap(),
            ("user".to_string(), "user123".to_string())
        );

        cli.username = Some("admin".to_string());
        cli.password = Some("admin123".to_string());
        assert_eq!(cli.credentials(&config).unwrap().0, "admin");
    }

    #[test]
    fn test_credentials_missing() {
        let err = cli(0, false).credentials(&Config::default()).unwrap_err();
        assert!(err.is_auth_error());
    }
}
