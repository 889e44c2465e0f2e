//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};

use crate::calendar::MonthView;
use crate::clock::{parse_date, today_ist};
use crate::error::Result;

/// Arguments for the arrivals and departures tables.
#[derive(Debug, Args)]
pub struct BoardCommand {
    /// Date to show (YYYY-MM-DD, default: today in IST)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Page to show
    #[arg(short, long, default_value = "1")]
    pub page: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the analytics digest.
#[derive(Debug, Args)]
pub struct AnalyticsCommand {
    /// Date to analyse (YYYY-MM-DD, default: today in IST)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments for the live board.
#[derive(Debug, Args)]
pub struct WatchCommand {
    /// Which view to keep on screen
    #[arg(value_enum, default_value = "arrivals")]
    pub view: WatchView,

    /// Date to show (YYYY-MM-DD, default: today in IST)
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Arguments for the date picker.
#[derive(Debug, Args)]
pub struct CalendarCommand {
    /// Month to show (YYYY-MM, default: the current month in IST)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Date to highlight as selected (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,
}

/// Arguments for login.
#[derive(Debug, Args)]
pub struct LoginCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Views available to `watch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WatchView {
    /// Arrivals table
    #[default]
    Arrivals,
    /// Departures table
    Departures,
    /// Analytics digest
    Analytics,
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

/// A line typed on stdin while `watch` is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchInput {
    /// `n`
    NextPage,
    /// `p`
    PreviousPage,
    /// `f`
    FirstPage,
    /// `l`
    LastPage,
    /// `+`
    NextDay,
    /// `-`
    PreviousDay,
    /// `>`: same day next month, clamped to the month's length
    NextMonth,
    /// `<`: same day previous month, clamped to the month's length
    PreviousMonth,
    /// `t`
    Today,
    /// A bare number picks that day of the selected month.
    Day(u32),
    /// `YYYY-MM-DD`
    Date(NaiveDate),
    /// `r`: re-fetch now
    Refresh,
    /// `q`
    Quit,
}

impl WatchInput {
    /// Parse one input line. Unknown input is `None`.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let input = match line {
            "n" => Self::NextPage,
            "p" => Self::PreviousPage,
            "f" => Self::FirstPage,
            "l" => Self::LastPage,
            "+" => Self::NextDay,
            "-" => Self::PreviousDay,
            ">" => Self::NextMonth,
            "<" => Self::PreviousMonth,
            "t" => Self::Today,
            "r" => Self::Refresh,
            "q" => Self::Quit,
            _ => {
                if let Ok(day) = line.parse::<u32>() {
                    return Some(Self::Day(day));
                }
                return parse_date(line).ok().map(Self::Date);
            }
        };
        Some(input)
    }

    /// The date this input moves the board to from `current`.
    ///
    /// `None` for inputs that do not change the date and for days the month
    /// does not have.
    #[must_use]
    pub fn target_date(self, current: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
        let view = MonthView::containing(current);
        let same_day = |month: MonthView| month.select(current.day().min(month.days_in_month()));
        match self {
            Self::NextDay => current.succ_opt(),
            Self::PreviousDay => current.pred_opt(),
            Self::NextMonth => same_day(view.next()),
            Self::PreviousMonth => same_day(view.previous()),
            Self::Today => Some(today),
            Self::Day(day) => view.select(day),
            Self::Date(date) => Some(date),
            Self::NextPage
            | Self::PreviousPage
            | Self::FirstPage
            | Self::LastPage
            | Self::Refresh
            | Self::Quit => None,
        }
    }
}

/// Parse an optional `--date`, defaulting to today in IST.
///
/// # Errors
///
/// Returns an error if the date is given but malformed.
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    date.map_or_else(|| Ok(today_ist()), parse_date)
}

/// Parse an optional `--month YYYY-MM` into a year and month, defaulting to
/// the month of `fallback`.
///
/// # Errors
///
/// Returns an error if the month is given but malformed.
pub fn resolve_month(month: Option<&str>, fallback: NaiveDate) -> Result<NaiveDate> {
    match month {
        Some(m) => parse_date(&format!("{}-01", m.trim())),
        None => Ok(fallback),
    }
}
