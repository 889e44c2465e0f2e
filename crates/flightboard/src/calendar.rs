//! Month grid behind the date picker.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday headers, Sunday first.
pub const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Rows in a month grid.
pub const GRID_ROWS: usize = 6;

/// One month as shown by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthView {
    year: i32,
    month: u32,
}

/// A day cell in the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCell {
    /// The date.
    pub date: NaiveDate,
    /// Whether it is today in IST.
    pub is_today: bool,
    /// Whether it is the selected date.
    pub is_selected: bool,
}

impl MonthView {
    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// `October 2026`
    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month as usize - 1], self.year)
    }

    fn first(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Number of days in the month.
    #[must_use]
    pub fn days_in_month(&self) -> u32 {
        let next = self.next();
        match (self.first(), next.first()) {
            (Some(first), Some(following)) => {
                u32::try_from((following - first).num_days()).unwrap_or(31)
            }
            _ => 31,
        }
    }

    /// Weekday of the 1st, Sunday = 0.
    #[must_use]
    pub fn first_weekday(&self) -> u32 {
        self.first()
            .map_or(0, |d| d.weekday().num_days_from_sunday())
    }

    /// The month before, rolling into the previous year after January.
    #[must_use]
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month after, rolling into the next year after December.
    #[must_use]
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Pick `day` of this month.
    #[must_use]
    pub fn select(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Six weeks of seven cells, Sunday first. Cells outside the month are `None`.
    #[must_use]
    pub fn grid(&self, today: NaiveDate, selected: Option<NaiveDate>) -> Vec<[Option<DayCell>; 7]> {
        let mut rows = vec![[None; 7]; GRID_ROWS];
        let offset = self.first_weekday() as usize;

        for day in 1..=self.days_in_month() {
            let Some(date) = self.select(day) else {
                continue;
            };
            let index = offset + day as usize - 1;
            rows[index / 7][index % 7] = Some(DayCell {
                date,
                is_today: date == today,
                is_selected: Some(date) == selected,
            });
        }

        rows
    }
}
