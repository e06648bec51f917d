use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};

/// A (year, month) accounting period. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UsagePeriod {
    year: i32,
    month: u32,
}

impl UsagePeriod {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            anyhow::bail!("Invalid month: {} (must be 1-12)", month);
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            anyhow::bail!("Invalid year: {}", year);
        }
        Ok(Self { year, month })
    }

    /// The period containing the local current date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Period from optional CLI arguments, defaulting to the current month.
    pub fn resolve(year: Option<i32>, month: Option<u32>) -> Result<Self> {
        let current = Self::current();
        Self::new(
            year.unwrap_or_else(|| current.year()),
            month.unwrap_or_else(|| current.month()),
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated on construction")
    }

    /// Last calendar day of the month. December rolls over into the next
    /// year's January before stepping back a day.
    pub fn last_day(&self) -> NaiveDate {
        let (next_year, next_month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .expect("validated on construction")
    }

    /// Ascending dates from day 1 through the earlier of `as_of` and the
    /// month's last day. A month entirely in the past yields every calendar
    /// day; a month entirely in the future yields nothing.
    pub fn days_through(&self, as_of: NaiveDate) -> Vec<NaiveDate> {
        let end = self.last_day().min(as_of);
        let mut days = Vec::new();
        let mut day = self.first_day();
        while day <= end {
            days.push(day);
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        days
    }

    /// Ledger file name for this period, e.g. `202403.csv`.
    pub fn ledger_file_name(&self) -> String {
        format!("{:04}{:02}.csv", self.year, self.month)
    }

    /// Display label, e.g. `2024-03`.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}
