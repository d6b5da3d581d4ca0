//! Date parsing and the day/month walks used by both download flows.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{Error, Result};

pub(crate) const ISO_DATE: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date. Surrounding whitespace is rejected.
pub fn parse_iso_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, ISO_DATE).map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        expected: "YYYY-MM-DD",
        source,
    })
}

/// Parses a `YYYY-MM` date; the result is the first day of that month.
pub fn parse_year_month(input: &str) -> Result<NaiveDate> {
    let padded = format!("{input}-01");
    NaiveDate::parse_from_str(&padded, ISO_DATE).map_err(|source| Error::InvalidDate {
        input: input.to_string(),
        expected: "YYYY-MM",
        source,
    })
}

/// Every calendar day in `[start, end]`, ascending.
#[derive(Debug, Clone)]
pub(crate) struct Days {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Days {
    pub(crate) fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: Some(start),
            end,
        }
    }
}

impl Iterator for Days {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let curr = self.next.filter(|d| *d <= self.end)?;
        self.next = curr.succ_opt();
        Some(curr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self.next {
            Some(d) if d <= self.end => (self.end - d).num_days() as usize + 1,
            _ => 0,
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Days {}

/// First-of-month dates from `start`'s month while `<= end`.
///
/// Steps by 32 days and snaps back to day 1, which lands in the following
/// month whatever the current month's length.
#[derive(Debug, Clone)]
pub(crate) struct Months {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Months {
    pub(crate) fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            next: start.with_day(1),
            end,
        }
    }
}

impl Iterator for Months {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let curr = self.next.filter(|d| *d <= self.end)?;
        self.next = curr
            .checked_add_signed(Duration::days(32))
            .and_then(|d| d.with_day(1));
        Some(curr)
    }
}
