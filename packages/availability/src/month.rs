//! Month parsing and trailing windows.
//!
//! Upstream rows label months as `YYYY-MM`, `YYYY-MM-DD` or a Socrata
//! floating timestamp (`2024-09-01T00:00:00.000`). Only the calendar month
//! matters, so every form is reduced to the first day of its month.

use chrono::{Months, NaiveDate};

use crate::AvailabilityError;

/// Parses a month label to the first day of that month.
///
/// # Errors
///
/// Returns [`AvailabilityError::InvalidMonth`] for anything that does not
/// start with a valid `YYYY-MM`.
pub fn parse_month(raw: &str) -> Result<NaiveDate, AvailabilityError> {
    let invalid = || AvailabilityError::InvalidMonth {
        value: raw.to_string(),
    };
    let trimmed = raw.trim();
    let (year_month, rest) = trimmed.split_at_checked(7).ok_or_else(invalid)?;
    if !(rest.is_empty() || rest.starts_with('-')) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(&format!("{year_month}-01"), "%Y-%m-%d").map_err(|_| invalid())
}

/// The inclusive window of `months` calendar months ending at `end`.
///
/// # Errors
///
/// Returns [`AvailabilityError::EmptyWindow`] if `months` is zero.
pub fn month_window(end: NaiveDate, months: u32) -> Result<(NaiveDate, NaiveDate), AvailabilityError> {
    let span = months.checked_sub(1).ok_or(AvailabilityError::EmptyWindow)?;
    let start = end
        .checked_sub_months(Months::new(span))
        .unwrap_or(NaiveDate::MIN);
    Ok((start, end))
}
