//! Weekday and time-of-day normalization
//!
//! Every external surface numbers weekdays ISO-style (`1` = Monday through
//! `7` = Sunday) and writes times as `HH:MM`. Inside the engine both are
//! plain `chrono` values, so the numbering question never reaches the solver.

use chrono::{NaiveDate, NaiveTime, Weekday};

use crate::ValidationError;

const ISO_WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Convert an ISO weekday number (1 = Monday .. 7 = Sunday)
pub fn weekday_from_iso(field: &str, value: i64) -> Result<Weekday, ValidationError> {
    if (1..=7).contains(&value) {
        Ok(ISO_WEEK[(value - 1) as usize])
    } else {
        Err(ValidationError::InvalidWeekday {
            field: field.to_string(),
            value,
        })
    }
}

/// ISO weekday number (1 = Monday .. 7 = Sunday)
pub fn iso_number(weekday: Weekday) -> u8 {
    weekday.number_from_monday() as u8
}

/// Parse `HH:MM` (seconds are accepted and kept)
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ValidationError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Parse `YYYY-MM-DD`
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Render a time as `HH:MM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Reject intervals that are empty or run backwards
pub fn check_interval(field: &str, start: NaiveTime, end: NaiveTime) -> Result<(), ValidationError> {
    if start < end {
        Ok(())
    } else {
        Err(ValidationError::EmptyInterval {
            field: field.to_string(),
            start: format_time(start),
            end: format_time(end),
        })
    }
}
