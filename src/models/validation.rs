//! Field-level validation helpers.
//!
//! Collects every failing field of a request so the caller sees the first
//! problem plus a count of the rest, e.g.
//! `The name field is required. (and 2 more errors)`.

use chrono::{NaiveDate, NaiveTime};

use crate::{Error, Result};

/// Accumulates validation failures for one request.
#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.messages.len()
    }

    /// Convert the collected failures into a single `Error::Validation`.
    pub fn into_result(self) -> Result<()> {
        let mut messages = self.messages.into_iter();
        let Some(first) = messages.next() else {
            return Ok(());
        };

        let rest = messages.count();
        let message = match rest {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        };

        Err(Error::Validation(message))
    }

    /// Check a required text field: trimmed, non-empty and at most `max`
    /// characters. Returns the trimmed value when valid.
    pub fn required_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: usize,
    ) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            self.push(format!("The {} field is required.", field));
            return None;
        };
        self.max_chars(field, value, max).then(|| value.to_string())
    }

    /// Check an optional text field. Blank input counts as absent.
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<&str>,
        max: Option<usize>,
    ) -> Option<String> {
        let value = value.map(str::trim).filter(|v| !v.is_empty())?;
        match max {
            Some(max) if !self.max_chars(field, value, max) => None,
            _ => Some(value.to_string()),
        }
    }

    /// Check a required calendar date in `YYYY-MM-DD` form.
    pub fn required_date(&mut self, field: &str, value: Option<&str>) -> Option<NaiveDate> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            self.push(format!("The {} field is required.", field));
            return None;
        };
        match parse_calendar_date(value) {
            Some(date) => Some(date),
            None => {
                self.push(format!("The {} field must be a valid date.", field));
                None
            }
        }
    }

    /// Check a required time of day in strict 24-hour `HH:MM` form.
    pub fn required_time(&mut self, field: &str, value: Option<&str>) -> Option<NaiveTime> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let Some(value) = value else {
            self.push(format!("The {} field is required.", field));
            return None;
        };
        match parse_time_of_day(value) {
            Some(time) => Some(time),
            None => {
                self.push(format!("The {} field must match the format H:i.", field));
                None
            }
        }
    }

    fn max_chars(&mut self, field: &str, value: &str, max: usize) -> bool {
        if value.chars().count() > max {
            self.push(format!(
                "The {} field must not be greater than {} characters.",
                field, max
            ));
            false
        } else {
            true
        }
    }
}

/// Parse `YYYY-MM-DD`, rejecting unpadded or signed forms (`2025-1-5`,
/// `+2025-01-05`) that would not read back as submitted.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (date.format("%Y-%m-%d").to_string() == value).then_some(date)
}

/// Parse `HH:MM`, rejecting anything that does not format back identically
/// (`8:00`, `08:00:00`, `24:00`).
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    let time = NaiveTime::parse_from_str(value, "%H:%M").ok()?;
    (time.format("%H:%M").to_string() == value).then_some(time)
}
