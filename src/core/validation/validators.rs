//! Reusable field validators
//!
//! These are used by the request payload types to turn raw input into
//! checked domain values.

use crate::core::error::ValidationError;
use crate::core::month::MonthKey;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Validator: text is present and not blank; returns the trimmed value
pub fn required_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Validator: value is present and not blank; returns it untouched
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Validator: optional text, blank collapses to `None`
pub fn optional_text(value: Option<String>) -> Option<String> {
    required_text(value)
}

/// Validator: number is finite and not negative
pub fn non_negative(field: &str, label: &str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::field(
            field,
            &format!("{} must be a finite number", label),
        ));
    }
    if value < 0.0 {
        return Err(ValidationError::field(
            field,
            &format!("{} cannot be negative", label),
        ));
    }
    Ok(value)
}

/// Validator: string is a `YYYY-MM` month key
pub fn month(value: &str) -> Result<MonthKey, ValidationError> {
    MonthKey::parse(value).map_err(|e| ValidationError::InvalidMonth { value: e.0 })
}

/// Validator: optional month filter, as found in query strings
///
/// An empty string counts as absent.
pub fn optional_month(value: Option<&str>) -> Result<Option<MonthKey>, ValidationError> {
    match value {
        None | Some("") => Ok(None),
        Some(raw) => month(raw).map(Some),
    }
}

/// Validator: string is a UUID
pub fn uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value.trim()).map_err(|_| ValidationError::InvalidUuid {
        value: value.to_string(),
    })
}

/// Validator: payment date as RFC 3339 or a plain `YYYY-MM-DD` date
///
/// Plain dates are taken as midnight UTC.
pub fn payment_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            ValidationError::field(
                "payment_date",
                &format!("Invalid payment date: {}", value),
            )
        })
}
