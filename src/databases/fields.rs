use chrono::{DateTime, NaiveDate};

use crate::error::ApiError;

/// Trims a mandatory text field, rejecting it when blank.
pub fn required(field: &str, value: String) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn positive_quantity(field: &str, value: i32) -> Result<i32, ApiError> {
    if value <= 0 {
        return Err(ApiError::validation(format!("{} must be greater than 0", field)));
    }
    Ok(value)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its date part is kept).
pub fn calendar_date(field: &str, value: &str) -> Result<NaiveDate, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| ApiError::validation(format!("{} must be a date in YYYY-MM-DD format", field)))
}
