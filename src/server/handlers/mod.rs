pub mod admin;
pub mod health;
pub mod journey_plans;
pub mod sales;

use crate::dates::{CalendarDate, DateRange};
use crate::errors::SaleError;

/// Lenient `limit` parameter: anything that is not a positive integer falls
/// back to the configured default.
pub(crate) fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.trim().parse::<usize>().ok())
}

/// Optional date query parameter. Present but unparseable yields the raw
/// input as the error.
pub(crate) fn parse_date_param(raw: Option<&str>) -> Result<Option<CalendarDate>, String> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => CalendarDate::parse(s).map(Some).ok_or_else(|| s.to_string()),
    }
}

pub(crate) fn parse_range(from: Option<&str>, to: Option<&str>) -> Result<DateRange, SaleError> {
    let from = parse_date_param(from).map_err(|value| SaleError::InvalidFilter { field: "from", value })?;
    let to = parse_date_param(to).map_err(|value| SaleError::InvalidFilter { field: "to", value })?;
    Ok(DateRange::new(from, to))
}
