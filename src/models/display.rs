use chrono::{DateTime, NaiveDate};

/// Placeholder for optional fields the backend left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Text value or `N/A` when missing or blank.
pub fn or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Format an RFC 3339 timestamp as `YYYY-MM-DD HH:MM`. Unparsable input is
/// shown as sent; missing input is `N/A`.
pub fn timestamp_or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => match DateTime::parse_from_rfc3339(v) {
            Ok(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            Err(_) => v.to_string(),
        },
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Parse a calendar date from either `YYYY-MM-DD` or a full timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(v).ok().map(|dt| dt.date_naive()))
}

pub fn date_or_na(value: Option<&str>) -> String {
    match value {
        Some(v) => match parse_date(v) {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => or_na(Some(v)),
        },
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Amount with two decimals and optional currency code.
pub fn amount_or_na(amount: Option<f64>, currency: Option<&str>) -> String {
    match amount {
        Some(a) => match currency.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => format!("{a:.2} {c}"),
            None => format!("{a:.2}"),
        },
        None => NOT_AVAILABLE.to_string(),
    }
}
