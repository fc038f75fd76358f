//! Canonical forms for the fields that are stored normalized: slugs, dates,
//! times and booking emails.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([0-9]{1,2}):([0-9]{2})(\s*(AM|PM))?$").expect("time pattern compiles")
});

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// Tried in order after RFC 3339. Naive date-times are read as UTC.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Month names are English and case-insensitive; `%B` also takes abbreviations.
/// Years outside `0..=9999` are rejected so the stored form stays `YYYY-MM-DD`.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

/// Lowercases the title and joins every run of ASCII letters and digits with
/// a single hyphen.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.trim().to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    parse_date(input.trim())
        .filter(|date| (0..=9999).contains(&date.year()))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ValidationError::single("date", "invalid date"))
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    if input.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        })
}

/// Accepts `H:MM` or `HH:MM` with an optional `AM`/`PM` suffix and returns
/// 24-hour `HH:MM`.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let invalid_format = || ValidationError::single("time", "invalid time format");

    let captures = TIME_PATTERN
        .captures(input.trim())
        .ok_or_else(invalid_format)?;

    let mut hours: u32 = captures[1].parse().map_err(|_| invalid_format())?;
    let minutes = &captures[2];
    let period = captures.get(4).map(|m| m.as_str().to_ascii_uppercase());

    match period.as_deref() {
        Some("PM") if hours < 12 => hours += 12,
        Some("AM") if hours == 12 => hours = 0,
        _ => {}
    }

    let minute_value: u32 = minutes.parse().map_err(|_| invalid_format())?;
    if hours > 23 || minute_value > 59 {
        return Err(ValidationError::single("time", "invalid time value"));
    }

    Ok(format!("{:02}:{}", hours, minutes))
}

pub fn normalize_email(input: &str) -> Result<String, ValidationError> {
    let email = input.trim().to_lowercase();
    if EMAIL_PATTERN.is_match(&email) {
        Ok(email)
    } else {
        Err(ValidationError::single("email", "invalid email"))
    }
}
