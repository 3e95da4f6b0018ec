//! Display formatting for money and dates
//!
//! Currency is rendered as US dollars with thousands separators and two
//! decimals. Dates are rendered in UTC, e.g. `Jan 28, 2024, 02:30 PM`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::round_cents;

const DATE_PATTERN: &str = "%b %-d, %Y, %I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Amount is not a finite number")]
    NonFinite,

    #[error("Amount out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid currency string: {0}")]
    InvalidCurrency(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Render an amount as `$1,152.00` (negative: `-$5.00`).
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_cents(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    format!("{}${}.{}", sign, group_thousands(whole), cents)
}

pub fn format_currency_f64(value: f64) -> Result<String, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFinite);
    }
    let decimal = Decimal::try_from(value).map_err(|_| FormatError::OutOfRange(value.to_string()))?;
    Ok(format_currency(decimal))
}

/// Inverse of [`format_currency`], to two decimal places.
pub fn parse_currency(input: &str) -> Result<Decimal, FormatError> {
    let trimmed = input.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits: String = rest
        .strip_prefix('$')
        .unwrap_or(rest)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    if digits.is_empty() || digits.starts_with(['-', '+']) {
        return Err(FormatError::InvalidCurrency(input.to_string()));
    }
    let value = Decimal::from_str(&digits)
        .map_err(|_| FormatError::InvalidCurrency(input.to_string()))?;
    let value = round_cents(value);

    Ok(if negative { -value } else { value })
}

/// Render an RFC 3339 timestamp for display.
pub fn format_date(input: &str) -> Result<String, FormatError> {
    let parsed = DateTime::parse_from_rfc3339(input.trim())
        .map_err(|_| FormatError::InvalidDate(input.to_string()))?;
    Ok(format_datetime(parsed.with_timezone(&Utc)))
}

pub fn format_datetime(instant: DateTime<Utc>) -> String {
    instant.format(DATE_PATTERN).to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
