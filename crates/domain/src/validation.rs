// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use std::str::FromStr;
use time::Date;
use time::macros::format_description;

/// Validates that a required text field is not empty.
///
/// # Arguments
///
/// * `field` - The field name, used in the error
/// * `value` - The raw value
///
/// # Returns
///
/// The trimmed value.
///
/// # Errors
///
/// Returns `DomainError::EmptyField` if the value is empty after trimming.
pub fn validate_required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Validates the shape of an email address.
///
/// Only the structure is checked: a non-empty local part, a single `@`,
/// and a domain containing a dot that neither starts nor ends it.
///
/// # Errors
///
/// Returns an error if the address is empty or malformed.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let email: String = validate_required("email", email)?;

    let Some((local, domain)) = email.split_once('@') else {
        return Err(DomainError::InvalidEmail(email));
    };

    let domain_ok: bool = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains('@');

    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(DomainError::InvalidEmail(email));
    }

    Ok(email)
}

/// Validates that a sale amount is strictly positive.
///
/// # Errors
///
/// Returns `DomainError::InvalidAmount` for zero or negative amounts.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, DomainError> {
    if amount <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount { amount });
    }
    Ok(amount)
}

/// Parses a decimal from its stored text form.
///
/// # Errors
///
/// Returns `DomainError::DecimalParse` if the text is not a decimal.
pub fn parse_decimal(value: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(value.trim()).map_err(|e| DomainError::DecimalParse {
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Parses an ISO 8601 calendar date (`YYYY-MM-DD`).
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_sale_date(date_string: &str) -> Result<Date, DomainError> {
    Date::parse(
        date_string.trim(),
        format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: date_string.to_string(),
        error: e.to_string(),
    })
}

/// Formats a calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn format_sale_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
