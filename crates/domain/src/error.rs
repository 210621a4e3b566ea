// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during domain validation.
///
/// None of these imply a state change: they are raised before anything is
/// written and reported to the caller as validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A sale amount was zero or negative.
    #[error("Invalid amount: {amount}. Sale amounts must be greater than 0")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },
    /// A commission rate was outside `(0, 1]`.
    #[error("Invalid commission rate: {rate}. Rates must be a fraction greater than 0 and at most 1")]
    InvalidRate {
        /// The rejected rate (as a fraction).
        rate: Decimal,
    },
    /// A rule's amount window is malformed.
    #[error("Invalid amount window: {reason}")]
    InvalidAmountWindow {
        /// Why the window was rejected.
        reason: String,
    },
    /// A required text field was empty or whitespace.
    #[error("Field '{field}' cannot be empty")]
    EmptyField {
        /// The name of the empty field.
        field: &'static str,
    },
    /// A role string did not name a known role.
    #[error("Invalid role: '{0}'. Must be 'admin' or 'sales_rep'")]
    InvalidRole(String),
    /// An email address is malformed.
    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),
    /// A stored decimal value could not be parsed.
    #[error("Failed to parse decimal '{value}': {error}")]
    DecimalParse {
        /// The raw value.
        value: String,
        /// The parser's message.
        error: String,
    },
    /// A date string could not be parsed.
    #[error("Failed to parse date '{date_string}': {error}")]
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A monetary computation exceeded the decimal range.
    #[error("Arithmetic overflow while {operation}")]
    ArithmeticOverflow {
        /// Description of the operation that failed.
        operation: &'static str,
    },
}
