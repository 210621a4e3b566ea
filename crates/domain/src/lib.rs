// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rules for the Sales Incentive Tracker.
//!
//! This crate is pure: it validates inputs, resolves commission rates, and
//! aggregates sales figures without touching storage.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod commission;
mod error;
mod sale;
mod stats;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use commission::{
    AmountWindow, CommissionQuote, CommissionRate, CommissionRule, RateSource, RuleDefinition,
    explicit_commission, resolve_commission,
};
pub use error::DomainError;
pub use sale::{NewSale, SaleRecord, SaleScope};
pub use stats::{SalesStats, compute_sales_stats};
pub use types::{Role, User, UserProfile};
pub use validation::{
    format_sale_date, parse_decimal, parse_sale_date, validate_amount, validate_email,
    validate_required,
};
