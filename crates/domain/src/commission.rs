// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission rates, rules, and rule resolution.
//!
//! Rates are always fractions here (`0.05` is five percent). Conversion from
//! the percentages shown to people happens at the API boundary through
//! [`CommissionRate::from_percentage`].

use crate::error::DomainError;
use crate::validation::{validate_amount, validate_required};
use rust_decimal::Decimal;

/// A commission rate expressed as a fraction in `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommissionRate(Decimal);

impl CommissionRate {
    /// Creates a validated rate from a fraction.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if the fraction is not in `(0, 1]`.
    pub fn new(fraction: Decimal) -> Result<Self, DomainError> {
        if fraction <= Decimal::ZERO || fraction > Decimal::ONE {
            return Err(DomainError::InvalidRate { rate: fraction });
        }
        Ok(Self(fraction))
    }

    /// Creates a validated rate from a percentage (`12.5` means 12.5%).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRate` if the resulting fraction is not in `(0, 1]`.
    pub fn from_percentage(percent: Decimal) -> Result<Self, DomainError> {
        let fraction: Decimal = percent
            .checked_div(Decimal::ONE_HUNDRED)
            .ok_or(DomainError::ArithmeticOverflow {
                operation: "converting a percentage to a rate",
            })?;
        Self::new(fraction)
    }

    /// The default fallback rate of five percent.
    #[must_use]
    pub fn default_rate() -> Self {
        Self(Decimal::new(5, 2))
    }

    /// Returns the rate as a fraction.
    #[must_use]
    pub const fn fraction(&self) -> Decimal {
        self.0
    }

    /// Returns the rate as a percentage.
    #[must_use]
    pub fn as_percentage(&self) -> Decimal {
        (self.0 * Decimal::ONE_HUNDRED).normalize()
    }

    /// Applies this rate to a sale amount.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ArithmeticOverflow` if the product does not fit
    /// in a decimal.
    pub fn apply(&self, amount: Decimal) -> Result<Decimal, DomainError> {
        amount
            .checked_mul(self.0)
            .ok_or(DomainError::ArithmeticOverflow {
                operation: "computing a commission amount",
            })
    }
}

impl Default for CommissionRate {
    fn default() -> Self {
        Self::default_rate()
    }
}

impl std::fmt::Display for CommissionRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An inclusive sale-amount window `[min, max]`; a missing `max` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountWindow {
    min: Decimal,
    max: Option<Decimal>,
}

impl AmountWindow {
    /// Creates a validated window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmountWindow` if `min` is negative or
    /// `max` is below `min`.
    pub fn new(min: Decimal, max: Option<Decimal>) -> Result<Self, DomainError> {
        if min < Decimal::ZERO {
            return Err(DomainError::InvalidAmountWindow {
                reason: format!("minimum amount {min} cannot be negative"),
            });
        }
        if let Some(max) = max.filter(|max| *max < min) {
            return Err(DomainError::InvalidAmountWindow {
                reason: format!("maximum amount {max} is below minimum amount {min}"),
            });
        }
        Ok(Self { min, max })
    }

    /// A window that accepts every non-negative amount.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: Decimal::ZERO,
            max: None,
        }
    }

    /// Returns the inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> Decimal {
        self.min
    }

    /// Returns the inclusive upper bound, if any.
    #[must_use]
    pub const fn max(&self) -> Option<Decimal> {
        self.max
    }

    /// Returns whether `amount` lies within the window (both ends inclusive).
    #[must_use]
    pub fn contains(&self, amount: Decimal) -> bool {
        amount >= self.min && self.max.is_none_or(|max| amount <= max)
    }
}

impl Default for AmountWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// A persisted commission rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommissionRule {
    /// The canonical numeric identifier assigned by the database.
    pub rule_id: i64,
    /// The product this rule applies to (exact, case-sensitive match).
    pub product_name: String,
    /// The rate applied when the rule matches.
    pub rate: CommissionRate,
    /// The amounts for which the rule applies.
    pub window: AmountWindow,
    /// Free-form description.
    pub description: Option<String>,
    /// Inactive rules never apply.
    pub is_active: bool,
    /// Creation timestamp as recorded by the database.
    pub created_at: String,
}

impl CommissionRule {
    /// Returns whether this rule applies to a sale of `amount`.
    #[must_use]
    pub fn applies_to(&self, amount: Decimal) -> bool {
        self.is_active && self.window.contains(amount)
    }
}

/// Validated input for creating or overwriting a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    product_name: String,
    rate: CommissionRate,
    window: AmountWindow,
    description: Option<String>,
}

impl RuleDefinition {
    /// Creates a validated rule definition.
    ///
    /// Blank descriptions are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the product name is empty.
    pub fn new(
        product_name: &str,
        rate: CommissionRate,
        window: AmountWindow,
        description: Option<&str>,
    ) -> Result<Self, DomainError> {
        let product_name: String = validate_required("product_name", product_name)?;
        let description: Option<String> = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        Ok(Self {
            product_name,
            rate,
            window,
            description,
        })
    }

    /// Returns the product name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the rate.
    #[must_use]
    pub const fn rate(&self) -> CommissionRate {
        self.rate
    }

    /// Returns the amount window.
    #[must_use]
    pub const fn window(&self) -> AmountWindow {
        self.window
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Where an applied rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    /// A matching, active rule.
    Rule,
    /// The configured fallback rate.
    Default,
    /// A rate supplied with the sale.
    Explicit,
}

impl RateSource {
    /// Converts this source to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Default => "default",
            Self::Explicit => "explicit",
        }
    }
}

/// The outcome of resolving a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionQuote {
    /// The rate that applies.
    pub rate: CommissionRate,
    /// `amount × rate`.
    pub commission_amount: Decimal,
    /// Where `rate` came from.
    pub source: RateSource,
}

/// Resolves the commission for a sale.
///
/// The rule (if any) is the one stored under the exact product name. It is
/// used only when it is active and `amount` falls inside its window;
/// otherwise `default_rate` applies. There is no rule chain or priority.
///
/// # Arguments
///
/// * `rule` - The rule stored for the product, if any
/// * `amount` - The sale amount
/// * `default_rate` - The fallback rate
///
/// # Errors
///
/// Returns an error if the amount is not positive or the product overflows.
pub fn resolve_commission(
    rule: Option<&CommissionRule>,
    amount: Decimal,
    default_rate: CommissionRate,
) -> Result<CommissionQuote, DomainError> {
    let amount: Decimal = validate_amount(amount)?;

    let (rate, source): (CommissionRate, RateSource) = match rule {
        Some(rule) if rule.applies_to(amount) => (rule.rate, RateSource::Rule),
        _ => (default_rate, RateSource::Default),
    };

    Ok(CommissionQuote {
        rate,
        commission_amount: rate.apply(amount)?,
        source,
    })
}

/// Computes the commission for a sale with a manually entered rate.
///
/// # Errors
///
/// Returns an error if the amount is not positive or the product overflows.
pub fn explicit_commission(
    amount: Decimal,
    rate: CommissionRate,
) -> Result<CommissionQuote, DomainError> {
    let amount: Decimal = validate_amount(amount)?;
    Ok(CommissionQuote {
        rate,
        commission_amount: rate.apply(amount)?,
        source: RateSource::Explicit,
    })
}
