// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::commission::{
    CommissionQuote, CommissionRate, CommissionRule, explicit_commission, resolve_commission,
};
use crate::error::DomainError;
use crate::validation::{validate_amount, validate_required};
use rust_decimal::Decimal;
use time::Date;

/// A recorded sale.
///
/// `commission_rate` and `commission_amount` are captured when the sale is
/// created and are never recomputed, even if the product's rule changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRecord {
    /// The canonical numeric identifier assigned by the database.
    pub sale_id: i64,
    /// The owning user.
    pub user_id: i64,
    /// The owning user's username at read time.
    pub salesperson: String,
    /// The customer the sale was made to.
    pub customer_name: String,
    /// The product sold.
    pub product_name: String,
    /// The sale amount.
    pub amount: Decimal,
    /// The calendar date of the sale.
    pub sale_date: Date,
    /// The rate applied at creation.
    pub commission_rate: CommissionRate,
    /// `amount × commission_rate`, computed at creation.
    pub commission_amount: Decimal,
    /// Creation timestamp as recorded by the database.
    pub created_at: String,
}

/// Validated input for recording a sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    owner_user_id: i64,
    customer_name: String,
    product_name: String,
    amount: Decimal,
    sale_date: Date,
    explicit_rate: Option<CommissionRate>,
}

impl NewSale {
    /// Creates a validated sale.
    ///
    /// # Arguments
    ///
    /// * `owner_user_id` - The user who made the sale
    /// * `customer_name` - The customer (required)
    /// * `product_name` - The product (required)
    /// * `amount` - The sale amount (must be positive)
    /// * `sale_date` - The calendar date of the sale
    /// * `explicit_rate` - A manually entered rate that bypasses rule lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a required field is empty or the amount is not positive.
    pub fn new(
        owner_user_id: i64,
        customer_name: &str,
        product_name: &str,
        amount: Decimal,
        sale_date: Date,
        explicit_rate: Option<CommissionRate>,
    ) -> Result<Self, DomainError> {
        let customer_name: String = validate_required("customer_name", customer_name)?;
        let product_name: String = validate_required("product_name", product_name)?;
        let amount: Decimal = validate_amount(amount)?;

        Ok(Self {
            owner_user_id,
            customer_name,
            product_name,
            amount,
            sale_date,
            explicit_rate,
        })
    }

    /// Returns the owning user ID.
    #[must_use]
    pub const fn owner_user_id(&self) -> i64 {
        self.owner_user_id
    }

    /// Returns the customer name.
    #[must_use]
    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    /// Returns the product name.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Returns the sale amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the sale date.
    #[must_use]
    pub const fn sale_date(&self) -> Date {
        self.sale_date
    }

    /// Returns the manually entered rate, if any.
    #[must_use]
    pub const fn explicit_rate(&self) -> Option<CommissionRate> {
        self.explicit_rate
    }

    /// Prices this sale.
    ///
    /// An explicit rate always wins; otherwise the product's rule (if one
    /// applies) or the default rate is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the commission computation overflows.
    pub fn quote(
        &self,
        rule: Option<&CommissionRule>,
        default_rate: CommissionRate,
    ) -> Result<CommissionQuote, DomainError> {
        match self.explicit_rate {
            Some(rate) => explicit_commission(self.amount, rate),
            None => resolve_commission(rule, self.amount, default_rate),
        }
    }
}

/// Which sales a listing or statistics query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleScope {
    /// Only sales owned by this user.
    Owner(i64),
    /// Every sale.
    All,
}

impl SaleScope {
    /// Builds a scope from an optional user filter.
    #[must_use]
    pub const fn from_user(user_id: Option<i64>) -> Self {
        match user_id {
            Some(id) => Self::Owner(id),
            None => Self::All,
        }
    }
}
