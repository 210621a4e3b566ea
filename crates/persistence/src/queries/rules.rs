// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission rule queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use sales_incentive_domain::{
    AmountWindow, CommissionRate, CommissionRule, DomainError, parse_decimal,
};
use tracing::debug;

use crate::diesel_schema::commission_rules;
use crate::error::PersistenceError;

/// Diesel Queryable struct for commission rule rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = commission_rules)]
pub(crate) struct RuleRow {
    rule_id: i64,
    product_name: String,
    rate: String,
    min_amount: String,
    max_amount: Option<String>,
    description: Option<String>,
    is_active: i32,
    created_at: String,
}

impl RuleRow {
    fn parse_parts(&self) -> Result<(CommissionRate, AmountWindow), DomainError> {
        let rate: CommissionRate = CommissionRate::new(parse_decimal(&self.rate)?)?;
        let min: Decimal = parse_decimal(&self.min_amount)?;
        let max: Option<Decimal> = self.max_amount.as_deref().map(parse_decimal).transpose()?;
        Ok((rate, AmountWindow::new(min, max)?))
    }

    pub(crate) fn into_rule(self) -> Result<CommissionRule, PersistenceError> {
        let (rate, window): (CommissionRate, AmountWindow) = self.parse_parts().map_err(|e| {
            PersistenceError::CorruptRecord(format!("commission rule {}: {e}", self.rule_id))
        })?;

        Ok(CommissionRule {
            rule_id: self.rule_id,
            product_name: self.product_name,
            rate,
            window,
            description: self.description,
            is_active: self.is_active != 0,
            created_at: self.created_at,
        })
    }
}

/// Retrieves the rule stored for a product, active or not.
///
/// Product names match exactly and case-sensitively.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if no rule exists for the product.
pub fn find_rule_by_product(
    conn: &mut SqliteConnection,
    product_name: &str,
) -> Result<Option<CommissionRule>, PersistenceError> {
    debug!("Looking up commission rule for product: {}", product_name);

    let result: Result<RuleRow, diesel::result::Error> = commission_rules::table
        .filter(commission_rules::product_name.eq(product_name))
        .select(RuleRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_rule()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists active rules ordered by product name.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_active_rules(
    conn: &mut SqliteConnection,
) -> Result<Vec<CommissionRule>, PersistenceError> {
    let rows: Vec<RuleRow> = commission_rules::table
        .filter(commission_rules::is_active.eq(1))
        .select(RuleRow::as_select())
        .order(commission_rules::product_name.asc())
        .load(conn)?;

    rows.into_iter().map(RuleRow::into_rule).collect()
}

/// Lists every rule, including inactive ones, ordered by product name.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_all_rules(
    conn: &mut SqliteConnection,
) -> Result<Vec<CommissionRule>, PersistenceError> {
    let rows: Vec<RuleRow> = commission_rules::table
        .select(RuleRow::as_select())
        .order(commission_rules::product_name.asc())
        .load(conn)?;

    rows.into_iter().map(RuleRow::into_rule).collect()
}
