// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Commission rule mutations.

use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use sales_incentive_domain::{CommissionRule, RuleDefinition};
use tracing::info;

use crate::diesel_schema::commission_rules;
use crate::error::PersistenceError;
use crate::queries::rules::find_rule_by_product;

/// Creates or overwrites the rule for a product.
///
/// If a rule already exists for the product name, its rate, window, and
/// description are replaced in place and the rule is reactivated. Otherwise a
/// new active rule is inserted. There is at most one rule per product.
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_rule(
    conn: &mut SqliteConnection,
    definition: &RuleDefinition,
) -> Result<CommissionRule, PersistenceError> {
    let rate: String = definition.rate().fraction().to_string();
    let min_amount: String = definition.window().min().to_string();
    let max_amount: Option<String> = definition.window().max().map(|max| max.to_string());

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let existing: Option<CommissionRule> =
            find_rule_by_product(conn, definition.product_name())?;

        if let Some(rule) = existing {
            diesel::update(commission_rules::table)
                .filter(commission_rules::rule_id.eq(rule.rule_id))
                .set((
                    commission_rules::rate.eq(&rate),
                    commission_rules::min_amount.eq(&min_amount),
                    commission_rules::max_amount.eq(max_amount.as_deref()),
                    commission_rules::description.eq(definition.description()),
                    commission_rules::is_active.eq(1),
                    commission_rules::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
                ))
                .execute(conn)?;

            info!(
                rule_id = rule.rule_id,
                product = definition.product_name(),
                rate = %rate,
                "Updated commission rule"
            );
        } else {
            diesel::insert_into(commission_rules::table)
                .values((
                    commission_rules::product_name.eq(definition.product_name()),
                    commission_rules::rate.eq(&rate),
                    commission_rules::min_amount.eq(&min_amount),
                    commission_rules::max_amount.eq(max_amount.as_deref()),
                    commission_rules::description.eq(definition.description()),
                ))
                .execute(conn)?;

            info!(
                product = definition.product_name(),
                rate = %rate,
                "Created commission rule"
            );
        }

        find_rule_by_product(conn, definition.product_name())?
            .ok_or_else(|| PersistenceError::RuleNotFound(definition.product_name().to_string()))
    })
}

/// Activates or deactivates the rule for a product.
///
/// # Errors
///
/// Returns `PersistenceError::RuleNotFound` if no rule exists for the
/// product, or an error if the update fails.
pub fn set_rule_active(
    conn: &mut SqliteConnection,
    product_name: &str,
    active: bool,
) -> Result<CommissionRule, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows_affected: usize = diesel::update(commission_rules::table)
            .filter(commission_rules::product_name.eq(product_name))
            .set((
                commission_rules::is_active.eq(i32::from(active)),
                commission_rules::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

        if rows_affected == 0 {
            return Err(PersistenceError::RuleNotFound(product_name.to_string()));
        }

        info!(product = product_name, active, "Changed commission rule activation");

        find_rule_by_product(conn, product_name)?
            .ok_or_else(|| PersistenceError::RuleNotFound(product_name.to_string()))
    })
}
