// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sale mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use sales_incentive_domain::{
    CommissionQuote, CommissionRate, CommissionRule, NewSale, SaleRecord, format_sale_date,
};
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::sales;
use crate::error::PersistenceError;
use crate::queries::rules::find_rule_by_product;
use crate::queries::sales::get_sale;
use crate::queries::users::get_user_by_id;

/// Records a sale and captures its commission.
///
/// The product's rule is read inside the same transaction as the insert, so
/// the captured rate reflects the rule at the moment of creation. A rate
/// supplied with the sale bypasses the rule lookup.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `new_sale` - The validated sale
/// * `default_rate` - The fallback rate when no rule applies
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the owner does not exist,
/// `PersistenceError::Domain` if the commission cannot be computed, or an
/// error if the insert fails.
pub fn create_sale(
    conn: &mut SqliteConnection,
    new_sale: &NewSale,
    default_rate: CommissionRate,
) -> Result<SaleRecord, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let owner_user_id: i64 = new_sale.owner_user_id();
        if get_user_by_id(conn, owner_user_id)?.is_none() {
            return Err(PersistenceError::UserNotFound(owner_user_id));
        }

        let rule: Option<CommissionRule> = if new_sale.explicit_rate().is_some() {
            None
        } else {
            find_rule_by_product(conn, new_sale.product_name())?
        };

        let quote: CommissionQuote = new_sale.quote(rule.as_ref(), default_rate)?;

        debug!(
            product = new_sale.product_name(),
            rate = %quote.rate,
            source = quote.source.as_str(),
            "Resolved commission"
        );

        diesel::insert_into(sales::table)
            .values((
                sales::user_id.eq(owner_user_id),
                sales::customer_name.eq(new_sale.customer_name()),
                sales::product_name.eq(new_sale.product_name()),
                sales::amount.eq(new_sale.amount().to_string()),
                sales::sale_date.eq(format_sale_date(new_sale.sale_date())),
                sales::commission_rate.eq(quote.rate.fraction().to_string()),
                sales::commission_amount.eq(quote.commission_amount.to_string()),
            ))
            .execute(conn)?;

        let sale_id: i64 = last_insert_rowid(conn)?;

        info!(
            sale_id,
            user_id = owner_user_id,
            amount = %new_sale.amount(),
            commission = %quote.commission_amount,
            "Recorded sale"
        );

        get_sale(conn, sale_id)?.ok_or(PersistenceError::SaleNotFound(sale_id))
    })
}

/// Deletes a single sale.
///
/// # Errors
///
/// Returns `PersistenceError::SaleNotFound` if the sale does not exist, or
/// an error if the delete fails.
pub fn delete_sale(conn: &mut SqliteConnection, sale_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(sales::table)
        .filter(sales::sale_id.eq(sale_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::SaleNotFound(sale_id));
    }

    info!(sale_id, "Deleted sale");
    Ok(())
}

/// Deletes every sale owned by a user.
///
/// Only called from within the user deletion transaction.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub(crate) fn delete_all_sales_for(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<usize, PersistenceError> {
    let rows_affected: usize = diesel::delete(sales::table)
        .filter(sales::user_id.eq(user_id))
        .execute(conn)?;

    debug!(user_id, rows_affected, "Deleted sales for user");
    Ok(rows_affected)
}
