// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sale queries.
//!
//! Every sale is read joined with its owner so listings can show the
//! salesperson's current username.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::sqlite::Sqlite;
use rust_decimal::Decimal;
use sales_incentive_domain::{
    CommissionRate, DomainError, SaleRecord, SaleScope, parse_decimal, parse_sale_date,
};
use time::Date;
use tracing::debug;

use crate::diesel_schema::{sales, users};
use crate::error::PersistenceError;

/// Diesel Queryable struct for sale rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = sales)]
pub(crate) struct SaleRow {
    sale_id: i64,
    user_id: i64,
    customer_name: String,
    product_name: String,
    amount: String,
    sale_date: String,
    commission_rate: String,
    commission_amount: String,
    created_at: String,
}

impl SaleRow {
    fn parse_parts(&self) -> Result<(Decimal, Date, CommissionRate, Decimal), DomainError> {
        Ok((
            parse_decimal(&self.amount)?,
            parse_sale_date(&self.sale_date)?,
            CommissionRate::new(parse_decimal(&self.commission_rate)?)?,
            parse_decimal(&self.commission_amount)?,
        ))
    }

    pub(crate) fn into_record(self, salesperson: String) -> Result<SaleRecord, PersistenceError> {
        let (amount, sale_date, commission_rate, commission_amount) =
            self.parse_parts().map_err(|e| {
                PersistenceError::CorruptRecord(format!("sale {}: {e}", self.sale_id))
            })?;

        Ok(SaleRecord {
            sale_id: self.sale_id,
            user_id: self.user_id,
            salesperson,
            customer_name: self.customer_name,
            product_name: self.product_name,
            amount,
            sale_date,
            commission_rate,
            commission_amount,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a sale by ID.
///
/// # Errors
///
/// Returns an error if the database query fails or the row is corrupt.
/// Returns `Ok(None)` if the sale is not found.
pub fn get_sale(
    conn: &mut SqliteConnection,
    sale_id: i64,
) -> Result<Option<SaleRecord>, PersistenceError> {
    debug!("Looking up sale by ID: {}", sale_id);

    let result: Result<(SaleRow, String), diesel::result::Error> = sales::table
        .inner_join(users::table)
        .filter(sales::sale_id.eq(sale_id))
        .select((SaleRow::as_select(), users::username))
        .first(conn);

    match result {
        Ok((row, salesperson)) => Ok(Some(row.into_record(salesperson)?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists sales in a scope, newest first.
///
/// Sales are ordered by `sale_date` descending, ties broken by
/// `sale_id` descending.
///
/// # Errors
///
/// Returns an error if the database query fails or a row is corrupt.
pub fn list_sales(
    conn: &mut SqliteConnection,
    scope: SaleScope,
) -> Result<Vec<SaleRecord>, PersistenceError> {
    debug!(?scope, "Listing sales");

    let mut query = sales::table
        .inner_join(users::table)
        .select((SaleRow::as_select(), users::username))
        .order((sales::sale_date.desc(), sales::sale_id.desc()))
        .into_boxed::<Sqlite>();

    if let SaleScope::Owner(user_id) = scope {
        query = query.filter(sales::user_id.eq(user_id));
    }

    let rows: Vec<(SaleRow, String)> = query.load(conn)?;

    rows.into_iter()
        .map(|(row, salesperson)| row.into_record(salesperson))
        .collect()
}
