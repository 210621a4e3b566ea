// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::sale::SaleRecord;
use rust_decimal::Decimal;

/// Aggregate figures over a set of sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesStats {
    /// Number of sales.
    pub total_sales: i64,
    /// Sum of sale amounts.
    pub total_amount: Decimal,
    /// Sum of commission amounts.
    pub total_commission: Decimal,
    /// `total_amount / total_sales`, or zero when there are no sales.
    pub average_sale: Decimal,
}

/// Computes statistics over a set of sales.
///
/// Zero is the identity for every field, so an empty set yields all zeros.
///
/// # Errors
///
/// Returns `DomainError::ArithmeticOverflow` if a sum leaves the decimal range.
pub fn compute_sales_stats<'a, I>(sales: I) -> Result<SalesStats, DomainError>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut stats: SalesStats = SalesStats::default();

    for sale in sales {
        stats.total_sales += 1;
        stats.total_amount = stats
            .total_amount
            .checked_add(sale.amount)
            .ok_or(DomainError::ArithmeticOverflow {
                operation: "summing sale amounts",
            })?;
        stats.total_commission = stats
            .total_commission
            .checked_add(sale.commission_amount)
            .ok_or(DomainError::ArithmeticOverflow {
                operation: "summing commission amounts",
            })?;
    }

    if stats.total_sales > 0 {
        stats.average_sale = stats
            .total_amount
            .checked_div(Decimal::from(stats.total_sales))
            .ok_or(DomainError::ArithmeticOverflow {
                operation: "averaging sale amounts",
            })?;
    }

    Ok(stats)
}
