// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod types;

use rust_decimal::Decimal;
use std::str::FromStr;
use time::Date;

use crate::{AmountWindow, CommissionRate, CommissionRule, SaleRecord};

/// Parses a decimal literal for test fixtures.
pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn create_test_rule(product: &str, rate: &str, min: &str, max: Option<&str>) -> CommissionRule {
    CommissionRule {
        rule_id: 1,
        product_name: product.to_string(),
        rate: CommissionRate::new(dec(rate)).unwrap(),
        window: AmountWindow::new(dec(min), max.map(dec)).unwrap(),
        description: None,
        is_active: true,
        created_at: String::from("2024-01-01 00:00:00"),
    }
}

pub fn create_test_sale(sale_id: i64, amount: &str, commission: &str) -> SaleRecord {
    SaleRecord {
        sale_id,
        user_id: 1,
        salesperson: String::from("salesrep"),
        customer_name: String::from("Nestle India"),
        product_name: String::from("Cloud Analytics Suite"),
        amount: dec(amount),
        sale_date: Date::from_calendar_date(2024, time::Month::January, 15).unwrap(),
        commission_rate: CommissionRate::new(dec("0.10")).unwrap(),
        commission_amount: dec(commission),
        created_at: String::from("2024-01-15 10:00:00"),
    }
}
