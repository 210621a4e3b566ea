// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod bootstrap_tests;
mod initialization_tests;
mod sale_tests;

use rust_decimal::Decimal;
use sales_incentive_domain::{
    AmountWindow, CommissionRate, NewSale, Role, RuleDefinition, User, UserProfile,
};
use std::str::FromStr;
use time::Date;
use time::macros::date;

use crate::SqlitePersistence;

/// A syntactically valid bcrypt hash; persistence never verifies it.
pub const TEST_PASSWORD_HASH: &str =
    "$2b$04$abcdefghijklmnopqrstuuN3sQ7n3rU3m0YV9Kx4G1o3s2Zq8y5eW";

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

pub fn create_test_user(persistence: &mut SqlitePersistence, username: &str, role: Role) -> User {
    let profile: UserProfile =
        UserProfile::new(username, &format!("{username}@company.com"), role).unwrap();
    persistence
        .create_user(&profile, TEST_PASSWORD_HASH)
        .unwrap()
}

pub fn create_test_rule(
    persistence: &mut SqlitePersistence,
    product: &str,
    rate: &str,
    min: &str,
    max: Option<&str>,
) {
    let window: AmountWindow = AmountWindow::new(dec(min), max.map(dec)).unwrap();
    let definition: RuleDefinition =
        RuleDefinition::new(product, CommissionRate::new(dec(rate)).unwrap(), window, None)
            .unwrap();
    persistence.upsert_rule(&definition).unwrap();
}

pub fn create_test_sale_input(owner: i64, product: &str, amount: &str, sale_date: Date) -> NewSale {
    NewSale::new(owner, "Acme Corp", product, dec(amount), sale_date, None).unwrap()
}

pub fn test_sale_date() -> Date {
    date!(2026 - 03 - 15)
}
