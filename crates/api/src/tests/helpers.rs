// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rust_decimal::Decimal;
use sales_incentive_domain::{Role, UserProfile};
use sales_incentive_persistence::SqlitePersistence;
use std::str::FromStr;

use crate::{
    ApiConfig, AuthenticatedActor, BcryptCredentialHasher, CredentialHasher, RecordSaleRequest,
    UpsertRuleRequest,
};

pub const TEST_PASSWORD: &str = "correct-horse";

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn create_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().unwrap()
}

/// A fast hasher for tests.
pub fn create_test_hasher() -> BcryptCredentialHasher {
    BcryptCredentialHasher::new(4) // bcrypt minimum cost (bcrypt::MIN_COST is private)
}

pub fn create_test_config() -> ApiConfig {
    ApiConfig::default()
}

/// Stores a user with `TEST_PASSWORD` and returns the matching actor.
pub fn create_test_actor(
    persistence: &mut SqlitePersistence,
    username: &str,
    role: Role,
) -> AuthenticatedActor {
    let profile: UserProfile =
        UserProfile::new(username, &format!("{username}@company.com"), role).unwrap();
    let hash: String = create_test_hasher().hash(TEST_PASSWORD).unwrap();
    let user = persistence.create_user(&profile, &hash).unwrap();
    AuthenticatedActor::from_user(&user)
}

pub fn create_test_admin(persistence: &mut SqlitePersistence) -> AuthenticatedActor {
    create_test_actor(persistence, "boss", Role::Admin)
}

pub fn create_test_rep(persistence: &mut SqlitePersistence, username: &str) -> AuthenticatedActor {
    create_test_actor(persistence, username, Role::SalesRep)
}

pub fn create_rule_request(
    product: &str,
    rate_percent: &str,
    min: Option<&str>,
) -> UpsertRuleRequest {
    UpsertRuleRequest {
        product_name: product.to_string(),
        rate_percent: dec(rate_percent),
        min_amount: min.map(dec),
        max_amount: None,
        description: None,
    }
}

pub fn create_sale_request(product: &str, amount: &str) -> RecordSaleRequest {
    RecordSaleRequest {
        customer_name: String::from("Acme Corp"),
        product_name: product.to_string(),
        amount: dec(amount),
        sale_date: Some(String::from("2026-03-15")),
        commission_rate_percent: None,
        user_id: None,
    }
}
