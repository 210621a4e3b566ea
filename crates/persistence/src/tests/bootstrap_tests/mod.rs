// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for initial seeding.

use sales_incentive_domain::Role;

use super::{TEST_PASSWORD_HASH, create_test_persistence, create_test_rule, dec};
use crate::{BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_RULE_PRODUCT};

#[test]
fn test_seed_defaults_creates_admin_and_rule() {
    let mut persistence = create_test_persistence();

    let seeded = persistence.seed_defaults(TEST_PASSWORD_HASH).unwrap();
    assert!(seeded);

    let admin = persistence
        .get_user_credentials(BOOTSTRAP_ADMIN_USERNAME)
        .unwrap()
        .unwrap();
    assert_eq!(admin.user.email, BOOTSTRAP_ADMIN_EMAIL);
    assert_eq!(admin.user.role, Role::Admin);
    assert_eq!(admin.password_hash, TEST_PASSWORD_HASH);

    let rule = persistence
        .find_rule_by_product(BOOTSTRAP_RULE_PRODUCT)
        .unwrap()
        .unwrap();
    assert_eq!(rule.rate.fraction(), dec("0.05"));
    assert_eq!(rule.window.min(), dec("0"));
    assert!(rule.is_active);
}

#[test]
fn test_seed_defaults_is_idempotent() {
    let mut persistence = create_test_persistence();

    assert!(persistence.seed_defaults(TEST_PASSWORD_HASH).unwrap());
    assert!(!persistence.seed_defaults("$2b$04$different").unwrap());

    assert_eq!(persistence.count_users().unwrap(), 1);
    assert_eq!(persistence.list_all_rules().unwrap().len(), 1);
    let admin = persistence
        .get_user_credentials(BOOTSTRAP_ADMIN_USERNAME)
        .unwrap()
        .unwrap();
    assert_eq!(admin.password_hash, TEST_PASSWORD_HASH);
}

#[test]
fn test_seed_defaults_keeps_existing_rule() {
    let mut persistence = create_test_persistence();
    create_test_rule(&mut persistence, BOOTSTRAP_RULE_PRODUCT, "0.09", "0", None);

    persistence.seed_defaults(TEST_PASSWORD_HASH).unwrap();

    let rule = persistence
        .find_rule_by_product(BOOTSTRAP_RULE_PRODUCT)
        .unwrap()
        .unwrap();
    assert_eq!(rule.rate.fraction(), dec("0.09"));
}
