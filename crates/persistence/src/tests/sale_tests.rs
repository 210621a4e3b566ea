// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for sale recording, listing, and deletion.

use sales_incentive_domain::{CommissionRate, NewSale, Role, SaleRecord, SaleScope};
use time::macros::date;

use super::{
    create_test_persistence, create_test_rule, create_test_sale_input, create_test_user, dec,
    test_sale_date,
};
use crate::PersistenceError;

#[test]
fn test_create_sale_applies_matching_rule() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);
    create_test_rule(&mut persistence, "Premium Software", "0.12", "10000", None);

    let input = create_test_sale_input(alice.user_id, "Premium Software", "15800", test_sale_date());
    let sale: SaleRecord = persistence
        .create_sale(&input, CommissionRate::default_rate())
        .unwrap();

    assert!(sale.sale_id > 0);
    assert_eq!(sale.user_id, alice.user_id);
    assert_eq!(sale.salesperson, "alice");
    assert_eq!(sale.customer_name, "Acme Corp");
    assert_eq!(sale.amount, dec("15800"));
    assert_eq!(sale.sale_date, test_sale_date());
    assert_eq!(sale.commission_rate.fraction(), dec("0.12"));
    assert_eq!(sale.commission_amount, dec("1896.00"));
}

#[test]
fn test_create_sale_without_rule_uses_default_rate() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);

    let input = create_test_sale_input(alice.user_id, "Gadget", "5000", test_sale_date());
    let sale = persistence
        .create_sale(&input, CommissionRate::default_rate())
        .unwrap();

    assert_eq!(sale.commission_rate.fraction(), dec("0.05"));
    assert_eq!(sale.commission_amount, dec("250.00"));
}

#[test]
fn test_create_sale_uses_configured_default_rate() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);
    let default_rate = CommissionRate::new(dec("0.07")).unwrap();

    let input = create_test_sale_input(alice.user_id, "Gadget", "1000", test_sale_date());
    let sale = persistence.create_sale(&input, default_rate).unwrap();

    assert_eq!(sale.commission_amount, dec("70"));
}

#[test]
fn test_explicit_rate_overrides_rule() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);
    create_test_rule(&mut persistence, "Widget", "0.20", "0", None);

    let explicit = CommissionRate::new(dec("0.03")).unwrap();
    let input = NewSale::new(
        alice.user_id,
        "Acme Corp",
        "Widget",
        dec("1000"),
        test_sale_date(),
        Some(explicit),
    )
    .unwrap();
    let sale = persistence
        .create_sale(&input, CommissionRate::default_rate())
        .unwrap();

    assert_eq!(sale.commission_rate, explicit);
    assert_eq!(sale.commission_amount, dec("30"));
}

#[test]
fn test_rule_change_does_not_recompute_existing_sales() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);
    create_test_rule(&mut persistence, "Widget", "0.10", "0", None);

    let input = create_test_sale_input(alice.user_id, "Widget", "1000", test_sale_date());
    let sale = persistence
        .create_sale(&input, CommissionRate::default_rate())
        .unwrap();

    create_test_rule(&mut persistence, "Widget", "0.50", "0", None);

    let reread = persistence.get_sale(sale.sale_id).unwrap().unwrap();
    assert_eq!(reread.commission_rate.fraction(), dec("0.10"));
    assert_eq!(reread.commission_amount, dec("100"));
}

#[test]
fn test_create_sale_for_missing_owner_fails() {
    let mut persistence = create_test_persistence();

    let input = create_test_sale_input(999, "Widget", "100", test_sale_date());
    let result = persistence.create_sale(&input, CommissionRate::default_rate());

    assert_eq!(result, Err(PersistenceError::UserNotFound(999)));
    assert!(persistence.list_sales(SaleScope::All).unwrap().is_empty());
}

#[test]
fn test_list_sales_orders_by_date_then_insertion_descending() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);

    let first = persistence
        .create_sale(
            &create_test_sale_input(alice.user_id, "A", "100", date!(2026 - 03 - 10)),
            CommissionRate::default_rate(),
        )
        .unwrap();
    let second = persistence
        .create_sale(
            &create_test_sale_input(alice.user_id, "B", "100", date!(2026 - 03 - 20)),
            CommissionRate::default_rate(),
        )
        .unwrap();
    let third = persistence
        .create_sale(
            &create_test_sale_input(alice.user_id, "C", "100", date!(2026 - 03 - 10)),
            CommissionRate::default_rate(),
        )
        .unwrap();

    let ids: Vec<i64> = persistence
        .list_sales(SaleScope::Owner(alice.user_id))
        .unwrap()
        .into_iter()
        .map(|s| s.sale_id)
        .collect();

    assert_eq!(ids, vec![second.sale_id, third.sale_id, first.sale_id]);
}

#[test]
fn test_list_sales_scopes_by_owner() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);
    let bob = create_test_user(&mut persistence, "bob", Role::SalesRep);

    for owner in [alice.user_id, alice.user_id, bob.user_id] {
        persistence
            .create_sale(
                &create_test_sale_input(owner, "Widget", "100", test_sale_date()),
                CommissionRate::default_rate(),
            )
            .unwrap();
    }

    let alice_sales = persistence.list_sales(SaleScope::Owner(alice.user_id)).unwrap();
    assert_eq!(alice_sales.len(), 2);
    assert!(alice_sales.iter().all(|s| s.user_id == alice.user_id));

    assert_eq!(persistence.list_sales(SaleScope::Owner(bob.user_id)).unwrap().len(), 1);
    assert_eq!(persistence.list_sales(SaleScope::All).unwrap().len(), 3);
}

#[test]
fn test_delete_sale_removes_only_that_sale() {
    let mut persistence = create_test_persistence();
    let alice = create_test_user(&mut persistence, "alice", Role::SalesRep);

    let keep = persistence
        .create_sale(
            &create_test_sale_input(alice.user_id, "Widget", "100", test_sale_date()),
            CommissionRate::default_rate(),
        )
        .unwrap();
    let remove = persistence
        .create_sale(
            &create_test_sale_input(alice.user_id, "Widget", "200", test_sale_date()),
            CommissionRate::default_rate(),
        )
        .unwrap();

    persistence.delete_sale(remove.sale_id).unwrap();

    assert!(persistence.get_sale(remove.sale_id).unwrap().is_none());
    assert!(persistence.get_sale(keep.sale_id).unwrap().is_some());
}

#[test]
fn test_delete_missing_sale_fails() {
    let mut persistence = create_test_persistence();

    assert_eq!(
        persistence.delete_sale(7),
        Err(PersistenceError::SaleNotFound(7))
    );
}
