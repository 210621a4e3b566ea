// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sales_incentive_domain::format_sale_date;
use time::OffsetDateTime;

use super::helpers::{
    create_rule_request, create_sale_request, create_test_admin, create_test_config,
    create_test_persistence, create_test_rep, dec,
};
use crate::{ApiError, delete_sale, get_stats, list_sales, record_sale, upsert_rule};

#[test]
fn test_record_sale_applies_default_rate() {
    let mut persistence = create_test_persistence();
    let alice = create_test_rep(&mut persistence, "alice");

    let sale = record_sale(
        &mut persistence,
        &create_test_config(),
        &create_sale_request("Widget", "1000"),
        &alice,
    )
    .unwrap();

    assert_eq!(sale.user_id, alice.user_id);
    assert_eq!(sale.salesperson, "alice");
    assert_eq!(sale.sale_date, "2026-03-15");
    assert_eq!(sale.commission_rate_percent, dec("5"));
    assert_eq!(sale.commission_amount, dec("50"));
}

#[test]
fn test_record_sale_defaults_date_to_today() {
    let mut persistence = create_test_persistence();
    let alice = create_test_rep(&mut persistence, "alice");

    let mut request = create_sale_request("Widget", "1000");
    request.sale_date = None;
    let sale = record_sale(&mut persistence, &create_test_config(), &request, &alice).unwrap();

    let today: String = format_sale_date(OffsetDateTime::now_utc().date());
    assert_eq!(sale.sale_date, today);
}

#[test]
fn test_record_sale_with_explicit_rate_ignores_rule() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let alice = create_test_rep(&mut persistence, "alice");
    upsert_rule(
        &mut persistence,
        &create_rule_request("Widget", "10", None),
        &admin,
    )
    .unwrap();

    let mut request = create_sale_request("Widget", "2000");
    request.commission_rate_percent = Some(dec("7.5"));
    let sale = record_sale(&mut persistence, &create_test_config(), &request, &alice).unwrap();

    assert_eq!(sale.commission_rate_percent, dec("7.5"));
    assert_eq!(sale.commission_amount, dec("150"));
}

#[test]
fn test_record_sale_rejects_bad_input() {
    let mut persistence = create_test_persistence();
    let alice = create_test_rep(&mut persistence, "alice");
    let config = create_test_config();

    let mut bad_date = create_sale_request("Widget", "100");
    bad_date.sale_date = Some(String::from("15/03/2026"));
    assert!(matches!(
        record_sale(&mut persistence, &config, &bad_date, &alice),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "sale_date"
    ));

    let negative = create_sale_request("Widget", "-5");
    assert!(matches!(
        record_sale(&mut persistence, &config, &negative, &alice),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "amount"
    ));

    let mut no_customer = create_sale_request("Widget", "100");
    no_customer.customer_name = String::new();
    assert!(matches!(
        record_sale(&mut persistence, &config, &no_customer, &alice),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "customer_name"
    ));

    let mut high_rate = create_sale_request("Widget", "100");
    high_rate.commission_rate_percent = Some(dec("75"));
    assert!(matches!(
        record_sale(&mut persistence, &config, &high_rate, &alice),
        Err(ApiError::InvalidInput { ref field, .. }) if field == "commission_rate_percent"
    ));

    assert!(list_sales(&mut persistence, None, &alice).unwrap().sales.is_empty());
}

#[test]
fn test_sales_rep_cannot_record_for_another_user() {
    let mut persistence = create_test_persistence();
    let alice = create_test_rep(&mut persistence, "alice");
    let bob = create_test_rep(&mut persistence, "bob");

    let mut request = create_sale_request("Widget", "100");
    request.user_id = Some(bob.user_id);
    let result = record_sale(&mut persistence, &create_test_config(), &request, &alice);

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_admin_records_on_behalf_of_user() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let bob = create_test_rep(&mut persistence, "bob");

    let mut request = create_sale_request("Widget", "100");
    request.user_id = Some(bob.user_id);
    let sale = record_sale(&mut persistence, &create_test_config(), &request, &admin).unwrap();

    assert_eq!(sale.user_id, bob.user_id);
    assert_eq!(sale.salesperson, "bob");
}

#[test]
fn test_admin_recording_for_missing_user_is_not_found() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let mut request = create_sale_request("Widget", "100");
    request.user_id = Some(404);
    let result = record_sale(&mut persistence, &create_test_config(), &request, &admin);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_list_sales_is_scoped_by_role() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let alice = create_test_rep(&mut persistence, "alice");
    let bob = create_test_rep(&mut persistence, "bob");
    let config = create_test_config();
    record_sale(&mut persistence, &config, &create_sale_request("A", "100"), &alice).unwrap();
    record_sale(&mut persistence, &config, &create_sale_request("B", "200"), &bob).unwrap();

    let own = list_sales(&mut persistence, None, &alice).unwrap();
    assert_eq!(own.sales.len(), 1);
    assert_eq!(own.sales[0].product_name, "A");

    assert!(matches!(
        list_sales(&mut persistence, Some(bob.user_id), &alice),
        Err(ApiError::Unauthorized { .. })
    ));

    assert_eq!(list_sales(&mut persistence, None, &admin).unwrap().sales.len(), 2);
    let filtered = list_sales(&mut persistence, Some(bob.user_id), &admin).unwrap();
    assert_eq!(filtered.sales.len(), 1);
    assert_eq!(filtered.sales[0].salesperson, "bob");
}

#[test]
fn test_delete_sale_respects_ownership() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let alice = create_test_rep(&mut persistence, "alice");
    let bob = create_test_rep(&mut persistence, "bob");
    let config = create_test_config();
    let alice_sale = record_sale(&mut persistence, &config, &create_sale_request("A", "100"), &alice)
        .unwrap();
    let bob_sale =
        record_sale(&mut persistence, &config, &create_sale_request("B", "200"), &bob).unwrap();

    assert!(matches!(
        delete_sale(&mut persistence, bob_sale.sale_id, &alice),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(persistence.get_sale(bob_sale.sale_id).unwrap().is_some());

    delete_sale(&mut persistence, alice_sale.sale_id, &alice).unwrap();
    delete_sale(&mut persistence, bob_sale.sale_id, &admin).unwrap();
    assert!(list_sales(&mut persistence, None, &admin).unwrap().sales.is_empty());

    assert!(matches!(
        delete_sale(&mut persistence, bob_sale.sale_id, &admin),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_get_stats_follows_sale_scope() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let alice = create_test_rep(&mut persistence, "alice");
    let bob = create_test_rep(&mut persistence, "bob");
    let config = create_test_config();
    record_sale(&mut persistence, &config, &create_sale_request("A", "100"), &alice).unwrap();
    record_sale(&mut persistence, &config, &create_sale_request("A", "300"), &alice).unwrap();
    record_sale(&mut persistence, &config, &create_sale_request("B", "600"), &bob).unwrap();

    let own = get_stats(&mut persistence, None, &alice).unwrap();
    assert_eq!(own.total_sales, 2);
    assert_eq!(own.total_amount, dec("400"));
    assert_eq!(own.total_commission, dec("20"));
    assert_eq!(own.average_sale, dec("200"));

    let all = get_stats(&mut persistence, None, &admin).unwrap();
    assert_eq!(all.total_sales, 3);
    assert_eq!(all.total_amount, dec("1000"));

    assert!(matches!(
        get_stats(&mut persistence, Some(bob.user_id), &alice),
        Err(ApiError::Unauthorized { .. })
    ));
}

#[test]
fn test_get_stats_with_no_sales_is_zero() {
    let mut persistence = create_test_persistence();
    let alice = create_test_rep(&mut persistence, "alice");

    let stats = get_stats(&mut persistence, None, &alice).unwrap();

    assert_eq!(stats.total_sales, 0);
    assert_eq!(stats.total_amount, dec("0"));
    assert_eq!(stats.average_sale, dec("0"));
}
