// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for role and ownership checks.

use sales_incentive_domain::{Role, SaleScope};

use super::helpers::{
    create_rule_request, create_test_admin, create_test_hasher, create_test_persistence,
    create_test_rep,
};
use crate::{
    ApiError, AuthError, AuthenticatedActor, AuthorizationService, CreateUserRequest,
    SetRuleActiveRequest, create_user, delete_user, list_users, set_rule_active, upsert_rule,
};

fn create_rep_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(2, String::from("alice"), Role::SalesRep)
}

fn create_admin_actor() -> AuthenticatedActor {
    AuthenticatedActor::new(1, String::from("boss"), Role::Admin)
}

#[test]
fn test_require_admin_accepts_admin() {
    assert!(AuthorizationService::require_admin(&create_admin_actor(), "list_users").is_ok());
}

#[test]
fn test_require_admin_rejects_sales_rep() {
    let result = AuthorizationService::require_admin(&create_rep_actor(), "list_users");

    assert_eq!(
        result,
        Err(AuthError::Unauthorized {
            action: String::from("list_users"),
            required_role: String::from("admin"),
        })
    );
}

#[test]
fn test_owner_access_allows_own_records_and_admins() {
    let rep = create_rep_actor();
    let admin = create_admin_actor();

    assert!(AuthorizationService::authorize_owner_access(&rep, 2, "delete_sale").is_ok());
    assert!(AuthorizationService::authorize_owner_access(&rep, 3, "delete_sale").is_err());
    assert!(AuthorizationService::authorize_owner_access(&admin, 3, "delete_sale").is_ok());
}

#[test]
fn test_sale_scope_for_sales_rep() {
    let rep = create_rep_actor();

    assert_eq!(
        AuthorizationService::resolve_sale_scope(&rep, None, "list_sales"),
        Ok(SaleScope::Owner(2))
    );
    assert_eq!(
        AuthorizationService::resolve_sale_scope(&rep, Some(2), "list_sales"),
        Ok(SaleScope::Owner(2))
    );
    assert!(matches!(
        AuthorizationService::resolve_sale_scope(&rep, Some(3), "list_sales"),
        Err(AuthError::Unauthorized { .. })
    ));
}

#[test]
fn test_sale_scope_for_admin() {
    let admin = create_admin_actor();

    assert_eq!(
        AuthorizationService::resolve_sale_scope(&admin, None, "list_sales"),
        Ok(SaleScope::All)
    );
    assert_eq!(
        AuthorizationService::resolve_sale_scope(&admin, Some(7), "list_sales"),
        Ok(SaleScope::Owner(7))
    );
}

#[test]
fn test_sales_rep_cannot_call_admin_operations() {
    let mut persistence = create_test_persistence();
    let rep = create_test_rep(&mut persistence, "alice");
    let admin = create_test_admin(&mut persistence);
    let hasher = create_test_hasher();

    let request = CreateUserRequest {
        username: String::from("eve"),
        email: String::from("eve@company.com"),
        password: String::from("secret"),
        role: String::from("admin"),
    };

    assert!(matches!(
        create_user(&mut persistence, &hasher, &request, &rep),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        list_users(&mut persistence, &rep),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        delete_user(&mut persistence, admin.user_id, &rep),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        upsert_rule(
            &mut persistence,
            &create_rule_request("Widget", "10", None),
            &rep
        ),
        Err(ApiError::Unauthorized { .. })
    ));
    assert!(matches!(
        set_rule_active(
            &mut persistence,
            "Widget",
            &SetRuleActiveRequest { active: false },
            &rep
        ),
        Err(ApiError::Unauthorized { .. })
    ));

    // Nothing was written by the rejected calls
    assert_eq!(persistence.count_users().unwrap(), 2);
    assert!(persistence.list_all_rules().unwrap().is_empty());
}
