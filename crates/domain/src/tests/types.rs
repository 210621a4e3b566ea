// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::{DomainError, Role, UserProfile};

#[test]
fn test_role_round_trips_through_storage_string() {
    assert_eq!(Role::from_str(Role::Admin.as_str()).unwrap(), Role::Admin);
    assert_eq!(
        Role::from_str(Role::SalesRep.as_str()).unwrap(),
        Role::SalesRep
    );
}

#[test]
fn test_role_parse_is_case_insensitive() {
    assert_eq!(Role::from_str("ADMIN").unwrap(), Role::Admin);
    assert_eq!(Role::from_str(" Sales_Rep ").unwrap(), Role::SalesRep);
}

#[test]
fn test_role_rejects_unknown_value() {
    let result: Result<Role, DomainError> = Role::from_str("manager");
    assert_eq!(
        result.unwrap_err(),
        DomainError::InvalidRole(String::from("manager"))
    );
}

#[test]
fn test_only_admin_is_admin() {
    assert!(Role::Admin.is_admin());
    assert!(!Role::SalesRep.is_admin());
    assert_eq!(Role::default(), Role::SalesRep);
}

#[test]
fn test_user_profile_trims_fields() {
    let profile: UserProfile =
        UserProfile::new("  salesrep ", " salesrep@example.com ", Role::SalesRep).unwrap();
    assert_eq!(profile.username(), "salesrep");
    assert_eq!(profile.email(), "salesrep@example.com");
    assert_eq!(profile.role(), Role::SalesRep);
}

#[test]
fn test_user_profile_rejects_empty_username() {
    let result: Result<UserProfile, DomainError> =
        UserProfile::new("", "demo@example.com", Role::SalesRep);
    assert_eq!(
        result.unwrap_err(),
        DomainError::EmptyField { field: "username" }
    );
}
