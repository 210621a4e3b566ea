// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Sales Incentive Tracker.
//!
//! This crate sits between transport adapters and persistence. It owns
//! authentication and authorization, credential hashing, request and
//! response DTOs (including percent to fraction conversion), and the
//! operations themselves.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod config;
mod credentials;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedActor, AuthenticationService, AuthorizationService, format_timestamp,
};
pub use config::ApiConfig;
pub use credentials::{BcryptCredentialHasher, CredentialHasher};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    bootstrap, create_user, delete_sale, delete_user, get_stats, list_rules, list_sales,
    list_users, login, logout, record_sale, resolve_commission, set_rule_active, update_user,
    upsert_rule, whoami,
};
pub use request_response::{
    BootstrapResponse, CreateUserRequest, DeleteUserResponse, ListRulesResponse,
    ListSalesResponse, ListUsersResponse, LoginRequest, LoginResponse, RecordSaleRequest,
    ResolveCommissionRequest, ResolveCommissionResponse, RuleResponse, SaleResponse,
    SalesStatsResponse, SetRuleActiveRequest, UpdateUserRequest, UpsertRuleRequest, UserResponse,
    UserSummary, WhoAmIResponse, max_rate_percent, min_rate_percent, rate_from_percent,
};
pub use sales_incentive_domain::Role;
