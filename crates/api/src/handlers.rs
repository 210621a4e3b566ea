// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Every operation takes the request-scoped `AuthenticatedActor`, checks
//! role and ownership first, and only then touches persistence.

use rust_decimal::Decimal;
use sales_incentive_domain::{
    AmountWindow, CommissionQuote, CommissionRate, CommissionRule, NewSale, Role, RuleDefinition,
    SaleRecord, SaleScope, SalesStats, User, UserProfile, parse_sale_date, validate_required,
};
use sales_incentive_persistence::{SqlitePersistence, UserDeletion};
use std::str::FromStr;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::config::ApiConfig;
use crate::credentials::CredentialHasher;
use crate::error::ApiError;
use crate::request_response::{
    BootstrapResponse, CreateUserRequest, DeleteUserResponse, ListRulesResponse,
    ListSalesResponse, ListUsersResponse, LoginRequest, LoginResponse, RecordSaleRequest,
    ResolveCommissionRequest, ResolveCommissionResponse, RuleResponse, SaleResponse,
    SalesStatsResponse, SetRuleActiveRequest, UpdateUserRequest, UpsertRuleRequest, UserResponse,
    UserSummary, WhoAmIResponse, rate_from_percent,
};

// ============================================================================
// Authentication
// ============================================================================

/// Logs a user in and opens a session.
///
/// # Errors
///
/// Returns `ApiError::AuthenticationFailed` with a generic message if the
/// username is unknown or the password is wrong.
pub fn login(
    persistence: &mut SqlitePersistence,
    hasher: &dyn CredentialHasher,
    config: &ApiConfig,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor, expires_at): (String, AuthenticatedActor, String) =
        AuthenticationService::login(
            persistence,
            hasher,
            &request.username,
            &request.password,
            config.session_ttl,
        )?;

    Ok(LoginResponse {
        session_token,
        user_id: actor.user_id,
        username: actor.username,
        role: actor.role,
        expires_at,
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut SqlitePersistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the current session's user.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor) -> WhoAmIResponse {
    WhoAmIResponse {
        user_id: actor.user_id,
        username: actor.username.clone(),
        role: actor.role,
    }
}

/// Seeds the initial administrator and default rule if not already done.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `hasher` - Hashes the administrator password
/// * `admin_password` - The plain-text administrator password
///
/// # Errors
///
/// Returns an error if hashing or seeding fails.
pub fn bootstrap(
    persistence: &mut SqlitePersistence,
    hasher: &dyn CredentialHasher,
    admin_password: &str,
) -> Result<BootstrapResponse, ApiError> {
    let admin_password: String = validate_required("admin_password", admin_password)?;
    let password_hash: String = hasher.hash(&admin_password)?;
    let seeded: bool = persistence.seed_defaults(&password_hash)?;
    Ok(BootstrapResponse { seeded })
}

// ============================================================================
// Users
// ============================================================================

fn parse_role(role: &str) -> Result<Role, ApiError> {
    Ok(Role::from_str(role)?)
}

/// Creates a user. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the input is invalid, or
/// the username or email is already taken.
pub fn create_user(
    persistence: &mut SqlitePersistence,
    hasher: &dyn CredentialHasher,
    request: &CreateUserRequest,
    actor: &AuthenticatedActor,
) -> Result<UserResponse, ApiError> {
    AuthorizationService::require_admin(actor, "create_user")?;

    let profile: UserProfile =
        UserProfile::new(&request.username, &request.email, parse_role(&request.role)?)?;
    let password: String = validate_required("password", &request.password)?;
    let password_hash: String = hasher.hash(&password)?;

    let user: User = persistence.create_user(&profile, &password_hash)?;

    info!(
        actor = actor.user_id,
        user_id = user.user_id,
        role = user.role.as_str(),
        "Admin created user"
    );

    Ok(UserResponse::from(user))
}

/// Lists all users with their sales statistics. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a query fails.
pub fn list_users(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::require_admin(actor, "list_users")?;

    let users: Vec<User> = persistence.list_users()?;
    let mut summaries: Vec<UserSummary> = Vec::with_capacity(users.len());

    for user in users {
        let stats: SalesStats = persistence.compute_stats(SaleScope::Owner(user.user_id))?;
        summaries.push(UserSummary {
            user: UserResponse::from(user),
            stats: SalesStatsResponse::from(stats),
        });
    }

    Ok(ListUsersResponse { users: summaries })
}

/// Updates a user's profile and optionally their password. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the input is invalid, the
/// user does not exist, or the username or email belongs to another user.
pub fn update_user(
    persistence: &mut SqlitePersistence,
    hasher: &dyn CredentialHasher,
    user_id: i64,
    request: &UpdateUserRequest,
    actor: &AuthenticatedActor,
) -> Result<UserResponse, ApiError> {
    AuthorizationService::require_admin(actor, "update_user")?;

    let profile: UserProfile =
        UserProfile::new(&request.username, &request.email, parse_role(&request.role)?)?;

    let password_hash: Option<String> = match request.password.as_deref() {
        Some(password) if !password.trim().is_empty() => Some(hasher.hash(password.trim())?),
        _ => None,
    };

    let user: User = persistence.update_user(user_id, &profile, password_hash.as_deref())?;

    info!(actor = actor.user_id, user_id, "Admin updated user");

    Ok(UserResponse::from(user))
}

/// Deletes a user together with their sales and sessions. Admin only.
///
/// # Errors
///
/// Returns `ApiError::SelfDeletion` if an admin targets their own account,
/// or an error if the actor is not an admin or the user does not exist.
pub fn delete_user(
    persistence: &mut SqlitePersistence,
    user_id: i64,
    actor: &AuthenticatedActor,
) -> Result<DeleteUserResponse, ApiError> {
    AuthorizationService::require_admin(actor, "delete_user")?;

    if actor.user_id == user_id {
        warn!(user_id, "Rejected self-deletion");
        return Err(ApiError::SelfDeletion { user_id });
    }

    let deletion: UserDeletion = persistence.delete_user(user_id)?;

    info!(
        actor = actor.user_id,
        user_id,
        sales_deleted = deletion.sales_deleted,
        "Admin deleted user"
    );

    Ok(DeleteUserResponse {
        user_id,
        sales_deleted: deletion.sales_deleted,
        sessions_deleted: deletion.sessions_deleted,
        message: format!(
            "Deleted user {user_id} and {} sale(s)",
            deletion.sales_deleted
        ),
    })
}

// ============================================================================
// Commission Rules
// ============================================================================

/// Creates or overwrites the commission rule for a product. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the rule is invalid.
pub fn upsert_rule(
    persistence: &mut SqlitePersistence,
    request: &UpsertRuleRequest,
    actor: &AuthenticatedActor,
) -> Result<RuleResponse, ApiError> {
    AuthorizationService::require_admin(actor, "upsert_rule")?;

    let rate: CommissionRate = rate_from_percent("rate_percent", request.rate_percent)?;
    let window: AmountWindow = AmountWindow::new(
        request.min_amount.unwrap_or(Decimal::ZERO),
        request.max_amount,
    )?;
    let definition: RuleDefinition = RuleDefinition::new(
        &request.product_name,
        rate,
        window,
        request.description.as_deref(),
    )?;

    let rule: CommissionRule = persistence.upsert_rule(&definition)?;

    info!(
        actor = actor.user_id,
        rule_id = rule.rule_id,
        product = %rule.product_name,
        "Admin saved commission rule"
    );

    Ok(RuleResponse::from(rule))
}

/// Lists commission rules.
///
/// Administrators see every rule; sales reps see only active ones.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_rules(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
) -> Result<ListRulesResponse, ApiError> {
    let rules: Vec<CommissionRule> = if actor.is_admin() {
        persistence.list_all_rules()?
    } else {
        persistence.list_active_rules()?
    };

    Ok(ListRulesResponse {
        rules: rules.into_iter().map(RuleResponse::from).collect(),
    })
}

/// Activates or deactivates the rule for a product. Admin only.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or no rule exists for the
/// product.
pub fn set_rule_active(
    persistence: &mut SqlitePersistence,
    product_name: &str,
    request: &SetRuleActiveRequest,
    actor: &AuthenticatedActor,
) -> Result<RuleResponse, ApiError> {
    AuthorizationService::require_admin(actor, "set_rule_active")?;

    let rule: CommissionRule = persistence.set_rule_active(product_name, request.active)?;

    info!(
        actor = actor.user_id,
        product = product_name,
        active = request.active,
        "Admin changed rule activation"
    );

    Ok(RuleResponse::from(rule))
}

/// Previews the commission a sale would earn without recording it.
///
/// # Errors
///
/// Returns an error if the input is invalid or the query fails.
pub fn resolve_commission(
    persistence: &mut SqlitePersistence,
    config: &ApiConfig,
    request: &ResolveCommissionRequest,
    _actor: &AuthenticatedActor,
) -> Result<ResolveCommissionResponse, ApiError> {
    let product_name: String = validate_required("product_name", &request.product_name)?;
    let quote: CommissionQuote =
        persistence.resolve_commission(&product_name, request.amount, config.default_rate)?;

    Ok(ResolveCommissionResponse::from_quote(
        product_name,
        request.amount,
        &quote,
    ))
}

// ============================================================================
// Sales
// ============================================================================

/// Records a sale and captures its commission.
///
/// The sale belongs to the actor unless an administrator names another
/// owner. The sale date defaults to today (UTC).
///
/// # Errors
///
/// Returns an error if a sales rep records for someone else, the input is
/// invalid, or the owner does not exist.
pub fn record_sale(
    persistence: &mut SqlitePersistence,
    config: &ApiConfig,
    request: &RecordSaleRequest,
    actor: &AuthenticatedActor,
) -> Result<SaleResponse, ApiError> {
    let owner_user_id: i64 = request.user_id.unwrap_or(actor.user_id);
    AuthorizationService::authorize_owner_access(actor, owner_user_id, "record_sale")?;

    let sale_date: Date = match request.sale_date.as_deref() {
        Some(date) if !date.trim().is_empty() => parse_sale_date(date)?,
        _ => OffsetDateTime::now_utc().date(),
    };

    let explicit_rate: Option<CommissionRate> = request
        .commission_rate_percent
        .map(|percent| rate_from_percent("commission_rate_percent", percent))
        .transpose()?;

    let new_sale: NewSale = NewSale::new(
        owner_user_id,
        &request.customer_name,
        &request.product_name,
        request.amount,
        sale_date,
        explicit_rate,
    )?;

    let sale: SaleRecord = persistence.create_sale(&new_sale, config.default_rate)?;

    info!(
        actor = actor.user_id,
        sale_id = sale.sale_id,
        owner = owner_user_id,
        "Recorded sale"
    );

    Ok(SaleResponse::from(sale))
}

/// Lists sales, newest first.
///
/// Sales reps see only their own sales and may not ask for another user's.
/// Administrators see every sale, or one user's when `user_id` is given.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if a sales rep asks for another user's
/// sales, or an error if the query fails.
pub fn list_sales(
    persistence: &mut SqlitePersistence,
    user_id: Option<i64>,
    actor: &AuthenticatedActor,
) -> Result<ListSalesResponse, ApiError> {
    let scope: SaleScope = AuthorizationService::resolve_sale_scope(actor, user_id, "list_sales")?;
    let sales: Vec<SaleRecord> = persistence.list_sales(scope)?;

    Ok(ListSalesResponse {
        sales: sales.into_iter().map(SaleResponse::from).collect(),
    })
}

/// Deletes a single sale.
///
/// Sales reps may delete only their own sales.
///
/// # Errors
///
/// Returns an error if the sale does not exist or belongs to another user
/// and the actor is not an admin.
pub fn delete_sale(
    persistence: &mut SqlitePersistence,
    sale_id: i64,
    actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let sale: SaleRecord = persistence
        .get_sale(sale_id)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Sale"),
            message: format!("Sale {sale_id} does not exist"),
        })?;

    AuthorizationService::authorize_owner_access(actor, sale.user_id, "delete_sale")?;

    persistence.delete_sale(sale_id)?;

    info!(actor = actor.user_id, sale_id, "Deleted sale");
    Ok(())
}

/// Computes sales statistics over the same scope `list_sales` would use.
///
/// # Errors
///
/// Returns `ApiError::Unauthorized` if a sales rep asks for another user's
/// statistics, or an error if the query fails.
pub fn get_stats(
    persistence: &mut SqlitePersistence,
    user_id: Option<i64>,
    actor: &AuthenticatedActor,
) -> Result<SalesStatsResponse, ApiError> {
    let scope: SaleScope = AuthorizationService::resolve_sale_scope(actor, user_id, "get_stats")?;
    let stats: SalesStats = persistence.compute_stats(scope)?;
    Ok(SalesStatsResponse::from(stats))
}
