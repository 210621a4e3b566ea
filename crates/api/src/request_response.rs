// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Rates cross this boundary as percentages (`12.5` means 12.5%) and are
//! converted to fractions before reaching the domain. Monetary values are
//! serialized as decimal strings so no precision is lost.

use rust_decimal::Decimal;
use sales_incentive_domain::{
    CommissionQuote, CommissionRate, CommissionRule, Role, SaleRecord, SalesStats, User,
    format_sale_date,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Smallest rate, in percent, accepted from callers (0.1%).
#[must_use]
pub fn min_rate_percent() -> Decimal {
    Decimal::new(1, 1)
}

/// Largest rate, in percent, accepted from callers (50%).
#[must_use]
pub fn max_rate_percent() -> Decimal {
    Decimal::new(50, 0)
}

/// Converts a caller-supplied percentage into a validated rate.
///
/// # Arguments
///
/// * `field` - The request field, used in the error
/// * `percent` - The rate in percent
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the percentage is outside
/// the accepted range.
pub fn rate_from_percent(field: &str, percent: Decimal) -> Result<CommissionRate, ApiError> {
    let (min, max): (Decimal, Decimal) = (min_rate_percent(), max_rate_percent());
    if percent < min || percent > max {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Commission rate {percent}% must be between {min}% and {max}%"),
        });
    }
    Ok(CommissionRate::from_percentage(percent)?)
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The login name.
    pub username: String,
    /// The plain-text password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The bearer token for subsequent requests.
    pub session_token: String,
    /// The user's canonical ID.
    pub user_id: i64,
    /// The user's login name.
    pub username: String,
    /// The user's role.
    pub role: Role,
    /// When the session expires (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub expires_at: String,
}

/// API response describing the current session's user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    /// The user's canonical ID.
    pub user_id: i64,
    /// The user's login name.
    pub username: String,
    /// The user's role.
    pub role: Role,
}

/// API request to create a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// The login name.
    pub username: String,
    /// The contact email.
    pub email: String,
    /// The initial plain-text password.
    pub password: String,
    /// `admin` or `sales_rep`.
    pub role: String,
}

/// API request to update a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    /// The new login name.
    pub username: String,
    /// The new contact email.
    pub email: String,
    /// `admin` or `sales_rep`.
    pub role: String,
    /// A new plain-text password; the current one is kept when absent.
    #[serde(default)]
    pub password: Option<String>,
}

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    /// The user's canonical ID.
    pub user_id: i64,
    /// The login name.
    pub username: String,
    /// The contact email.
    pub email: String,
    /// The assigned role.
    pub role: Role,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// A user together with their sales figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// The user.
    #[serde(flatten)]
    pub user: UserResponse,
    /// The user's sales statistics.
    pub stats: SalesStatsResponse,
}

/// API response listing users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    /// Users ordered by username.
    pub users: Vec<UserSummary>,
}

/// API response for a user deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserResponse {
    /// The deleted user's ID.
    pub user_id: i64,
    /// How many of the user's sales were removed.
    pub sales_deleted: usize,
    /// How many of the user's sessions were removed.
    pub sessions_deleted: usize,
    /// A success message.
    pub message: String,
}

/// API request to create or overwrite a commission rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertRuleRequest {
    /// The product the rule applies to.
    pub product_name: String,
    /// The rate in percent.
    pub rate_percent: Decimal,
    /// The inclusive minimum sale amount (defaults to 0).
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    /// The inclusive maximum sale amount (unbounded when absent).
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// API request to activate or deactivate a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRuleActiveRequest {
    /// Whether the rule should apply.
    pub active: bool,
}

/// A commission rule as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleResponse {
    /// The rule's canonical ID.
    pub rule_id: i64,
    /// The product the rule applies to.
    pub product_name: String,
    /// The rate in percent.
    pub rate_percent: Decimal,
    /// The inclusive minimum sale amount.
    pub min_amount: Decimal,
    /// The inclusive maximum sale amount, if bounded.
    pub max_amount: Option<Decimal>,
    /// Free-form description.
    pub description: Option<String>,
    /// Whether the rule currently applies.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<CommissionRule> for RuleResponse {
    fn from(rule: CommissionRule) -> Self {
        Self {
            rule_id: rule.rule_id,
            product_name: rule.product_name,
            rate_percent: rule.rate.as_percentage(),
            min_amount: rule.window.min(),
            max_amount: rule.window.max(),
            description: rule.description,
            is_active: rule.is_active,
            created_at: rule.created_at,
        }
    }
}

/// API response listing commission rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRulesResponse {
    /// Rules ordered by product name.
    pub rules: Vec<RuleResponse>,
}

/// API request to preview the commission for a prospective sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveCommissionRequest {
    /// The product being sold.
    pub product_name: String,
    /// The sale amount.
    pub amount: Decimal,
}

/// API response for a commission preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveCommissionResponse {
    /// The product being sold.
    pub product_name: String,
    /// The sale amount.
    pub amount: Decimal,
    /// The applicable rate in percent.
    pub rate_percent: Decimal,
    /// The commission the sale would earn.
    pub commission_amount: Decimal,
    /// `rule`, `default`, or `explicit`.
    pub source: String,
}

impl ResolveCommissionResponse {
    /// Builds a response from a resolved quote.
    #[must_use]
    pub fn from_quote(product_name: String, amount: Decimal, quote: &CommissionQuote) -> Self {
        Self {
            product_name,
            amount,
            rate_percent: quote.rate.as_percentage(),
            commission_amount: quote.commission_amount,
            source: quote.source.as_str().to_string(),
        }
    }
}

/// API request to record a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSaleRequest {
    /// The customer the sale was made to.
    pub customer_name: String,
    /// The product sold.
    pub product_name: String,
    /// The sale amount.
    pub amount: Decimal,
    /// The sale date (`YYYY-MM-DD`); today (UTC) when absent.
    #[serde(default)]
    pub sale_date: Option<String>,
    /// A manually entered rate in percent that bypasses rule lookup.
    #[serde(default)]
    pub commission_rate_percent: Option<Decimal>,
    /// The owner of the sale; only administrators may name another user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// A sale as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleResponse {
    /// The sale's canonical ID.
    pub sale_id: i64,
    /// The owning user's ID.
    pub user_id: i64,
    /// The owning user's username.
    pub salesperson: String,
    /// The customer.
    pub customer_name: String,
    /// The product.
    pub product_name: String,
    /// The sale amount.
    pub amount: Decimal,
    /// The sale date (`YYYY-MM-DD`).
    pub sale_date: String,
    /// The captured rate in percent.
    pub commission_rate_percent: Decimal,
    /// The captured commission.
    pub commission_amount: Decimal,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<SaleRecord> for SaleResponse {
    fn from(sale: SaleRecord) -> Self {
        Self {
            sale_id: sale.sale_id,
            user_id: sale.user_id,
            salesperson: sale.salesperson,
            customer_name: sale.customer_name,
            product_name: sale.product_name,
            amount: sale.amount,
            sale_date: format_sale_date(sale.sale_date),
            commission_rate_percent: sale.commission_rate.as_percentage(),
            commission_amount: sale.commission_amount,
            created_at: sale.created_at,
        }
    }
}

/// API response listing sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSalesResponse {
    /// Sales, newest first.
    pub sales: Vec<SaleResponse>,
}

/// Aggregate sales figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesStatsResponse {
    /// Number of sales.
    pub total_sales: i64,
    /// Sum of sale amounts.
    pub total_amount: Decimal,
    /// Sum of commissions.
    pub total_commission: Decimal,
    /// Average sale amount, zero when there are no sales.
    pub average_sale: Decimal,
}

impl From<SalesStats> for SalesStatsResponse {
    fn from(stats: SalesStats) -> Self {
        Self {
            total_sales: stats.total_sales,
            total_amount: stats.total_amount,
            total_commission: stats.total_commission,
            average_sale: stats.average_sale,
        }
    }
}

/// API response for the startup bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapResponse {
    /// Whether seeding took place on this run.
    pub seeded: bool,
}
