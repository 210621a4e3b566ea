// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Sales Incentive Tracker.
//!
//! This crate stores users, commission rules, sales, and login sessions in
//! `SQLite` through Diesel.
//!
//! ## Storage Model
//!
//! - Money and rates are stored as canonical decimal text and converted to
//!   `rust_decimal::Decimal` on read, so sums and products stay exact.
//! - Every sale carries the rate and commission captured when it was
//!   recorded. Later rule changes never touch existing sales.
//! - Sales and sessions reference their owner with `ON DELETE CASCADE`;
//!   user deletion additionally removes them explicitly inside one
//!   transaction.
//!
//! ## Testing
//!
//! `Persistence::new_in_memory()` gives every caller its own shared-cache
//! in-memory database, so tests are isolated without touching disk.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use backend::sqlite::JournalMode;
use diesel::SqliteConnection;
use rust_decimal::Decimal;
use sales_incentive_domain::{
    CommissionQuote, CommissionRate, CommissionRule, NewSale, RuleDefinition, SaleRecord,
    SaleScope, SalesStats, User, UserProfile, compute_sales_stats, resolve_commission,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{SessionData, UserCredentials, UserDeletion};
pub use error::PersistenceError;
pub use mutations::bootstrap::{
    BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_RULE_PRODUCT,
};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The `SQLite`-backed persistence adapter.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for users, rules, sales, and sessions.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:sales_incentive_memdb_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open_connection(&shared_memory_url, JournalMode::Rollback)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection =
            backend::sqlite::open_connection(path_str, JournalMode::WriteAhead)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a new user with an already-hashed credential.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateUser` if the username or email is
    /// taken, or an error if the insert fails.
    pub fn create_user(
        &mut self,
        profile: &UserProfile,
        password_hash: &str,
    ) -> Result<User, PersistenceError> {
        mutations::users::create_user(&mut self.conn, profile, password_hash)
    }

    /// Updates a user's profile and optionally their credential hash.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` or
    /// `PersistenceError::DuplicateUser` as appropriate.
    pub fn update_user(
        &mut self,
        user_id: i64,
        profile: &UserProfile,
        password_hash: Option<&str>,
    ) -> Result<User, PersistenceError> {
        mutations::users::update_user(&mut self.conn, user_id, profile, password_hash)
    }

    /// Deletes a user along with their sessions and sales in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if the user does not exist.
    pub fn delete_user(&mut self, user_id: i64) -> Result<UserDeletion, PersistenceError> {
        mutations::users::delete_user_cascade(&mut self.conn, user_id)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<User>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Retrieves a user's credential record by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_credentials(
        &mut self,
        username: &str,
    ) -> Result<Option<UserCredentials>, PersistenceError> {
        queries::users::get_user_credentials(&mut self.conn, username)
    }

    /// Lists every user ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&mut self) -> Result<Vec<User>, PersistenceError> {
        queries::users::list_users(&mut self.conn)
    }

    /// Counts all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    // ========================================================================
    // Commission Rules
    // ========================================================================

    /// Creates or overwrites the rule for a product and reactivates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_rule(
        &mut self,
        definition: &RuleDefinition,
    ) -> Result<CommissionRule, PersistenceError> {
        mutations::rules::upsert_rule(&mut self.conn, definition)
    }

    /// Activates or deactivates the rule for a product.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::RuleNotFound` if no rule exists for the product.
    pub fn set_rule_active(
        &mut self,
        product_name: &str,
        active: bool,
    ) -> Result<CommissionRule, PersistenceError> {
        mutations::rules::set_rule_active(&mut self.conn, product_name, active)
    }

    /// Retrieves the rule stored for a product, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_rule_by_product(
        &mut self,
        product_name: &str,
    ) -> Result<Option<CommissionRule>, PersistenceError> {
        queries::rules::find_rule_by_product(&mut self.conn, product_name)
    }

    /// Lists active rules ordered by product name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_rules(&mut self) -> Result<Vec<CommissionRule>, PersistenceError> {
        queries::rules::list_active_rules(&mut self.conn)
    }

    /// Lists every rule ordered by product name.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_rules(&mut self) -> Result<Vec<CommissionRule>, PersistenceError> {
        queries::rules::list_all_rules(&mut self.conn)
    }

    /// Resolves the commission a sale of `amount` for `product_name` would earn.
    ///
    /// Nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the amount is not positive.
    pub fn resolve_commission(
        &mut self,
        product_name: &str,
        amount: Decimal,
        default_rate: CommissionRate,
    ) -> Result<CommissionQuote, PersistenceError> {
        let rule: Option<CommissionRule> =
            queries::rules::find_rule_by_product(&mut self.conn, product_name)?;
        Ok(resolve_commission(rule.as_ref(), amount, default_rate)?)
    }

    // ========================================================================
    // Sales
    // ========================================================================

    /// Records a sale, capturing its commission in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::UserNotFound` if the owner does not exist,
    /// or an error if the insert fails.
    pub fn create_sale(
        &mut self,
        new_sale: &NewSale,
        default_rate: CommissionRate,
    ) -> Result<SaleRecord, PersistenceError> {
        mutations::sales::create_sale(&mut self.conn, new_sale, default_rate)
    }

    /// Retrieves a sale by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_sale(&mut self, sale_id: i64) -> Result<Option<SaleRecord>, PersistenceError> {
        queries::sales::get_sale(&mut self.conn, sale_id)
    }

    /// Lists sales in a scope, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sales(&mut self, scope: SaleScope) -> Result<Vec<SaleRecord>, PersistenceError> {
        queries::sales::list_sales(&mut self.conn, scope)
    }

    /// Deletes a single sale.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SaleNotFound` if the sale does not exist.
    pub fn delete_sale(&mut self, sale_id: i64) -> Result<(), PersistenceError> {
        mutations::sales::delete_sale(&mut self.conn, sale_id)
    }

    /// Computes statistics over exactly the sales `list_sales` returns for `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a sum overflows.
    pub fn compute_stats(&mut self, scope: SaleScope) -> Result<SalesStats, PersistenceError> {
        let sales: Vec<SaleRecord> = queries::sales::list_sales(&mut self.conn, scope)?;
        Ok(compute_sales_stats(&sales)?)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Refreshes a session's last activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token, returning the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Bootstrap
    // ========================================================================

    /// Seeds the initial administrator and default rule if not already done.
    ///
    /// # Returns
    ///
    /// `true` if seeding took place.
    ///
    /// # Errors
    ///
    /// Returns an error if seeding fails; nothing is written in that case.
    pub fn seed_defaults(&mut self, admin_password_hash: &str) -> Result<bool, PersistenceError> {
        mutations::bootstrap::seed_defaults(&mut self.conn, admin_password_hash)
    }
}
