// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Initial seeding.

use diesel::SqliteConnection;
use diesel::prelude::*;
use sales_incentive_domain::{
    AmountWindow, CommissionRate, Role, RuleDefinition, UserProfile,
};
use tracing::info;

use crate::error::PersistenceError;
use crate::mutations::rules::upsert_rule;
use crate::mutations::users::create_user;
use crate::queries::rules::find_rule_by_product;
use crate::queries::users::get_user_credentials;

/// Username of the seeded administrator.
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";
/// Email of the seeded administrator.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@company.com";
/// Product name of the seeded default rule.
pub const BOOTSTRAP_RULE_PRODUCT: &str = "Standard Commission";

/// Seeds the initial administrator and default commission rule.
///
/// Does nothing when a user named `admin` already exists. The default rule
/// is only inserted if no rule exists for its product yet.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `admin_password_hash` - The hashed credential for the administrator
///
/// # Returns
///
/// `true` if seeding took place, `false` if it was already done.
///
/// # Errors
///
/// Returns an error if any insert fails. Nothing is written in that case.
pub fn seed_defaults(
    conn: &mut SqliteConnection,
    admin_password_hash: &str,
) -> Result<bool, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if get_user_credentials(conn, BOOTSTRAP_ADMIN_USERNAME)?.is_some() {
            info!("Bootstrap already complete, skipping seeding");
            return Ok(false);
        }

        let profile: UserProfile =
            UserProfile::new(BOOTSTRAP_ADMIN_USERNAME, BOOTSTRAP_ADMIN_EMAIL, Role::Admin)?;
        create_user(conn, &profile, admin_password_hash)?;

        if find_rule_by_product(conn, BOOTSTRAP_RULE_PRODUCT)?.is_none() {
            let definition: RuleDefinition = RuleDefinition::new(
                BOOTSTRAP_RULE_PRODUCT,
                CommissionRate::default_rate(),
                AmountWindow::unbounded(),
                Some("Default commission for all products"),
            )?;
            upsert_rule(conn, &definition)?;
        }

        info!(
            username = BOOTSTRAP_ADMIN_USERNAME,
            product = BOOTSTRAP_RULE_PRODUCT,
            "Seeded initial administrator and default commission rule"
        );
        Ok(true)
    })
}
