// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use sales_incentive_domain::{User, UserProfile};
use tracing::info;

use crate::backend::sqlite::last_insert_rowid;
use crate::data_models::UserDeletion;
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::mutations::sales::delete_all_sales_for;
use crate::queries::users::{get_user_by_id, is_identity_taken};

/// Maps a unique-index violation on `users` to `DuplicateUser`.
fn map_user_write_error(err: DieselError, profile: &UserProfile) -> PersistenceError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            PersistenceError::DuplicateUser {
                username: profile.username().to_string(),
                email: profile.email().to_string(),
            }
        }
        other => PersistenceError::from(other),
    }
}

/// Creates a new user.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `profile` - The validated username, email, and role
/// * `password_hash` - The already-hashed credential
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateUser` if the username or email is
/// already taken, or an error if the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    profile: &UserProfile,
    password_hash: &str,
) -> Result<User, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if is_identity_taken(conn, profile.username(), profile.email(), None)? {
            return Err(PersistenceError::DuplicateUser {
                username: profile.username().to_string(),
                email: profile.email().to_string(),
            });
        }

        diesel::insert_into(users::table)
            .values((
                users::username.eq(profile.username()),
                users::email.eq(profile.email()),
                users::password_hash.eq(password_hash),
                users::role.eq(profile.role().as_str()),
            ))
            .execute(conn)
            .map_err(|e| map_user_write_error(e, profile))?;

        let user_id: i64 = last_insert_rowid(conn)?;

        info!(
            user_id,
            username = profile.username(),
            role = profile.role().as_str(),
            "Created user"
        );

        get_user_by_id(conn, user_id)?.ok_or(PersistenceError::UserNotFound(user_id))
    })
}

/// Updates a user's username, email, and role, and optionally their credential.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The user to update
/// * `profile` - The new validated profile
/// * `password_hash` - A replacement credential hash, if the password changes
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the user does not exist,
/// `PersistenceError::DuplicateUser` if another user holds the username or
/// email, or an error if the update fails.
pub fn update_user(
    conn: &mut SqliteConnection,
    user_id: i64,
    profile: &UserProfile,
    password_hash: Option<&str>,
) -> Result<User, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if get_user_by_id(conn, user_id)?.is_none() {
            return Err(PersistenceError::UserNotFound(user_id));
        }

        if is_identity_taken(conn, profile.username(), profile.email(), Some(user_id))? {
            return Err(PersistenceError::DuplicateUser {
                username: profile.username().to_string(),
                email: profile.email().to_string(),
            });
        }

        diesel::update(users::table)
            .filter(users::user_id.eq(user_id))
            .set((
                users::username.eq(profile.username()),
                users::email.eq(profile.email()),
                users::role.eq(profile.role().as_str()),
            ))
            .execute(conn)
            .map_err(|e| map_user_write_error(e, profile))?;

        if let Some(hash) = password_hash {
            diesel::update(users::table)
                .filter(users::user_id.eq(user_id))
                .set(users::password_hash.eq(hash))
                .execute(conn)?;
            info!(user_id, "Updated user credential");
        }

        info!(user_id, username = profile.username(), "Updated user");

        get_user_by_id(conn, user_id)?.ok_or(PersistenceError::UserNotFound(user_id))
    })
}

/// Deletes a user together with all of their sessions and sales.
///
/// The three deletions share one transaction; on any failure nothing is
/// removed.
///
/// # Errors
///
/// Returns `PersistenceError::UserNotFound` if the user does not exist, or
/// an error if any delete fails.
pub fn delete_user_cascade(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<UserDeletion, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if get_user_by_id(conn, user_id)?.is_none() {
            return Err(PersistenceError::UserNotFound(user_id));
        }

        let sessions_deleted: usize = diesel::delete(sessions::table)
            .filter(sessions::user_id.eq(user_id))
            .execute(conn)?;

        let sales_deleted: usize = delete_all_sales_for(conn, user_id)?;

        diesel::delete(users::table)
            .filter(users::user_id.eq(user_id))
            .execute(conn)?;

        info!(
            user_id,
            sales_deleted, sessions_deleted, "Deleted user and dependent records"
        );

        Ok(UserDeletion {
            sales_deleted,
            sessions_deleted,
        })
    })
}
