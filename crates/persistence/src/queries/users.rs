// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use diesel::sqlite::Sqlite;
use sales_incentive_domain::{Role, User};
use std::str::FromStr;
use tracing::debug;

use crate::data_models::UserCredentials;
use crate::diesel_schema::users;
use crate::error::PersistenceError;

/// Diesel Queryable struct for user rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub(crate) struct UserRow {
    user_id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: String,
}

impl UserRow {
    fn into_credentials(self) -> Result<UserCredentials, PersistenceError> {
        let role: Role = Role::from_str(&self.role).map_err(|e| {
            PersistenceError::CorruptRecord(format!("user {}: {e}", self.user_id))
        })?;

        Ok(UserCredentials {
            user: User {
                user_id: self.user_id,
                username: self.username,
                email: self.email,
                role,
                created_at: self.created_at,
            },
            password_hash: self.password_hash,
        })
    }

    pub(crate) fn into_user(self) -> Result<User, PersistenceError> {
        Ok(self.into_credentials()?.user)
    }
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the user is not found.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<User>, PersistenceError> {
    debug!("Looking up user by ID: {}", user_id);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::user_id.eq(user_id))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_user()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a user and their credential hash by username.
///
/// The lookup is an exact, case-sensitive match.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no user has this username.
pub fn get_user_credentials(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<UserCredentials>, PersistenceError> {
    debug!("Looking up credentials for username: {}", username);

    let result: Result<UserRow, diesel::result::Error> = users::table
        .filter(users::username.eq(username))
        .select(UserRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_credentials()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists every user ordered by username.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_users(conn: &mut SqliteConnection) -> Result<Vec<User>, PersistenceError> {
    let rows: Vec<UserRow> = users::table
        .select(UserRow::as_select())
        .order(users::username.asc())
        .load(conn)?;

    rows.into_iter().map(UserRow::into_user).collect()
}

/// Returns whether another user already holds `username` or `email`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `username` - The username to check
/// * `email` - The email to check
/// * `excluding_user_id` - A user to ignore (the one being updated)
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_identity_taken(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
    excluding_user_id: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = users::table
        .filter(users::username.eq(username).or(users::email.eq(email)))
        .into_boxed::<Sqlite>();

    if let Some(user_id) = excluding_user_id {
        query = query.filter(users::user_id.ne(user_id));
    }

    let count: i64 = query.count().get_result(conn)?;
    Ok(count > 0)
}

/// Counts all users.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_users(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(users::table.count().get_result(conn)?)
}
