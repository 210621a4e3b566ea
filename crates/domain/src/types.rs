// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::validation::{validate_email, validate_required};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The role assigned to a user account.
///
/// Roles govern visibility and administrative authority:
/// - `Admin` users manage accounts and commission rules and see every sale.
/// - `SalesRep` users record sales and see only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Administrative authority over users, rules, and global statistics.
    Admin,
    /// Records sales and views their own figures.
    #[default]
    SalesRep,
}

impl Role {
    /// Converts this role to its storage representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SalesRep => "sales_rep",
        }
    }

    /// Returns whether this role carries administrative authority.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "sales_rep" => Ok(Self::SalesRep),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted user account.
///
/// The credential hash is deliberately not part of this type; it is only
/// loaded by the persistence layer when authenticating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// The canonical numeric identifier assigned by the database.
    pub user_id: i64,
    /// The unique login name.
    pub username: String,
    /// The unique contact email.
    pub email: String,
    /// The role assigned to this account.
    pub role: Role,
    /// Creation timestamp as recorded by the database.
    pub created_at: String,
}

/// A validated set of account fields used for creation and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    username: String,
    email: String,
    role: Role,
}

impl UserProfile {
    /// Creates a validated profile.
    ///
    /// Surrounding whitespace is trimmed from the username and email.
    ///
    /// # Arguments
    ///
    /// * `username` - The login name
    /// * `email` - The contact email
    /// * `role` - The role to assign
    ///
    /// # Errors
    ///
    /// Returns an error if the username is empty or the email is malformed.
    pub fn new(username: &str, email: &str, role: Role) -> Result<Self, DomainError> {
        let username: String = validate_required("username", username)?;
        let email: String = validate_email(email)?;
        Ok(Self {
            username,
            email,
            role,
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
