// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use sales_incentive_domain::{Role, SaleScope, User};
use sales_incentive_persistence::{SessionData, SqlitePersistence, UserCredentials};
use time::macros::format_description;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::credentials::CredentialHasher;
use crate::error::AuthError;

/// The message returned for every failed login.
///
/// It never reveals whether the username or the password was wrong.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// An authenticated user acting on the system.
///
/// Extracted once per request from a validated session and passed into
/// every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The user's canonical ID.
    pub user_id: i64,
    /// The user's login name.
    pub username: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's canonical ID
    /// * `username` - The user's login name
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(user_id: i64, username: String, role: Role) -> Self {
        Self {
            user_id,
            username,
            role,
        }
    }

    /// Creates an actor for a stored user.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self::new(user.user_id, user.username.clone(), user.role)
    }

    /// Returns whether this actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor holds the Admin role.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The action being attempted, used in the error
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an administrator.
    pub fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        if actor.is_admin() {
            return Ok(());
        }

        warn!(
            user_id = actor.user_id,
            action, "Rejected non-admin actor for admin-only action"
        );
        Err(AuthError::Unauthorized {
            action: action.to_string(),
            required_role: String::from("admin"),
        })
    }

    /// Checks that an actor may act on records owned by `owner_user_id`.
    ///
    /// Administrators may act on any user's records; sales reps only on
    /// their own.
    ///
    /// # Errors
    ///
    /// Returns an error if a sales rep targets another user's records.
    pub fn authorize_owner_access(
        actor: &AuthenticatedActor,
        owner_user_id: i64,
        action: &str,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || actor.user_id == owner_user_id {
            return Ok(());
        }
        Self::require_admin(actor, action)
    }

    /// Determines which sales an actor may list or aggregate.
    ///
    /// Sales reps always see only their own sales; asking for another user
    /// is rejected rather than silently narrowed. Administrators see every
    /// sale unless they ask for one user.
    ///
    /// # Errors
    ///
    /// Returns an error if a sales rep requests another user's sales.
    pub fn resolve_sale_scope(
        actor: &AuthenticatedActor,
        requested_user_id: Option<i64>,
        action: &str,
    ) -> Result<SaleScope, AuthError> {
        if actor.is_admin() {
            return Ok(SaleScope::from_user(requested_user_id));
        }

        if let Some(user_id) = requested_user_id {
            Self::authorize_owner_access(actor, user_id, action)?;
        }
        Ok(SaleScope::Owner(actor.user_id))
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Verifies credentials and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `hasher` - The credential hasher
    /// * `username` - The login name (exact match)
    /// * `password` - The plain-text password
    /// * `session_ttl` - How long the new session stays valid
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `expires_at`)
    ///
    /// # Errors
    ///
    /// Returns the same generic error for an unknown user and a wrong
    /// password.
    pub fn login(
        persistence: &mut SqlitePersistence,
        hasher: &dyn CredentialHasher,
        username: &str,
        password: &str,
        session_ttl: Duration,
    ) -> Result<(String, AuthenticatedActor, String), AuthError> {
        let credentials: Option<UserCredentials> = persistence
            .get_user_credentials(username.trim())
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?;

        // Unknown usernames still pay for one verification
        let stored_hash: &str = credentials
            .as_ref()
            .map_or_else(|| hasher.placeholder_hash(), |c| c.password_hash.as_str());
        let verified: bool = hasher.verify(password, stored_hash);

        let Some(credentials) = credentials.filter(|_| verified) else {
            info!(username, "Rejected login attempt");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from(INVALID_CREDENTIALS),
            });
        };

        let session_token: String = Self::generate_session_token();
        let expires_at: String = format_timestamp(OffsetDateTime::now_utc() + session_ttl)?;

        persistence
            .create_session(&session_token, credentials.user.user_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        info!(
            user_id = credentials.user.user_id,
            username = %credentials.user.username,
            "User logged in"
        );

        Ok((
            session_token,
            AuthenticatedActor::from_user(&credentials.user),
            expires_at,
        ))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// Unknown and expired tokens are rejected. A valid session has its
    /// last activity refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or its user
    /// no longer exists.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let now: String = format_timestamp(OffsetDateTime::now_utc())?;
        if session.expires_at <= now {
            debug!(session_id = session.session_id, "Session expired");
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: User = persistence
            .get_user_by_id(session.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Database error: {e}"),
            })?;

        Ok(AuthenticatedActor::from_user(&user))
    }

    /// Logs out by deleting the session.
    ///
    /// Logging out an unknown token succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Deletes every session that has already expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup fails.
    pub fn purge_expired_sessions(persistence: &mut SqlitePersistence) -> Result<usize, AuthError> {
        let now: String = format_timestamp(OffsetDateTime::now_utc())?;
        persistence
            .delete_expired_sessions(&now)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to purge sessions: {e}"),
            })
    }

    /// Generates a random 128-bit session token.
    fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
///
/// This matches the text `SQLite` stores for `CURRENT_TIMESTAMP`, so stored
/// timestamps compare correctly as strings.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, AuthError> {
    timestamp
        .to_offset(time::UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })
}
