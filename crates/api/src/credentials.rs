// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Credential hashing.
//!
//! Plain-text passwords never reach persistence; only the hashes produced
//! here are stored.

use std::sync::OnceLock;

use crate::error::ApiError;

/// Plain text behind the placeholder hash. No account is ever given it.
const PLACEHOLDER_SECRET: &str = "sales-incentive-placeholder";

/// Hashes and verifies login credentials.
pub trait CredentialHasher: Send + Sync {
    /// Hashes a plain-text credential.
    ///
    /// # Errors
    ///
    /// Returns an error if hashing fails.
    fn hash(&self, plain: &str) -> Result<String, ApiError>;

    /// Returns whether `plain` matches a previously produced `hash`.
    ///
    /// A malformed hash never matches.
    fn verify(&self, plain: &str, hash: &str) -> bool;

    /// A well-formed hash that no submitted credential matches.
    ///
    /// Verifying against it costs the same as verifying a real hash, so
    /// logins for unknown usernames take as long as wrong passwords.
    fn placeholder_hash(&self) -> &str;
}

/// bcrypt-backed credential hasher.
///
/// The placeholder hash is produced at the configured cost on first use
/// and reused afterwards.
#[derive(Debug, Clone)]
pub struct BcryptCredentialHasher {
    cost: u32,
    placeholder: OnceLock<String>,
}

impl BcryptCredentialHasher {
    /// Creates a hasher with the given bcrypt cost factor.
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self {
            cost,
            placeholder: OnceLock::new(),
        }
    }

    /// Returns the configured cost factor.
    #[must_use]
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptCredentialHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl CredentialHasher for BcryptCredentialHasher {
    fn hash(&self, plain: &str) -> Result<String, ApiError> {
        bcrypt::hash(plain, self.cost).map_err(|e| ApiError::Internal {
            message: format!("Failed to hash password: {e}"),
        })
    }

    fn verify(&self, plain: &str, hash: &str) -> bool {
        bcrypt::verify(plain, hash).unwrap_or(false)
    }

    fn placeholder_hash(&self) -> &str {
        self.placeholder
            .get_or_init(|| bcrypt::hash(PLACEHOLDER_SECRET, self.cost).unwrap_or_default())
    }
}
