// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sales_incentive_domain::User;

/// A user together with the stored credential hash.
///
/// Only returned by credential lookups used during login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Row counts removed by a cascading user deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserDeletion {
    pub sales_deleted: usize,
    pub sessions_deleted: usize,
}
