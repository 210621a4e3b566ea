// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use sales_incentive_domain::CommissionRate;
use time::Duration;

/// Runtime policy shared by API operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// The rate applied when no active rule matches a sale.
    pub default_rate: CommissionRate,
    /// How long a login session stays valid.
    pub session_ttl: Duration,
}

impl ApiConfig {
    /// Default session lifetime (24 hours).
    pub const DEFAULT_SESSION_TTL: Duration = Duration::hours(24);

    /// Creates a configuration.
    #[must_use]
    pub const fn new(default_rate: CommissionRate, session_ttl: Duration) -> Self {
        Self {
            default_rate,
            session_ttl,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(CommissionRate::default_rate(), Self::DEFAULT_SESSION_TTL)
    }
}
