// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! All queries use Diesel DSL. Stored text columns are converted into
//! domain types here; a row that fails conversion surfaces as
//! `PersistenceError::CorruptRecord`.

pub mod rules;
pub mod sales;
pub mod sessions;
pub mod users;
