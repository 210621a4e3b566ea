// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users`: Account creation, updates, and cascading deletion
//! - `rules`: Commission rule upsert and activation
//! - `sales`: Sale recording (with commission capture) and deletion
//! - `sessions`: Login session lifecycle
//! - `bootstrap`: Idempotent seeding of the initial admin and default rule
//!
//! Every multi-statement mutation runs inside a single Diesel transaction.
//! Backend-specific helpers (e.g., `last_insert_rowid()`) are imported
//! from the `backend` module. All other code uses Diesel DSL exclusively.

pub mod bootstrap;
pub mod rules;
pub mod sales;
pub mod sessions;
pub mod users;
