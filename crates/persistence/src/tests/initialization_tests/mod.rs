// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test also exercises connection setup and
//! migrations through `SqlitePersistence::new_in_memory()`.

use sales_incentive_domain::{Role, SaleScope};

use super::create_test_user;
use crate::SqlitePersistence;

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, crate::error::PersistenceError> =
        SqlitePersistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_is_enabled() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = SqlitePersistence::new_in_memory().unwrap();
    let mut db2 = SqlitePersistence::new_in_memory().unwrap();

    create_test_user(&mut db1, "alice", Role::SalesRep);

    assert_eq!(db1.count_users().unwrap(), 1, "db1 should have 1 user");
    assert_eq!(
        db2.count_users().unwrap(),
        0,
        "db2 should have 0 users (isolated)"
    );
}

#[test]
fn test_migrations_applied_on_initialization() {
    // If migrations didn't run, the schema wouldn't exist and these would fail
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();

    assert!(persistence.list_users().unwrap().is_empty());
    assert!(persistence.list_all_rules().unwrap().is_empty());
    assert!(persistence.list_sales(SaleScope::All).unwrap().is_empty());
}

#[derive(diesel::QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    journal_mode: String,
}

#[test]
fn test_file_database_uses_wal_and_survives_reopen() {
    use diesel::RunQueryDsl;

    let path = std::env::temp_dir().join(format!(
        "sales_incentive_init_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = SqlitePersistence::new_with_file(&path).unwrap();
        let row: JournalModeRow = diesel::sql_query("PRAGMA journal_mode")
            .get_result(&mut persistence.conn)
            .unwrap();
        assert_eq!(row.journal_mode.to_lowercase(), "wal");
        assert!(persistence.verify_foreign_key_enforcement().is_ok());

        create_test_user(&mut persistence, "alice", Role::SalesRep);
    }

    // Reopening must not re-run applied migrations or lose data
    let mut reopened = SqlitePersistence::new_with_file(&path).unwrap();
    assert_eq!(reopened.count_users().unwrap(), 1);
    assert!(reopened.verify_foreign_key_enforcement().is_ok());
    drop(reopened);

    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        let _ = std::fs::remove_file(file);
    }
}

#[test]
fn test_unopenable_file_reports_connection_failure() {
    let path = std::env::temp_dir()
        .join("sales_incentive_missing_dir")
        .join("nested")
        .join("sales.db");

    let err = SqlitePersistence::new_with_file(&path).err().unwrap();
    assert!(
        matches!(err, crate::error::PersistenceError::DatabaseConnectionFailed(_)),
        "unexpected error: {err:?}"
    );
    assert!(err.to_string().starts_with("Database connection failed: "));
}
