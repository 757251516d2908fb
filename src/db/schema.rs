//! Versioned ledger schema.
//!
//! Migrations are applied idempotently at startup, stepping
//! `PRAGMA user_version` one version at a time. New columns or tables get a
//! new entry in [`MIGRATIONS`]; existing entries are never edited.

use crate::errors::{Error, Result};
use rusqlite::Connection;
use tracing::{debug, info, instrument};

const SCHEMA_V1: &str = "
    CREATE TABLE IF NOT EXISTS opening_balances (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL UNIQUE,
        amount REAL NOT NULL,
        note TEXT
    );

    CREATE TABLE IF NOT EXISTS receipts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        amount REAL NOT NULL,
        method TEXT NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        note TEXT,
        client_name TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_receipts_date ON receipts(date);

    CREATE TABLE IF NOT EXISTS client_consumption (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        client_name TEXT NOT NULL,
        description TEXT,
        amount REAL NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_client_consumption_date ON client_consumption(date);

    CREATE TABLE IF NOT EXISTS ingredient_expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        item TEXT NOT NULL,
        amount REAL NOT NULL,
        category TEXT NOT NULL DEFAULT '',
        quantity REAL NOT NULL DEFAULT 0,
        unit TEXT NOT NULL DEFAULT '',
        note TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_ingredient_expenses_date ON ingredient_expenses(date);

    CREATE TABLE IF NOT EXISTS fixed_expenses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        amount REAL NOT NULL,
        category TEXT NOT NULL DEFAULT ''
    );
    CREATE INDEX IF NOT EXISTS idx_fixed_expenses_date ON fixed_expenses(date);

    CREATE TABLE IF NOT EXISTS ingredients (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        unit TEXT NOT NULL,
        min_stock REAL NOT NULL DEFAULT 0,
        current_stock REAL NOT NULL DEFAULT 0,
        note TEXT
    );
";

/// Migrations keyed by the `user_version` they upgrade FROM, in ascending
/// order. Each is applied in its own transaction together with the version
/// bump.
const MIGRATIONS: &[(i32, &str)] = &[(0, SCHEMA_V1)];

#[instrument(skip(conn))]
pub(crate) fn migrate(conn: &Connection) -> Result<()> {
    let mut version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| Error::Database(format!("Failed to read schema version: {}", e)))?;
    debug!("Ledger schema currently at user_version {}", version);

    for (from, sql) in MIGRATIONS {
        if version != *from {
            continue;
        }
        let to = from + 1;
        conn.execute_batch(&format!(
            "BEGIN;\n{sql}\nPRAGMA user_version = {to};\nCOMMIT;"
        ))
        .map_err(|e| {
            Error::Database(format!(
                "Failed to apply schema migration {} -> {}: {}",
                from, to, e
            ))
        })?;
        info!("Applied ledger schema migration {} -> {}", from, to);
        version = to;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;

    #[test]
    fn test_migrate_fresh_database() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;

        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        assert_eq!(version, MIGRATIONS.len() as i32);

        // All six ledger tables must exist.
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
             ('opening_balances', 'receipts', 'client_consumption',
              'ingredient_expenses', 'fixed_expenses', 'ingredients')",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(count, 6);
        Ok(())
    }

    #[test]
    fn test_migrate_is_idempotent() -> Result<()> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        migrate(&conn)?;

        let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        assert_eq!(version, MIGRATIONS.len() as i32);
        Ok(())
    }
}
