use crate::db::schema::migrate;
use crate::errors::{Error, Result};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument};

/// Shared handle to the single ledger connection.
pub type DbPool = Arc<Mutex<Connection>>;

/// Opens (creating if necessary) the ledger database and brings its schema
/// up to date.
///
/// The parent directory is created when missing, mirroring a fresh
/// installation where no `data/` directory exists yet.
///
/// # Errors
///
/// Returns `Error::Database` if the database cannot be opened or a schema
/// migration fails.
#[instrument]
pub async fn init_db(db_path: &str) -> Result<DbPool> {
    debug!("Initializing database connection to: {}", db_path);
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path)
        .map_err(|e| Error::Database(format!("Failed to open database at {}: {}", db_path, e)))?;

    conn.execute("PRAGMA foreign_keys = ON;", [])
        .map_err(|e| Error::Database(format!("Failed to enable foreign keys: {}", e)))?;

    info!("Database connection opened. Applying schema migrations...");
    migrate(&conn)?;

    Ok(Arc::new(Mutex::new(conn)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::init_test_tracing;

    #[tokio::test]
    async fn test_init_db_creates_parent_directory() -> Result<()> {
        init_test_tracing();
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("nested").join("ledger.sqlite");

        let pool = init_db(db_path.to_str().unwrap()).await?;
        assert!(db_path.exists());

        // Schema was applied on the fresh file.
        let conn = pool.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'receipts'",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(count, 1);
        Ok(())
    }
}
