#![allow(dead_code)]
use crate::db::{DbPool, schema};
use crate::errors::Result;
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")),
        )
        .with_test_writer()
        .try_init();
}

// Fresh in-memory ledger with the full schema applied.
pub(crate) fn setup_test_db() -> Result<DbPool> {
    let conn = Connection::open_in_memory()?;
    schema::migrate(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) struct DirectIngredientArgs<'a> {
    pub(crate) conn: &'a Connection,
    pub(crate) name: &'a str,
    pub(crate) unit: &'a str,
    pub(crate) min_stock: f64,
    pub(crate) current_stock: f64,
}

// Quick ingredient insert for test setup, bypassing validation.
pub(crate) fn direct_insert_ingredient(args: &DirectIngredientArgs<'_>) -> Result<i64> {
    let mut stmt = args.conn.prepare_cached(
        "INSERT INTO ingredients (name, unit, min_stock, current_stock, note)
         VALUES (?1, ?2, ?3, ?4, NULL)",
    )?;
    let id = stmt.insert(params![
        args.name,
        args.unit,
        args.min_stock,
        args.current_stock
    ])?;
    Ok(id)
}

pub(crate) fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
