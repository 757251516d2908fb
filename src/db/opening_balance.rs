use crate::db::DbPool;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

/// Sets the opening balance for a calendar date.
///
/// At most one opening balance exists per date: inserting for a date that
/// already has one replaces it (UPSERT), it does not append.
///
/// The amount may be negative; purchase days routinely start in the red.
///
/// # Errors
///
/// Returns `Error::Database` if the database lock cannot be acquired, or a
/// rusqlite error if the statement fails.
#[instrument(skip(pool, note))]
pub async fn set_opening_balance(
    pool: &DbPool,
    date: NaiveDate,
    amount: f64,
    note: &str,
) -> Result<()> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    conn.execute(
        "INSERT INTO opening_balances (date, amount, note) VALUES (?1, ?2, ?3)
         ON CONFLICT(date) DO UPDATE SET amount = excluded.amount, note = excluded.note",
        params![date, amount, note.trim()],
    )?;
    info!("Set opening balance for {}: {:.2}", date, amount);
    Ok(())
}

/// Returns the opening balance recorded for a date, or `0.0` when none has
/// been recorded. Never an error for an absent row.
#[instrument(skip(pool))]
pub async fn get_opening_balance(pool: &DbPool, date: NaiveDate) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached("SELECT amount FROM opening_balances WHERE date = ?1")?;
    let amount: Option<f64> = stmt.query_row(params![date], |row| row.get(0)).optional()?;
    debug!("Opening balance for {}: {:?}", date, amount);
    Ok(amount.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{count_rows, date, init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_absent_opening_balance_is_zero() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        let balance = get_opening_balance(&db_pool, date(2024, 3, 1)).await?;
        assert_eq!(balance, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_and_get_opening_balance() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        set_opening_balance(&db_pool, date(2024, 3, 1), 250.75, "carried from weekend").await?;
        let balance = get_opening_balance(&db_pool, date(2024, 3, 1)).await?;
        assert_eq!(balance, 250.75);

        // Other dates remain untouched.
        let other = get_opening_balance(&db_pool, date(2024, 3, 2)).await?;
        assert_eq!(other, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_leaves_exactly_one_row() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        set_opening_balance(&db_pool, date(2024, 3, 1), 100.0, "").await?;
        set_opening_balance(&db_pool, date(2024, 3, 1), 180.0, "corrected count").await?;

        let balance = get_opening_balance(&db_pool, date(2024, 3, 1)).await?;
        assert_eq!(balance, 180.0);

        let conn = db_pool.lock().unwrap();
        assert_eq!(count_rows(&conn, "opening_balances")?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_negative_opening_balance_allowed() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        set_opening_balance(&db_pool, date(2024, 3, 3), -42.50, "sunday purchases").await?;
        let balance = get_opening_balance(&db_pool, date(2024, 3, 3)).await?;
        assert_eq!(balance, -42.50);
        Ok(())
    }
}
