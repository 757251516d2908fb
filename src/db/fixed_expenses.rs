use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::FixedExpense;
use chrono::NaiveDate;
use rusqlite::{Row, params};
use tracing::{debug, info, instrument};

fn row_to_fixed_expense(row: &Row<'_>) -> rusqlite::Result<FixedExpense> {
    Ok(FixedExpense {
        id: row.get(0)?,
        date: row.get(1)?,
        description: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
    })
}

/// Records a fixed expense (rent, utilities, subscriptions).
///
/// # Errors
///
/// Returns `Error::Entry` if the description is blank or the amount is not
/// positive.
#[instrument(skip(pool))]
pub async fn record_fixed_expense(
    pool: &DbPool,
    date: NaiveDate,
    description: &str,
    amount: f64,
    category: &str,
) -> Result<i64> {
    if description.trim().is_empty() {
        return Err(Error::Entry("Expense description is required.".to_string()));
    }
    if amount <= 0.0 {
        return Err(Error::Entry("Expense amount must be positive.".to_string()));
    }

    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO fixed_expenses (date, description, amount, category)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    let expense_id = stmt.insert(params![date, description.trim(), amount, category.trim()])?;
    info!(
        "Recorded fixed expense {} on {}: '{}', amount={:.2}",
        expense_id, date, description, amount
    );
    Ok(expense_id)
}

/// Lists fixed expenses for a calendar date, in insertion order.
#[instrument(skip(pool))]
pub async fn list_fixed_expenses_for_day(
    pool: &DbPool,
    date: NaiveDate,
) -> Result<Vec<FixedExpense>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, description, amount, category FROM fixed_expenses
         WHERE date = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![date], row_to_fixed_expense)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Lists fixed expenses for a month.
#[instrument(skip(pool))]
pub async fn list_fixed_expenses_for_month(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<Vec<FixedExpense>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT id, date, description, amount, category FROM fixed_expenses
         WHERE strftime('%Y-%m', date) = ?1 ORDER BY date, id",
    )?;
    let rows = stmt
        .query_map(params![month_str], row_to_fixed_expense)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Sums fixed expense amounts for a calendar date; `0.0` when none.
#[instrument(skip(pool))]
pub async fn sum_fixed_expenses_for_day(pool: &DbPool, date: NaiveDate) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn
        .prepare_cached("SELECT COALESCE(SUM(amount), 0.0) FROM fixed_expenses WHERE date = ?1")?;
    let total: f64 = stmt.query_row(params![date], |row| row.get(0))?;
    debug!("Fixed expense total for {}: {:.2}", date, total);
    Ok(total)
}

/// Sums fixed expense amounts for a month; `0.0` when none.
#[instrument(skip(pool))]
pub async fn sum_fixed_expenses_for_month(pool: &DbPool, year: i32, month: u32) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(amount), 0.0) FROM fixed_expenses
         WHERE strftime('%Y-%m', date) = ?1",
    )?;
    let total: f64 = stmt.query_row(params![month_str], |row| row.get(0))?;
    debug!("Fixed expense total for {}: {:.2}", month_str, total);
    Ok(total)
}

/// Deletes a fixed expense by id. Returns whether a row was removed.
#[instrument(skip(pool))]
pub async fn delete_fixed_expense(pool: &DbPool, expense_id: i64) -> Result<bool> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute(
        "DELETE FROM fixed_expenses WHERE id = ?1",
        params![expense_id],
    )?;
    info!("Deleted fixed expense {} ({} row(s))", expense_id, rows);
    Ok(rows > 0)
}
