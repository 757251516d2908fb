use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::IngredientExpense;
use chrono::NaiveDate;
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

/// Category tag written on rows produced by [`record_stock_deduction`].
pub const STOCK_DEDUCTION_CATEGORY: &str = "stock_deduction";

fn row_to_expense(row: &Row<'_>) -> rusqlite::Result<IngredientExpense> {
    Ok(IngredientExpense {
        id: row.get(0)?,
        date: row.get(1)?,
        item: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        quantity: row.get(5)?,
        unit: row.get(6)?,
        note: row.get(7)?,
    })
}

const EXPENSE_COLUMNS: &str = "id, date, item, amount, category, quantity, unit, note";

/// Records an ingredient purchase.
///
/// The quantity is the purchased amount and must not be negative; stock
/// deductions go through [`record_stock_deduction`] instead.
///
/// # Errors
///
/// Returns `Error::Entry` if the item name is blank, the amount is not
/// positive, or the quantity is negative.
#[instrument(skip(pool, note))]
pub async fn record_ingredient_expense(
    pool: &DbPool,
    date: NaiveDate,
    item: &str,
    amount: f64,
    category: &str,
    quantity: f64,
    unit: &str,
    note: &str,
) -> Result<i64> {
    if item.trim().is_empty() {
        return Err(Error::Entry("Ingredient item is required.".to_string()));
    }
    if amount <= 0.0 {
        return Err(Error::Entry("Expense amount must be positive.".to_string()));
    }
    if quantity < 0.0 {
        return Err(Error::Entry(
            "Purchase quantity cannot be negative; use a stock deduction.".to_string(),
        ));
    }

    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO ingredient_expenses (date, item, amount, category, quantity, unit, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    let expense_id = stmt.insert(params![
        date,
        item.trim(),
        amount,
        category.trim(),
        quantity,
        unit.trim(),
        note.trim(),
    ])?;
    info!(
        "Recorded ingredient expense {} on {}: item='{}', amount={:.2}, quantity={}",
        expense_id, date, item, amount, quantity
    );
    Ok(expense_id)
}

/// Atomically records a stock deduction against a catalogued ingredient.
///
/// Two writes happen as one logical unit inside a single transaction: an
/// `ingredient_expenses` row with negative quantity and zero amount is
/// inserted, and the ingredient's `current_stock` is decremented by the same
/// quantity. If either write fails the transaction rolls back and neither
/// table changes.
///
/// # Errors
///
/// Returns `Error::Entry` if the quantity is not positive or the ingredient
/// is not catalogued; `Error::Database` if the transaction cannot be
/// started or committed.
#[instrument(skip(pool, reason))]
pub async fn record_stock_deduction(
    pool: &DbPool,
    ingredient_name: &str,
    quantity: f64,
    date: NaiveDate,
    reason: &str,
) -> Result<i64> {
    if quantity <= 0.0 {
        return Err(Error::Entry(
            "Deduction quantity must be positive.".to_string(),
        ));
    }

    let mut conn = pool.lock().map_err(|_| {
        Error::Database("Failed to acquire DB lock for stock deduction".to_string())
    })?;
    let tx = conn.transaction().map_err(|e| {
        Error::Database(format!("Failed to start stock deduction transaction: {}", e))
    })?;

    let unit: String = tx
        .query_row(
            "SELECT unit FROM ingredients WHERE name = ?1",
            params![ingredient_name.trim()],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::Entry(format!("Unknown ingredient '{ingredient_name}'.")))?;

    // 1. Decrement the stock level
    tx.execute(
        "UPDATE ingredients SET current_stock = current_stock - ?1 WHERE name = ?2",
        params![quantity, ingredient_name.trim()],
    )
    .map_err(|e| {
        Error::Database(format!(
            "Failed to decrement stock for '{}' in transaction: {}",
            ingredient_name, e
        ))
    })?;

    // 2. Append the deduction event to the expense ledger (negative quantity)
    let expense_id = {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO ingredient_expenses (date, item, amount, category, quantity, unit, note)
             VALUES (?1, ?2, 0.0, ?3, ?4, ?5, ?6)",
        )?;
        stmt.insert(params![
            date,
            ingredient_name.trim(),
            STOCK_DEDUCTION_CATEGORY,
            -quantity,
            unit,
            reason.trim(),
        ])
        .map_err(|e| {
            Error::Database(format!(
                "Failed to record deduction event for '{}' in transaction: {}",
                ingredient_name, e
            ))
        })?
    };

    tx.commit().map_err(|e| {
        Error::Database(format!(
            "Failed to commit stock deduction for '{}': {}",
            ingredient_name, e
        ))
    })?;

    info!(
        "Recorded stock deduction {} for '{}': quantity={}",
        expense_id, ingredient_name, quantity
    );
    Ok(expense_id)
}

/// Lists ingredient expense rows for a calendar date, in insertion order.
#[instrument(skip(pool))]
pub async fn list_ingredient_expenses_for_day(
    pool: &DbPool,
    date: NaiveDate,
) -> Result<Vec<IngredientExpense>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM ingredient_expenses WHERE date = ?1 ORDER BY id"
    ))?;
    let rows = stmt
        .query_map(params![date], row_to_expense)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Lists ingredient expense rows for a month.
#[instrument(skip(pool))]
pub async fn list_ingredient_expenses_for_month(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<Vec<IngredientExpense>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {EXPENSE_COLUMNS} FROM ingredient_expenses
         WHERE strftime('%Y-%m', date) = ?1 ORDER BY date, id"
    ))?;
    let rows = stmt
        .query_map(params![month_str], row_to_expense)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Sums ingredient expense amounts for a calendar date; `0.0` when none.
///
/// Stock-deduction rows carry a zero amount, so they never distort totals.
#[instrument(skip(pool))]
pub async fn sum_ingredient_expenses_for_day(pool: &DbPool, date: NaiveDate) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(amount), 0.0) FROM ingredient_expenses WHERE date = ?1",
    )?;
    let total: f64 = stmt.query_row(params![date], |row| row.get(0))?;
    debug!("Ingredient expense total for {}: {:.2}", date, total);
    Ok(total)
}

/// Sums ingredient expense amounts for a month; `0.0` when none.
#[instrument(skip(pool))]
pub async fn sum_ingredient_expenses_for_month(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(amount), 0.0) FROM ingredient_expenses
         WHERE strftime('%Y-%m', date) = ?1",
    )?;
    let total: f64 = stmt.query_row(params![month_str], |row| row.get(0))?;
    debug!("Ingredient expense total for {}: {:.2}", month_str, total);
    Ok(total)
}

/// Deletes an ingredient expense row by id. Returns whether a row was
/// removed. Deleting a deduction row does NOT restore stock.
#[instrument(skip(pool))]
pub async fn delete_ingredient_expense(pool: &DbPool, expense_id: i64) -> Result<bool> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute(
        "DELETE FROM ingredient_expenses WHERE id = ?1",
        params![expense_id],
    )?;
    info!("Deleted ingredient expense {} ({} row(s))", expense_id, rows);
    Ok(rows > 0)
}
