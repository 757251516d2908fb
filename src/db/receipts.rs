use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::Receipt;
use chrono::NaiveDate;
use rusqlite::{Row, params};
use tracing::{debug, info, instrument};

fn row_to_receipt(row: &Row<'_>) -> rusqlite::Result<Receipt> {
    Ok(Receipt {
        id: row.get(0)?,
        date: row.get(1)?,
        amount: row.get(2)?,
        method: row.get(3)?,
        category: row.get(4)?,
        note: row.get(5)?,
        client_name: row.get(6)?,
    })
}

const RECEIPT_COLUMNS: &str = "id, date, amount, method, category, note, client_name";

/// Records a cash receipt.
///
/// # Errors
///
/// Returns `Error::Entry` if the amount is not positive or the payment
/// method is blank; `Error::Database` on lock failure.
#[instrument(skip(pool, note))]
pub async fn record_receipt(
    pool: &DbPool,
    date: NaiveDate,
    amount: f64,
    method: &str,
    category: &str,
    note: &str,
    client_name: Option<&str>,
) -> Result<i64> {
    if amount <= 0.0 {
        return Err(Error::Entry("Receipt amount must be positive.".to_string()));
    }
    if method.trim().is_empty() {
        return Err(Error::Entry("Payment method is required.".to_string()));
    }

    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO receipts (date, amount, method, category, note, client_name)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    let receipt_id = stmt.insert(params![
        date,
        amount,
        method.trim(),
        category.trim(),
        note.trim(),
        client_name.map(str::trim),
    ])?;
    info!(
        "Recorded receipt {} on {}: method='{}', amount={:.2}",
        receipt_id, date, method, amount
    );
    Ok(receipt_id)
}

/// Lists all receipts recorded on a calendar date, in insertion order.
#[instrument(skip(pool))]
pub async fn list_receipts_for_day(pool: &DbPool, date: NaiveDate) -> Result<Vec<Receipt>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {RECEIPT_COLUMNS} FROM receipts WHERE date = ?1 ORDER BY id"
    ))?;
    let rows = stmt
        .query_map(params![date], row_to_receipt)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Lists all receipts whose date falls within the given month.
#[instrument(skip(pool))]
pub async fn list_receipts_for_month(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<Vec<Receipt>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {RECEIPT_COLUMNS} FROM receipts
         WHERE strftime('%Y-%m', date) = ?1 ORDER BY date, id"
    ))?;
    let rows = stmt
        .query_map(params![month_str], row_to_receipt)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Sums receipt amounts for a calendar date. Returns `0.0` when the day has
/// no receipts.
#[instrument(skip(pool))]
pub async fn sum_receipts_for_day(pool: &DbPool, date: NaiveDate) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt =
        conn.prepare_cached("SELECT COALESCE(SUM(amount), 0.0) FROM receipts WHERE date = ?1")?;
    let total: f64 = stmt.query_row(params![date], |row| row.get(0))?;
    debug!("Receipt total for {}: {:.2}", date, total);
    Ok(total)
}

/// Sums receipt amounts across a month (year-month prefix match on the date
/// column). Returns `0.0` for an empty month.
#[instrument(skip(pool))]
pub async fn sum_receipts_for_month(pool: &DbPool, year: i32, month: u32) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(amount), 0.0) FROM receipts WHERE strftime('%Y-%m', date) = ?1",
    )?;
    let total: f64 = stmt.query_row(params![month_str], |row| row.get(0))?;
    debug!("Receipt total for {}: {:.2}", month_str, total);
    Ok(total)
}

/// Deletes a receipt by id. Returns whether a row was removed. No cascading
/// effects.
#[instrument(skip(pool))]
pub async fn delete_receipt(pool: &DbPool, receipt_id: i64) -> Result<bool> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute("DELETE FROM receipts WHERE id = ?1", params![receipt_id])?;
    info!("Deleted receipt {} ({} row(s))", receipt_id, rows);
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{date, init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_record_and_list_receipts() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;
        let day = date(2024, 5, 10);

        let id = record_receipt(&db_pool, day, 35.50, "pix", "lunch", "street fair", None).await?;
        assert!(id > 0);
        record_receipt(&db_pool, day, 12.00, "cash", "", "", Some("Marina")).await?;

        let rows = list_receipts_for_day(&db_pool, day).await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, 35.50);
        assert_eq!(rows[0].method, "pix");
        assert_eq!(rows[1].client_name.as_deref(), Some("Marina"));

        // Another day stays empty.
        let other = list_receipts_for_day(&db_pool, date(2024, 5, 11)).await?;
        assert!(other.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_record_receipt_validation() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;
        let day = date(2024, 5, 10);

        let zero = record_receipt(&db_pool, day, 0.0, "cash", "", "", None).await;
        assert!(matches!(zero, Err(Error::Entry(_))));

        let negative = record_receipt(&db_pool, day, -5.0, "cash", "", "", None).await;
        assert!(matches!(negative, Err(Error::Entry(_))));

        let no_method = record_receipt(&db_pool, day, 10.0, "  ", "", "", None).await;
        assert!(matches!(no_method, Err(Error::Entry(_))));

        // Nothing reached the store.
        assert!(list_receipts_for_day(&db_pool, day).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_month_filter_excludes_adjacent_months() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        record_receipt(&db_pool, date(2024, 4, 30), 10.0, "cash", "", "", None).await?;
        record_receipt(&db_pool, date(2024, 5, 1), 20.0, "cash", "", "", None).await?;
        record_receipt(&db_pool, date(2024, 5, 31), 30.0, "pix", "", "", None).await?;
        record_receipt(&db_pool, date(2024, 6, 1), 40.0, "card", "", "", None).await?;

        let may_rows = list_receipts_for_month(&db_pool, 2024, 5).await?;
        assert_eq!(may_rows.len(), 2);

        let may_total = sum_receipts_for_month(&db_pool, 2024, 5).await?;
        assert_eq!(may_total, 50.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_sum_empty_day_is_zero() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        let total = sum_receipts_for_day(&db_pool, date(2024, 1, 1)).await?;
        assert_eq!(total, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_receipt() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;
        let day = date(2024, 5, 10);

        let id = record_receipt(&db_pool, day, 15.0, "cash", "", "", None).await?;
        assert!(delete_receipt(&db_pool, id).await?);
        assert!(!delete_receipt(&db_pool, id).await?);
        assert!(list_receipts_for_day(&db_pool, day).await?.is_empty());
        Ok(())
    }
}
