use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::ClientConsumption;
use chrono::NaiveDate;
use rusqlite::{Row, params};
use tracing::{debug, info, instrument};

fn row_to_consumption(row: &Row<'_>) -> rusqlite::Result<ClientConsumption> {
    Ok(ClientConsumption {
        id: row.get(0)?,
        date: row.get(1)?,
        client_name: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        category: row.get(5)?,
        note: row.get(6)?,
    })
}

const CONSUMPTION_COLUMNS: &str = "id, date, client_name, description, amount, category, note";

/// Records consumption against a named client.
///
/// # Errors
///
/// Returns `Error::Entry` if the client name is blank or the amount is not
/// positive.
#[instrument(skip(pool, description, note))]
pub async fn record_consumption(
    pool: &DbPool,
    date: NaiveDate,
    client_name: &str,
    description: &str,
    amount: f64,
    category: &str,
    note: &str,
) -> Result<i64> {
    if client_name.trim().is_empty() {
        return Err(Error::Entry("Client name is required.".to_string()));
    }
    if amount <= 0.0 {
        return Err(Error::Entry(
            "Consumption amount must be positive.".to_string(),
        ));
    }

    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO client_consumption (date, client_name, description, amount, category, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    let consumption_id = stmt.insert(params![
        date,
        client_name.trim(),
        description.trim(),
        amount,
        category.trim(),
        note.trim(),
    ])?;
    info!(
        "Recorded consumption {} on {} for client '{}': amount={:.2}",
        consumption_id, date, client_name, amount
    );
    Ok(consumption_id)
}

/// Lists consumption rows for a calendar date, in insertion order.
#[instrument(skip(pool))]
pub async fn list_consumption_for_day(
    pool: &DbPool,
    date: NaiveDate,
) -> Result<Vec<ClientConsumption>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CONSUMPTION_COLUMNS} FROM client_consumption WHERE date = ?1 ORDER BY id"
    ))?;
    let rows = stmt
        .query_map(params![date], row_to_consumption)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Lists consumption rows for a month.
#[instrument(skip(pool))]
pub async fn list_consumption_for_month(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<Vec<ClientConsumption>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CONSUMPTION_COLUMNS} FROM client_consumption
         WHERE strftime('%Y-%m', date) = ?1 ORDER BY date, id"
    ))?;
    let rows = stmt
        .query_map(params![month_str], row_to_consumption)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Sums consumption amounts for a calendar date; `0.0` when none.
#[instrument(skip(pool))]
pub async fn sum_consumption_for_day(pool: &DbPool, date: NaiveDate) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(amount), 0.0) FROM client_consumption WHERE date = ?1",
    )?;
    let total: f64 = stmt.query_row(params![date], |row| row.get(0))?;
    debug!("Consumption total for {}: {:.2}", date, total);
    Ok(total)
}

/// Sums consumption amounts for a month; `0.0` when none.
#[instrument(skip(pool))]
pub async fn sum_consumption_for_month(pool: &DbPool, year: i32, month: u32) -> Result<f64> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(SUM(amount), 0.0) FROM client_consumption
         WHERE strftime('%Y-%m', date) = ?1",
    )?;
    let total: f64 = stmt.query_row(params![month_str], |row| row.get(0))?;
    debug!("Consumption total for {}: {:.2}", month_str, total);
    Ok(total)
}

/// Deletes a consumption row by id. Returns whether a row was removed.
#[instrument(skip(pool))]
pub async fn delete_consumption(pool: &DbPool, consumption_id: i64) -> Result<bool> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute(
        "DELETE FROM client_consumption WHERE id = ?1",
        params![consumption_id],
    )?;
    info!("Deleted consumption {} ({} row(s))", consumption_id, rows);
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{date, init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_record_and_sum_consumption() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;
        let day = date(2024, 5, 10);

        record_consumption(&db_pool, day, "Ana", "2 feijoada plates", 48.0, "lunch", "").await?;
        record_consumption(&db_pool, day, "Rafael", "", 22.0, "", "takeaway").await?;

        let rows = list_consumption_for_day(&db_pool, day).await?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].client_name, "Ana");
        assert_eq!(rows[0].description.as_deref(), Some("2 feijoada plates"));

        let total = sum_consumption_for_day(&db_pool, day).await?;
        assert_eq!(total, 70.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_consumption_validation() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;
        let day = date(2024, 5, 10);

        let no_client = record_consumption(&db_pool, day, "  ", "", 10.0, "", "").await;
        assert!(matches!(no_client, Err(Error::Entry(_))));

        let bad_amount = record_consumption(&db_pool, day, "Ana", "", 0.0, "", "").await;
        assert!(matches!(bad_amount, Err(Error::Entry(_))));

        assert!(list_consumption_for_day(&db_pool, day).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_consumption_filtering() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        record_consumption(&db_pool, date(2024, 5, 2), "Ana", "", 30.0, "", "").await?;
        record_consumption(&db_pool, date(2024, 5, 20), "Bia", "", 15.0, "", "").await?;
        record_consumption(&db_pool, date(2024, 6, 1), "Ana", "", 99.0, "", "").await?;

        let may_rows = list_consumption_for_month(&db_pool, 2024, 5).await?;
        assert_eq!(may_rows.len(), 2);
        assert_eq!(sum_consumption_for_month(&db_pool, 2024, 5).await?, 45.0);
        assert_eq!(sum_consumption_for_month(&db_pool, 2024, 7).await?, 0.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_consumption() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;
        let day = date(2024, 5, 10);

        let id = record_consumption(&db_pool, day, "Ana", "", 10.0, "", "").await?;
        assert!(delete_consumption(&db_pool, id).await?);
        assert!(!delete_consumption(&db_pool, id).await?);
        Ok(())
    }
}
