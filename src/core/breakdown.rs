//! Monthly breakdown aggregates.
//!
//! The monthly report variant carries three GROUP BY views over the month's
//! rows: receipts per day, expenses per category tag, and receipts per
//! payment method. An empty month produces empty vectors, and the renderers
//! skip empty sections.

use crate::db::DbPool;
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use rusqlite::params;
use serde::Serialize;
use tracing::instrument;

/// Receipt total for one calendar day of the month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReceipts {
    pub date: NaiveDate,
    pub total: f64,
}

/// Expense total for one category tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Receipt total for one payment method.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodTotal {
    pub method: String,
    pub total: f64,
}

/// All monthly breakdowns, loaded in one pass for the renderers.
#[derive(Debug, Clone, Default)]
pub struct MonthlyBreakdown {
    pub receipts_by_day: Vec<DailyReceipts>,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub receipts_by_method: Vec<MethodTotal>,
}

/// Sums receipts per calendar day across a month, ordered by date.
#[instrument(skip(pool))]
pub async fn receipts_by_day(pool: &DbPool, year: i32, month: u32) -> Result<Vec<DailyReceipts>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT date, COALESCE(SUM(amount), 0.0) FROM receipts
         WHERE strftime('%Y-%m', date) = ?1
         GROUP BY date ORDER BY date",
    )?;
    let rows = stmt
        .query_map(params![month_str], |row| {
            Ok(DailyReceipts {
                date: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Sums ingredient and fixed expenses per category tag across a month,
/// largest first. Blank tags are reported as `uncategorized`.
#[instrument(skip(pool))]
pub async fn expenses_by_category(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<Vec<CategoryTotal>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT CASE WHEN TRIM(category) = '' THEN 'uncategorized' ELSE category END AS tag,
                COALESCE(SUM(amount), 0.0) AS total
         FROM (
             SELECT category, amount FROM ingredient_expenses
             WHERE strftime('%Y-%m', date) = ?1
             UNION ALL
             SELECT category, amount FROM fixed_expenses
             WHERE strftime('%Y-%m', date) = ?1
         )
         GROUP BY tag ORDER BY total DESC, tag",
    )?;
    let rows = stmt
        .query_map(params![month_str], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Sums receipts per payment method across a month, largest first.
#[instrument(skip(pool))]
pub async fn receipts_by_method(pool: &DbPool, year: i32, month: u32) -> Result<Vec<MethodTotal>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let month_str = format!("{:04}-{:02}", year, month);
    let mut stmt = conn.prepare_cached(
        "SELECT method, COALESCE(SUM(amount), 0.0) AS total FROM receipts
         WHERE strftime('%Y-%m', date) = ?1
         GROUP BY method ORDER BY total DESC, method",
    )?;
    let rows = stmt
        .query_map(params![month_str], |row| {
            Ok(MethodTotal {
                method: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Loads all three breakdowns for the monthly report.
#[instrument(skip(pool))]
pub async fn load_monthly_breakdown(
    pool: &DbPool,
    year: i32,
    month: u32,
) -> Result<MonthlyBreakdown> {
    Ok(MonthlyBreakdown {
        receipts_by_day: receipts_by_day(pool, year, month).await?,
        expenses_by_category: expenses_by_category(pool, year, month).await?,
        receipts_by_method: receipts_by_method(pool, year, month).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::db::test_utils::{date, init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_receipts_by_day_groups_and_orders() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        db::record_receipt(&db_pool, date(2024, 5, 10), 30.0, "cash", "", "", None).await?;
        db::record_receipt(&db_pool, date(2024, 5, 10), 20.0, "pix", "", "", None).await?;
        db::record_receipt(&db_pool, date(2024, 5, 2), 15.0, "cash", "", "", None).await?;
        db::record_receipt(&db_pool, date(2024, 6, 2), 99.0, "cash", "", "", None).await?;

        let days = receipts_by_day(&db_pool, 2024, 5).await?;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2024, 5, 2));
        assert_eq!(days[0].total, 15.0);
        assert_eq!(days[1].date, date(2024, 5, 10));
        assert_eq!(days[1].total, 50.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_month_has_empty_breakdowns() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        let breakdown = load_monthly_breakdown(&db_pool, 2024, 5).await?;
        assert!(breakdown.receipts_by_day.is_empty());
        assert!(breakdown.expenses_by_category.is_empty());
        assert!(breakdown.receipts_by_method.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_expenses_by_category_unions_both_tables() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        db::record_ingredient_expense(
            &db_pool,
            date(2024, 5, 3),
            "Flour",
            50.0,
            "weekly purchase",
            10.0,
            "kg",
            "",
        )
        .await?;
        db::record_fixed_expense(&db_pool, date(2024, 5, 5), "Rent", 100.0, "weekly purchase")
            .await?;
        db::record_fixed_expense(&db_pool, date(2024, 5, 6), "Gas", 40.0, "  ").await?;

        let categories = expenses_by_category(&db_pool, 2024, 5).await?;
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].category, "weekly purchase");
        assert_eq!(categories[0].total, 150.0);
        assert_eq!(categories[1].category, "uncategorized");
        assert_eq!(categories[1].total, 40.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_receipts_by_method() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        db::record_receipt(&db_pool, date(2024, 5, 1), 10.0, "cash", "", "", None).await?;
        db::record_receipt(&db_pool, date(2024, 5, 2), 25.0, "pix", "", "", None).await?;
        db::record_receipt(&db_pool, date(2024, 5, 3), 5.0, "pix", "", "", None).await?;

        let methods = receipts_by_method(&db_pool, 2024, 5).await?;
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].method, "pix");
        assert_eq!(methods[0].total, 30.0);
        assert_eq!(methods[1].method, "cash");
        assert_eq!(methods[1].total, 10.0);
        Ok(())
    }
}
