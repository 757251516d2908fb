//! The balance calculator.
//!
//! Turns a date (daily mode) or a (year, month) pair (monthly mode) plus the
//! ledger store into a [`Totals`] record. Missing rows always contribute
//! `0.0`; an empty day or month is a valid input, never an error.

use crate::db::{self, DbPool};
use crate::errors::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::instrument;

/// Derived financial summary for one day or one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// Opening balance recorded for the day (or day 1 of the month).
    pub opening_balance: f64,
    /// Sum of receipt amounts in the period.
    pub total_receipts: f64,
    /// Sum of client consumption amounts in the period.
    pub total_consumption: f64,
    /// `total_receipts + total_consumption`.
    pub total_income: f64,
    /// Sum of ingredient expense amounts in the period.
    pub total_ingredient_expense: f64,
    /// Sum of fixed expense amounts in the period.
    pub total_fixed_expense: f64,
    /// `total_ingredient_expense + total_fixed_expense`.
    pub total_expense: f64,
    /// `opening_balance + total_income - total_expense`.
    pub closing_balance: f64,
}

impl Totals {
    /// Builds a totals record from its five independent components; the
    /// three derived fields are computed here so the identities hold by
    /// construction.
    #[must_use]
    pub fn from_components(
        opening_balance: f64,
        total_receipts: f64,
        total_consumption: f64,
        total_ingredient_expense: f64,
        total_fixed_expense: f64,
    ) -> Self {
        let total_income = total_receipts + total_consumption;
        let total_expense = total_ingredient_expense + total_fixed_expense;
        Self {
            opening_balance,
            total_receipts,
            total_consumption,
            total_income,
            total_ingredient_expense,
            total_fixed_expense,
            total_expense,
            closing_balance: opening_balance + total_income - total_expense,
        }
    }
}

/// Computes the totals record for a single calendar date (exact date
/// equality on every ledger table).
#[instrument(skip(pool))]
pub async fn compute_daily_totals(pool: &DbPool, date: NaiveDate) -> Result<Totals> {
    let opening_balance = db::get_opening_balance(pool, date).await?;
    let total_receipts = db::sum_receipts_for_day(pool, date).await?;
    let total_consumption = db::sum_consumption_for_day(pool, date).await?;
    let total_ingredient_expense = db::sum_ingredient_expenses_for_day(pool, date).await?;
    let total_fixed_expense = db::sum_fixed_expenses_for_day(pool, date).await?;

    Ok(Totals::from_components(
        opening_balance,
        total_receipts,
        total_consumption,
        total_ingredient_expense,
        total_fixed_expense,
    ))
}

/// Computes the totals record for a month (year-month prefix equality on
/// the date column).
///
/// The opening balance is whatever was stored for day 1 of that month, not
/// a carry-forward of the prior month's closing balance; absence yields
/// `0.0`.
///
/// # Errors
///
/// Returns `Error::Entry` when the (year, month) pair is not a valid
/// calendar month.
#[instrument(skip(pool))]
pub async fn compute_monthly_totals(pool: &DbPool, year: i32, month: u32) -> Result<Totals> {
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| Error::Entry(format!("Invalid month: {month:02}/{year}")))?;

    let opening_balance = db::get_opening_balance(pool, first_day).await?;
    let total_receipts = db::sum_receipts_for_month(pool, year, month).await?;
    let total_consumption = db::sum_consumption_for_month(pool, year, month).await?;
    let total_ingredient_expense = db::sum_ingredient_expenses_for_month(pool, year, month).await?;
    let total_fixed_expense = db::sum_fixed_expenses_for_month(pool, year, month).await?;

    Ok(Totals::from_components(
        opening_balance,
        total_receipts,
        total_consumption,
        total_ingredient_expense,
        total_fixed_expense,
    ))
}
