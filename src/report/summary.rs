//! The fixed summary rows rendered by both output formats.

use crate::core::totals::Totals;

/// The eight labelled rows of a cash summary, in rendering order.
#[must_use]
pub fn summary_rows(totals: &Totals) -> Vec<(&'static str, f64)> {
    vec![
        ("Opening Balance", totals.opening_balance),
        ("Total Receipts", totals.total_receipts),
        ("Total Client Consumption", totals.total_consumption),
        ("Total Income", totals.total_income),
        ("Total Ingredient Expenses", totals.total_ingredient_expense),
        ("Total Fixed Expenses", totals.total_fixed_expense),
        ("Total Expenses", totals.total_expense),
        ("Closing Balance", totals.closing_balance),
    ]
}

/// Formats a monetary value as `R$ X.XX`, always two decimal places.
#[must_use]
pub fn format_currency(value: f64) -> String {
    format!("R$ {value:.2}")
}
