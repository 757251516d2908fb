//! Generic tabular dataset model for the spreadsheet export.
//!
//! Each ledger row-set is converted into a [`Sheet`]; the workbook renderer
//! emits one worksheet per non-empty sheet and skips the empty ones.

use crate::core::breakdown::{CategoryTotal, DailyReceipts, MethodTotal};
use crate::core::stock::StockStatus;
use crate::core::totals::Totals;
use crate::models::{ClientConsumption, FixedExpense, IngredientExpense, Receipt};
use crate::report::summary::summary_rows;

/// Host-format limit on worksheet name length (xlsx).
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// One cell of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Plain text.
    Text(String),
    /// Monetary or quantity value; receives the currency number format.
    Number(f64),
    /// Identifier; written without number formatting.
    Int(i64),
}

/// A named tabular dataset.
#[derive(Debug, Clone)]
pub struct Sheet {
    /// Worksheet name, truncated to [`MAX_SHEET_NAME_LEN`] characters.
    pub name: String,
    /// Header row.
    pub columns: Vec<&'static str>,
    /// Data rows; each row has one cell per column.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet, truncating the name to the host limit.
    #[must_use]
    pub fn new(name: &str, columns: Vec<&'static str>) -> Self {
        Self {
            name: name.chars().take(MAX_SHEET_NAME_LEN).collect(),
            columns,
            rows: Vec::new(),
        }
    }

    /// A sheet with no data rows is skipped by the renderer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn opt_text(value: &Option<String>) -> Cell {
    Cell::Text(value.clone().unwrap_or_default())
}

/// The label/value summary dataset (always non-empty).
#[must_use]
pub fn summary_sheet(name: &str, totals: &Totals) -> Sheet {
    let mut sheet = Sheet::new(name, vec!["Description", "Amount (R$)"]);
    for (label, value) in summary_rows(totals) {
        sheet
            .rows
            .push(vec![Cell::Text(label.to_string()), Cell::Number(value)]);
    }
    sheet
}

/// Raw receipt rows.
#[must_use]
pub fn receipts_sheet(rows: &[Receipt]) -> Sheet {
    let mut sheet = Sheet::new(
        "Receipts",
        vec![
            "Id",
            "Date",
            "Amount (R$)",
            "Method",
            "Category",
            "Note",
            "Client",
        ],
    );
    for r in rows {
        sheet.rows.push(vec![
            Cell::Int(r.id),
            Cell::Text(r.date.to_string()),
            Cell::Number(r.amount),
            Cell::Text(r.method.clone()),
            Cell::Text(r.category.clone()),
            opt_text(&r.note),
            opt_text(&r.client_name),
        ]);
    }
    sheet
}

/// Raw client consumption rows.
#[must_use]
pub fn consumption_sheet(rows: &[ClientConsumption]) -> Sheet {
    let mut sheet = Sheet::new(
        "Client Consumption",
        vec![
            "Id",
            "Date",
            "Client",
            "Description",
            "Amount (R$)",
            "Category",
            "Note",
        ],
    );
    for r in rows {
        sheet.rows.push(vec![
            Cell::Int(r.id),
            Cell::Text(r.date.to_string()),
            Cell::Text(r.client_name.clone()),
            opt_text(&r.description),
            Cell::Number(r.amount),
            Cell::Text(r.category.clone()),
            opt_text(&r.note),
        ]);
    }
    sheet
}

/// Raw ingredient expense rows (purchases and stock deductions).
#[must_use]
pub fn ingredient_expenses_sheet(rows: &[IngredientExpense]) -> Sheet {
    let mut sheet = Sheet::new(
        "Ingredient Expenses",
        vec![
            "Id",
            "Date",
            "Item",
            "Amount (R$)",
            "Category",
            "Quantity",
            "Unit",
            "Note",
        ],
    );
    for r in rows {
        sheet.rows.push(vec![
            Cell::Int(r.id),
            Cell::Text(r.date.to_string()),
            Cell::Text(r.item.clone()),
            Cell::Number(r.amount),
            Cell::Text(r.category.clone()),
            Cell::Number(r.quantity),
            Cell::Text(r.unit.clone()),
            opt_text(&r.note),
        ]);
    }
    sheet
}

/// Raw fixed expense rows.
#[must_use]
pub fn fixed_expenses_sheet(rows: &[FixedExpense]) -> Sheet {
    let mut sheet = Sheet::new(
        "Fixed Expenses",
        vec!["Id", "Date", "Description", "Amount (R$)", "Category"],
    );
    for r in rows {
        sheet.rows.push(vec![
            Cell::Int(r.id),
            Cell::Text(r.date.to_string()),
            Cell::Text(r.description.clone()),
            Cell::Number(r.amount),
            Cell::Text(r.category.clone()),
        ]);
    }
    sheet
}

/// Monthly receipts-per-day aggregate.
#[must_use]
pub fn daily_receipts_sheet(rows: &[DailyReceipts]) -> Sheet {
    let mut sheet = Sheet::new("Receipts by Day", vec!["Date", "Total (R$)"]);
    for r in rows {
        sheet
            .rows
            .push(vec![Cell::Text(r.date.to_string()), Cell::Number(r.total)]);
    }
    sheet
}

/// Monthly expenses-per-category aggregate.
#[must_use]
pub fn category_totals_sheet(rows: &[CategoryTotal]) -> Sheet {
    let mut sheet = Sheet::new("Expenses by Category", vec!["Category", "Total (R$)"]);
    for r in rows {
        sheet
            .rows
            .push(vec![Cell::Text(r.category.clone()), Cell::Number(r.total)]);
    }
    sheet
}

/// Monthly receipts-per-payment-method aggregate.
#[must_use]
pub fn method_totals_sheet(rows: &[MethodTotal]) -> Sheet {
    let mut sheet = Sheet::new("Receipts by Method", vec!["Payment Method", "Total (R$)"]);
    for r in rows {
        sheet
            .rows
            .push(vec![Cell::Text(r.method.clone()), Cell::Number(r.total)]);
    }
    sheet
}

/// Stock position dataset.
#[must_use]
pub fn stock_sheet(rows: &[StockStatus]) -> Sheet {
    let mut sheet = Sheet::new(
        "Stock",
        vec!["Ingredient", "Unit", "Current Stock", "Minimum Stock", "Status"],
    );
    for r in rows {
        sheet.rows.push(vec![
            Cell::Text(r.name.clone()),
            Cell::Text(r.unit.clone()),
            Cell::Number(r.current_stock),
            Cell::Number(r.min_stock),
            Cell::Text(if r.needs_restock { "restock" } else { "ok" }.to_string()),
        ]);
    }
    sheet
}
