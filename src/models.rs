//! Row structs mirroring the ledger tables.
//!
//! Dates are stored as `YYYY-MM-DD` TEXT in `SQLite`; `chrono::NaiveDate`
//! round-trips through that encoding via rusqlite's `chrono` feature.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One opening balance per calendar date (upsert-on-conflict semantics).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OpeningBalance {
    pub id: i64,
    pub date: NaiveDate,
    /// May be negative on purchase days.
    pub amount: f64,
    pub note: Option<String>,
}

/// A cash receipt. Append-only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Receipt {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    /// Payment method (e.g. "cash", "pix", "card").
    pub method: String,
    /// Free-text category tag, not a foreign-keyed enumeration.
    pub category: String,
    pub note: Option<String>,
    pub client_name: Option<String>,
}

/// Consumption recorded against a named client. Append-only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClientConsumption {
    pub id: i64,
    pub date: NaiveDate,
    pub client_name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub category: String,
    pub note: Option<String>,
}

/// An ingredient purchase or stock-deduction event. Append-only.
///
/// A negative `quantity` marks a stock deduction paired with a decrement of
/// the referenced ingredient's current stock.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientExpense {
    pub id: i64,
    pub date: NaiveDate,
    pub item: String,
    pub amount: f64,
    pub category: String,
    /// Signed; negative means stock deduction.
    pub quantity: f64,
    pub unit: String,
    pub note: Option<String>,
}

/// A fixed (recurring) expense such as rent or utilities. Append-only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FixedExpense {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: String,
}

/// A catalogued ingredient with its stock level.
///
/// `current_stock` is only mutated together with the insertion of a
/// negative-quantity [`IngredientExpense`] (one transaction), or through an
/// explicit stock adjustment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub unit: String,
    pub min_stock: f64,
    pub current_stock: f64,
    pub note: Option<String>,
}
