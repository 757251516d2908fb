//! Stock level reporting.
//!
//! Compares each catalogued ingredient's current stock against its minimum
//! threshold and flags the ones that need restocking.

use crate::db::{self, DbPool};
use crate::errors::Result;
use serde::Serialize;
use tracing::instrument;

/// One ingredient's stock position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockStatus {
    pub name: String,
    pub unit: String,
    pub current_stock: f64,
    pub min_stock: f64,
    /// `current_stock <= min_stock`.
    pub needs_restock: bool,
}

/// Stock position for the whole catalogue, ordered by name.
#[instrument(skip(pool))]
pub async fn stock_status(pool: &DbPool) -> Result<Vec<StockStatus>> {
    let ingredients = db::list_ingredients(pool).await?;
    Ok(ingredients
        .into_iter()
        .map(|i| StockStatus {
            needs_restock: i.current_stock <= i.min_stock,
            name: i.name,
            unit: i.unit,
            current_stock: i.current_stock,
            min_stock: i.min_stock,
        })
        .collect())
}

/// The subset of the catalogue at or below its minimum threshold.
#[instrument(skip(pool))]
pub async fn ingredients_below_minimum(pool: &DbPool) -> Result<Vec<StockStatus>> {
    let statuses = stock_status(pool).await?;
    Ok(statuses.into_iter().filter(|s| s.needs_restock).collect())
}
