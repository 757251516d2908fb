use crate::db::DbPool;
use crate::errors::{Error, Result};
use crate::models::Ingredient;
use rusqlite::{OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

fn row_to_ingredient(row: &Row<'_>) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: row.get(0)?,
        name: row.get(1)?,
        unit: row.get(2)?,
        min_stock: row.get(3)?,
        current_stock: row.get(4)?,
        note: row.get(5)?,
    })
}

const INGREDIENT_COLUMNS: &str = "id, name, unit, min_stock, current_stock, note";

/// Field set for [`update_ingredient`].
#[derive(Debug, Clone)]
pub struct IngredientUpdate {
    pub name: String,
    pub unit: String,
    pub min_stock: f64,
    pub current_stock: f64,
    pub note: String,
}

/// Catalogues a new ingredient.
///
/// Names are unique; inserting a duplicate surfaces the constraint violation
/// as a rusqlite error.
///
/// # Errors
///
/// Returns `Error::Entry` if the name or unit is blank, or if the stock
/// levels are negative.
#[instrument(skip(pool, note))]
pub async fn create_ingredient(
    pool: &DbPool,
    name: &str,
    unit: &str,
    min_stock: f64,
    current_stock: f64,
    note: &str,
) -> Result<i64> {
    if name.trim().is_empty() {
        return Err(Error::Entry("Ingredient name is required.".to_string()));
    }
    if unit.trim().is_empty() {
        return Err(Error::Entry("Unit of measure is required.".to_string()));
    }
    if min_stock < 0.0 || current_stock < 0.0 {
        return Err(Error::Entry("Stock levels cannot be negative.".to_string()));
    }

    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO ingredients (name, unit, min_stock, current_stock, note)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    let ingredient_id = stmt.insert(params![
        name.trim(),
        unit.trim(),
        min_stock,
        current_stock,
        note.trim(),
    ])?;
    info!(
        "Catalogued ingredient {} '{}' ({}): stock={}, minimum={}",
        ingredient_id, name, unit, current_stock, min_stock
    );
    Ok(ingredient_id)
}

/// Fetches an ingredient by its unique name.
#[instrument(skip(pool))]
pub async fn get_ingredient_by_name(pool: &DbPool, name: &str) -> Result<Option<Ingredient>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {INGREDIENT_COLUMNS} FROM ingredients WHERE name = ?1"
    ))?;
    let ingredient = stmt
        .query_row(params![name.trim()], row_to_ingredient)
        .optional()?;
    debug!("Ingredient lookup '{}': found={}", name, ingredient.is_some());
    Ok(ingredient)
}

/// Lists the full ingredient catalogue ordered by name.
#[instrument(skip(pool))]
pub async fn list_ingredients(pool: &DbPool) -> Result<Vec<Ingredient>> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {INGREDIENT_COLUMNS} FROM ingredients ORDER BY name"
    ))?;
    let rows = stmt
        .query_map([], row_to_ingredient)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Replaces all editable fields of an ingredient. Returns whether a row was
/// updated.
///
/// # Errors
///
/// Returns `Error::Entry` if the new name or unit is blank.
#[instrument(skip(pool, update))]
pub async fn update_ingredient(
    pool: &DbPool,
    ingredient_id: i64,
    update: &IngredientUpdate,
) -> Result<bool> {
    if update.name.trim().is_empty() {
        return Err(Error::Entry("Ingredient name is required.".to_string()));
    }
    if update.unit.trim().is_empty() {
        return Err(Error::Entry("Unit of measure is required.".to_string()));
    }

    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute(
        "UPDATE ingredients
         SET name = ?1, unit = ?2, min_stock = ?3, current_stock = ?4, note = ?5
         WHERE id = ?6",
        params![
            update.name.trim(),
            update.unit.trim(),
            update.min_stock,
            update.current_stock,
            update.note.trim(),
            ingredient_id,
        ],
    )?;
    info!("Updated ingredient {} ({} row(s))", ingredient_id, rows);
    Ok(rows > 0)
}

/// Removes an ingredient from the catalogue. Returns whether a row was
/// removed. Historical expense rows referencing it are left untouched.
#[instrument(skip(pool))]
pub async fn delete_ingredient(pool: &DbPool, ingredient_id: i64) -> Result<bool> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute(
        "DELETE FROM ingredients WHERE id = ?1",
        params![ingredient_id],
    )?;
    info!("Deleted ingredient {} ({} row(s))", ingredient_id, rows);
    Ok(rows > 0)
}

/// Applies a signed stock adjustment (restock or manual correction) to a
/// catalogued ingredient.
///
/// This is for corrections outside the expense ledger; production usage
/// should go through
/// [`record_stock_deduction`](crate::db::ingredient_expenses::record_stock_deduction)
/// so the deduction event is kept.
///
/// # Errors
///
/// Returns `Error::Entry` if the ingredient is not catalogued.
#[instrument(skip(pool))]
pub async fn adjust_stock(pool: &DbPool, name: &str, delta: f64) -> Result<()> {
    let conn = pool
        .lock()
        .map_err(|_| Error::Database("Failed to acquire DB lock".to_string()))?;
    let rows = conn.execute(
        "UPDATE ingredients SET current_stock = current_stock + ?1 WHERE name = ?2",
        params![delta, name.trim()],
    )?;
    if rows == 0 {
        return Err(Error::Entry(format!("Unknown ingredient '{name}'.")));
    }
    info!("Adjusted stock for '{}' by {}", name, delta);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::{init_test_tracing, setup_test_db};
    use crate::errors::Result;

    #[tokio::test]
    async fn test_create_and_get_ingredient() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        let id = create_ingredient(&db_pool, "Flour", "kg", 5.0, 20.0, "type 00").await?;
        assert!(id > 0);

        let flour = get_ingredient_by_name(&db_pool, "Flour").await?.unwrap();
        assert_eq!(flour.unit, "kg");
        assert_eq!(flour.min_stock, 5.0);
        assert_eq!(flour.current_stock, 20.0);
        assert_eq!(flour.note.as_deref(), Some("type 00"));

        assert!(get_ingredient_by_name(&db_pool, "Yeast").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_ingredient_validation() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        let no_name = create_ingredient(&db_pool, " ", "kg", 0.0, 0.0, "").await;
        assert!(matches!(no_name, Err(Error::Entry(_))));

        let no_unit = create_ingredient(&db_pool, "Flour", "", 0.0, 0.0, "").await;
        assert!(matches!(no_unit, Err(Error::Entry(_))));

        let negative = create_ingredient(&db_pool, "Flour", "kg", -1.0, 0.0, "").await;
        assert!(matches!(negative, Err(Error::Entry(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        create_ingredient(&db_pool, "Salt", "kg", 1.0, 3.0, "").await?;
        let duplicate = create_ingredient(&db_pool, "Salt", "kg", 1.0, 3.0, "").await;
        assert!(matches!(duplicate, Err(Error::Rusqlite(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        create_ingredient(&db_pool, "Sugar", "kg", 1.0, 5.0, "").await?;
        create_ingredient(&db_pool, "Beans", "kg", 2.0, 8.0, "").await?;
        create_ingredient(&db_pool, "Oil", "L", 1.0, 4.0, "").await?;

        let names: Vec<String> = list_ingredients(&db_pool)
            .await?
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Beans", "Oil", "Sugar"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        let id = create_ingredient(&db_pool, "Oil", "L", 1.0, 4.0, "").await?;
        let updated = update_ingredient(
            &db_pool,
            id,
            &IngredientUpdate {
                name: "Olive Oil".to_string(),
                unit: "L".to_string(),
                min_stock: 2.0,
                current_stock: 6.0,
                note: "extra virgin".to_string(),
            },
        )
        .await?;
        assert!(updated);

        let oil = get_ingredient_by_name(&db_pool, "Olive Oil").await?.unwrap();
        assert_eq!(oil.current_stock, 6.0);
        assert!(get_ingredient_by_name(&db_pool, "Oil").await?.is_none());

        assert!(delete_ingredient(&db_pool, id).await?);
        assert!(!delete_ingredient(&db_pool, id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_adjust_stock() -> Result<()> {
        init_test_tracing();
        let db_pool = setup_test_db()?;

        create_ingredient(&db_pool, "Rice", "kg", 2.0, 10.0, "").await?;
        adjust_stock(&db_pool, "Rice", 5.0).await?;
        adjust_stock(&db_pool, "Rice", -3.0).await?;

        let rice = get_ingredient_by_name(&db_pool, "Rice").await?.unwrap();
        assert_eq!(rice.current_stock, 12.0);

        let unknown = adjust_stock(&db_pool, "Quinoa", 1.0).await;
        assert!(matches!(unknown, Err(Error::Entry(_))));
        Ok(())
    }
}
