//! Ledger Store: `SQLite`-backed tables and their operations.
//!
//! Every function takes a [`DbPool`] handle explicitly; there is no global
//! connection state. Writes are single statements except the stock
//! deduction, which updates two tables inside one transaction.

pub mod connection;
pub mod consumption;
pub mod fixed_expenses;
pub mod ingredient_expenses;
pub mod ingredients;
pub mod opening_balance;
pub mod receipts;
pub(crate) mod schema;
#[cfg(test)]
pub(crate) mod test_utils;

pub use connection::{DbPool, init_db};
pub use consumption::{
    delete_consumption, list_consumption_for_day, list_consumption_for_month, record_consumption,
    sum_consumption_for_day, sum_consumption_for_month,
};
pub use fixed_expenses::{
    delete_fixed_expense, list_fixed_expenses_for_day, list_fixed_expenses_for_month,
    record_fixed_expense, sum_fixed_expenses_for_day, sum_fixed_expenses_for_month,
};
pub use ingredient_expenses::{
    delete_ingredient_expense, list_ingredient_expenses_for_day,
    list_ingredient_expenses_for_month, record_ingredient_expense, record_stock_deduction,
    sum_ingredient_expenses_for_day, sum_ingredient_expenses_for_month,
};
pub use ingredients::{
    IngredientUpdate, adjust_stock, create_ingredient, delete_ingredient, get_ingredient_by_name,
    list_ingredients, update_ingredient,
};
pub use opening_balance::{get_opening_balance, set_opening_balance};
pub use receipts::{
    delete_receipt, list_receipts_for_day, list_receipts_for_month, record_receipt,
    sum_receipts_for_day, sum_receipts_for_month,
};
