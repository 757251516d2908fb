//! Balance computation and aggregation.
//!
//! Everything here is a read-only transform over ledger rows: the functions
//! query the store and return structured data for the report renderers to
//! format. No state is kept between calls.

/// Monthly breakdown aggregates (per day, per category, per payment method)
pub mod breakdown;
/// Stock level reporting against minimum thresholds
pub mod stock;
/// Daily and monthly totals - the balance calculator
pub mod totals;
