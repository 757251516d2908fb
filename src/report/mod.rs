//! Report rendering.
//!
//! Both renderers are stateless transforms: a [`Totals`](crate::core::totals::Totals)
//! record plus raw row-sets in, document bytes out. Nothing is retried;
//! a rendering failure aborts the request with [`Error::Render`](crate::errors::Error).

/// Paginated PDF summary
pub mod pdf;
/// Generic sheet/dataset model and builders from ledger rows
pub mod sheet;
/// Fixed label/value summary rows shared by both renderers
pub mod summary;
/// Multi-sheet spreadsheet export
pub mod xlsx;
