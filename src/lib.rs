//! `cashbook` - a small-business cash register and inventory ledger
//!
//! This crate records daily cash receipts, client consumption, ingredient
//! purchases, fixed expenses and stock levels in a local `SQLite` ledger,
//! derives daily/monthly financial summaries from them, and renders those
//! summaries as PDF documents and multi-sheet spreadsheets.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    missing_docs,

    clippy::all,
    clippy::pedantic,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// Command-line interface definition
pub mod cli;
/// Application configuration from environment and `cashbook.toml`
pub mod config;
/// Balance computation and aggregation - framework-agnostic business logic
pub mod core;
/// Ledger Store - `SQLite`-backed tables and their operations
pub mod db;
/// Unified error types and result handling
pub mod errors;
/// Plain row structs mirroring the ledger tables
pub mod models;
/// Report rendering - PDF summaries and spreadsheet exports
pub mod report;
