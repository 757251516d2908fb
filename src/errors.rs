//! Unified error type for the ledger, storage layer and report renderers.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage-layer operational failure (lock acquisition, transactions).
    #[error("Database error: {0}")]
    Database(String),

    /// Entry rejected before reaching the ledger store (empty required
    /// field, non-positive amount, unknown ingredient).
    #[error("Invalid entry: {0}")]
    Entry(String),

    /// I/O error while reading configuration or writing exports.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Underlying `SQLite` driver error.
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),

    /// PDF or spreadsheet rendering failure.
    #[error("Report rendering error: {0}")]
    Render(String),
}

/// Convenience `Result` type.
pub type Result<T> = std::result::Result<T, Error>;
