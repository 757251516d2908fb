//! Application configuration.
//!
//! Settings come from the environment (loaded via `.env` with `dotenvy`)
//! with an optional `cashbook.toml` file as a fallback. Environment
//! variables always win over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Default ledger database location, relative to the working directory.
pub const DEFAULT_DATABASE_PATH: &str = "data/cashbook.sqlite";
/// Default directory for PDF and spreadsheet exports.
pub const DEFAULT_EXPORT_DIR: &str = "exports";

const CONFIG_FILE: &str = "cashbook.toml";

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the `SQLite` ledger database file.
    pub database_path: String,
    /// Directory where report exports are written.
    pub export_dir: String,
}

/// Optional on-disk configuration (`cashbook.toml`).
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    database_path: Option<String>,
    export_dir: Option<String>,
}

/// Loads the application configuration.
///
/// Resolution order per field: `CASHBOOK_*` environment variable, then
/// `cashbook.toml`, then the built-in default.
///
/// # Errors
///
/// Returns `Error::Config` if `cashbook.toml` exists but cannot be parsed.
pub fn load_app_configuration() -> Result<AppConfig> {
    let file_cfg = read_file_config(CONFIG_FILE)?;

    let database_path = std::env::var("CASHBOOK_DATABASE_PATH")
        .ok()
        .or(file_cfg.database_path)
        .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string());
    let export_dir = std::env::var("CASHBOOK_EXPORT_DIR")
        .ok()
        .or(file_cfg.export_dir)
        .unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string());

    info!(
        "Configuration resolved: database_path='{}', export_dir='{}'",
        database_path, export_dir
    );
    Ok(AppConfig {
        database_path,
        export_dir,
    })
}

fn read_file_config(path: &str) -> Result<FileConfig> {
    if !Path::new(path).exists() {
        debug!("No {} found, using environment/defaults only.", path);
        return Ok(FileConfig::default());
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| Error::Config(format!("Failed to parse {path}: {e}")))
}
