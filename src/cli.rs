//! Command-line interface.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Small-business cash register and inventory ledger.
#[derive(Debug, Parser)]
#[command(name = "cashbook", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Report surface over the ledger store. Data entry happens through the
/// form layer; these commands read, summarise and export.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the ledger database and bring its schema up to date
    Init,
    /// Compute the daily cash summary, optionally exporting it
    Daily {
        /// Calendar day, YYYY-MM-DD; defaults to today
        date: Option<NaiveDate>,
        /// Write the summary as a PDF document to this path
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Write the summary and raw datasets as a spreadsheet to this path
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },
    /// Compute the monthly cash summary with breakdowns, optionally exporting it
    Monthly {
        /// Calendar year, e.g. 2024
        year: i32,
        /// Month number, 1-12
        month: u32,
        /// Write the summary as a PDF document to this path
        #[arg(long)]
        pdf: Option<PathBuf>,
        /// Write the summary and raw datasets as a spreadsheet to this path
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },
    /// Show stock levels against minimum thresholds
    Stock {
        /// Write the stock report as a spreadsheet to this path
        #[arg(long)]
        xlsx: Option<PathBuf>,
    },
}
