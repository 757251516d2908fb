use cashbook::cli::{Cli, Command};
use cashbook::config;
use cashbook::core::breakdown::{MonthlyBreakdown, load_monthly_breakdown};
use cashbook::core::stock::stock_status;
use cashbook::core::totals::{Totals, compute_daily_totals, compute_monthly_totals};
use cashbook::db::{self, DbPool};
use cashbook::errors::Result;
use cashbook::report::pdf::{ReportKind, render_summary_pdf};
use cashbook::report::sheet::{
    Sheet, category_totals_sheet, consumption_sheet, daily_receipts_sheet, fixed_expenses_sheet,
    ingredient_expenses_sheet, method_totals_sheet, receipts_sheet, stock_sheet, summary_sheet,
};
use cashbook::report::summary::{format_currency, summary_rows};
use cashbook::report::xlsx::render_workbook;
use chrono::{Local, NaiveDate};
use clap::Parser;
use dotenvy::dotenv;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize tracing as early as possible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // .env is optional; env vars can be set externally
    dotenv().ok();

    let cli = Cli::parse();

    let app_config = config::load_app_configuration()?;

    let db_pool = db::init_db(&app_config.database_path)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    match cli.command {
        Command::Init => {
            info!("Ledger database ready at {}", app_config.database_path);
        }
        Command::Daily { date, pdf, xlsx } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let pdf = pdf.map(|p| resolve_export_path(&app_config.export_dir, p));
            let xlsx = xlsx.map(|p| resolve_export_path(&app_config.export_dir, p));
            run_daily(&db_pool, date, pdf.as_deref(), xlsx.as_deref()).await?;
        }
        Command::Monthly {
            year,
            month,
            pdf,
            xlsx,
        } => {
            let pdf = pdf.map(|p| resolve_export_path(&app_config.export_dir, p));
            let xlsx = xlsx.map(|p| resolve_export_path(&app_config.export_dir, p));
            run_monthly(&db_pool, year, month, pdf.as_deref(), xlsx.as_deref()).await?;
        }
        Command::Stock { xlsx } => {
            let xlsx = xlsx.map(|p| resolve_export_path(&app_config.export_dir, p));
            run_stock(&db_pool, xlsx.as_deref()).await?;
        }
    }

    Ok(())
}

/// Relative export paths land under the configured export directory.
fn resolve_export_path(export_dir: &str, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        Path::new(export_dir).join(path)
    }
}

fn print_totals(title: &str, totals: &Totals) {
    println!("{title}");
    for (label, value) in summary_rows(totals) {
        println!("  {label:<28} {:>14}", format_currency(value));
    }
}

fn write_export(path: &Path, bytes: &[u8], what: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    info!("Wrote {} to {}", what, path.display());
    Ok(())
}

async fn run_daily(
    pool: &DbPool,
    date: NaiveDate,
    pdf: Option<&Path>,
    xlsx: Option<&Path>,
) -> Result<()> {
    let totals = compute_daily_totals(pool, date).await?;
    print_totals(&format!("Daily Cash Summary - {date}"), &totals);

    if let Some(path) = pdf {
        let bytes = render_summary_pdf(&totals, &date.to_string(), ReportKind::Daily, None)?;
        write_export(path, &bytes, "daily PDF summary")?;
    }
    if let Some(path) = xlsx {
        let sheets = vec![
            summary_sheet("Daily Summary", &totals),
            receipts_sheet(&db::list_receipts_for_day(pool, date).await?),
            consumption_sheet(&db::list_consumption_for_day(pool, date).await?),
            ingredient_expenses_sheet(&db::list_ingredient_expenses_for_day(pool, date).await?),
            fixed_expenses_sheet(&db::list_fixed_expenses_for_day(pool, date).await?),
        ];
        let bytes = render_workbook(&sheets)?;
        write_export(path, &bytes, "daily spreadsheet")?;
    }
    Ok(())
}

async fn run_monthly(
    pool: &DbPool,
    year: i32,
    month: u32,
    pdf: Option<&Path>,
    xlsx: Option<&Path>,
) -> Result<()> {
    let totals = compute_monthly_totals(pool, year, month).await?;
    let breakdown: MonthlyBreakdown = load_monthly_breakdown(pool, year, month).await?;
    let label = format!("{month:02}/{year}");
    print_totals(&format!("Monthly Cash Summary - {label}"), &totals);

    if let Some(path) = pdf {
        let bytes = render_summary_pdf(&totals, &label, ReportKind::Monthly, Some(&breakdown))?;
        write_export(path, &bytes, "monthly PDF summary")?;
    }
    if let Some(path) = xlsx {
        let sheets = vec![
            summary_sheet("Monthly Summary", &totals),
            receipts_sheet(&db::list_receipts_for_month(pool, year, month).await?),
            consumption_sheet(&db::list_consumption_for_month(pool, year, month).await?),
            ingredient_expenses_sheet(
                &db::list_ingredient_expenses_for_month(pool, year, month).await?,
            ),
            fixed_expenses_sheet(&db::list_fixed_expenses_for_month(pool, year, month).await?),
            daily_receipts_sheet(&breakdown.receipts_by_day),
            category_totals_sheet(&breakdown.expenses_by_category),
            method_totals_sheet(&breakdown.receipts_by_method),
        ];
        let bytes = render_workbook(&sheets)?;
        write_export(path, &bytes, "monthly spreadsheet")?;
    }
    Ok(())
}

async fn run_stock(pool: &DbPool, xlsx: Option<&Path>) -> Result<()> {
    let statuses = stock_status(pool).await?;
    if statuses.is_empty() {
        println!("No ingredients catalogued.");
    } else {
        println!("Stock levels");
        for status in &statuses {
            let flag = if status.needs_restock { "RESTOCK" } else { "ok" };
            println!(
                "  {:<24} {:>10.3} {:<4} (min {:.3})  {}",
                status.name, status.current_stock, status.unit, status.min_stock, flag
            );
        }
    }

    if let Some(path) = xlsx {
        let sheets: Vec<Sheet> = vec![stock_sheet(&statuses)];
        let bytes = render_workbook(&sheets)?;
        write_export(path, &bytes, "stock spreadsheet")?;
    }
    Ok(())
}
