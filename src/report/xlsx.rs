//! Multi-sheet spreadsheet export.
//!
//! One worksheet per non-empty dataset; monetary columns carry a currency
//! number format that flags negative values in red.

use crate::errors::{Error, Result};
use crate::report::sheet::{Cell, Sheet};
use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, instrument};

/// Currency display format applied to numeric cells.
pub const CURRENCY_FORMAT: &str = "R$ #,##0.00;[Red]-R$ #,##0.00";

fn render_err(e: rust_xlsxwriter::XlsxError) -> Error {
    Error::Render(e.to_string())
}

pub(crate) fn non_empty_sheets(sheets: &[Sheet]) -> Vec<&Sheet> {
    sheets.iter().filter(|s| !s.is_empty()).collect()
}

/// Renders a workbook with one worksheet per non-empty dataset, in the
/// order given. Empty datasets are skipped entirely rather than producing
/// blank sheets.
///
/// # Errors
///
/// Returns `Error::Render` if the xlsx backend rejects a sheet name or the
/// workbook cannot be serialized.
#[instrument(skip(sheets))]
pub fn render_workbook(sheets: &[Sheet]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let currency_format = Format::new().set_num_format(CURRENCY_FORMAT);

    for sheet in non_empty_sheets(sheets) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name).map_err(render_err)?;

        for (col, header) in sheet.columns.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, *header, &header_format)
                .map_err(render_err)?;
        }
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = row_idx as u32 + 1;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(render_err)?;
                    }
                    Cell::Number(v) => {
                        worksheet
                            .write_number_with_format(row_num, col_num, *v, &currency_format)
                            .map_err(render_err)?;
                    }
                    Cell::Int(v) => {
                        #[allow(clippy::cast_precision_loss)]
                        worksheet
                            .write_number(row_num, col_num, *v as f64)
                            .map_err(render_err)?;
                    }
                }
            }
        }
    }

    let bytes = workbook.save_to_buffer().map_err(render_err)?;
    debug!("Rendered {} byte workbook", bytes.len());
    Ok(bytes)
}
