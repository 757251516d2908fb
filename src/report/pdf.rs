//! Paginated PDF cash summary.
//!
//! Layout follows the printed register slip: a centred title, the date
//! line, then one row per summary entry with the label on the left and the
//! amount right-aligned in its own column. Negative amounts are printed in
//! red. The monthly variant appends the breakdown sections, skipping any
//! that are empty.

use crate::core::breakdown::MonthlyBreakdown;
use crate::core::totals::Totals;
use crate::errors::{Error, Result};
use crate::report::summary::{format_currency, summary_rows};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rgb,
};
use tracing::{debug, instrument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const TOP_Y: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;
const LABEL_X: f32 = 20.0;
const VALUE_X: f32 = 150.0;
const ROW_STEP: f32 = 8.0;

/// Which summary is being rendered; selects the document title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Monthly,
}

struct PageCursor {
    layer: PdfLayerReference,
    y: f32,
}

fn advance(doc: &PdfDocumentReference, cursor: &mut PageCursor, step: f32) {
    cursor.y -= step;
    if cursor.y < BOTTOM_MARGIN {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        cursor.layer = doc.get_page(page).get_layer(layer);
        cursor.y = TOP_Y;
    }
}

fn text(cursor: &PageCursor, font: &IndirectFontRef, s: &str, size: f32, x: f32) {
    cursor.layer.use_text(s, size, Mm(x), Mm(cursor.y), font);
}

fn set_text_color(cursor: &PageCursor, negative: bool) {
    let color = if negative {
        Color::Rgb(Rgb::new(0.8, 0.0, 0.0, None))
    } else {
        Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
    };
    cursor.layer.set_fill_color(color);
}

fn amount_row(
    doc: &PdfDocumentReference,
    cursor: &mut PageCursor,
    font: &IndirectFontRef,
    label: &str,
    value: f64,
) {
    set_text_color(cursor, value < 0.0);
    text(cursor, font, label, 12.0, LABEL_X);
    text(cursor, font, &format_currency(value), 12.0, VALUE_X);
    set_text_color(cursor, false);
    advance(doc, cursor, ROW_STEP);
}

fn section_header(
    doc: &PdfDocumentReference,
    cursor: &mut PageCursor,
    font_bold: &IndirectFontRef,
    title: &str,
) {
    advance(doc, cursor, 4.0);
    text(cursor, font_bold, title, 13.0, LABEL_X);
    advance(doc, cursor, ROW_STEP);
}

/// Renders the cash summary as PDF bytes.
///
/// `period_label` is the printed date line: `YYYY-MM-DD` for daily
/// summaries, `MM/YYYY` for monthly ones. The monthly breakdown sections
/// are appended only for rows the caller passes in; empty sections are
/// skipped entirely.
///
/// # Errors
///
/// Returns `Error::Render` if the PDF backend fails.
#[instrument(skip(totals, breakdown))]
pub fn render_summary_pdf(
    totals: &Totals,
    period_label: &str,
    kind: ReportKind,
    breakdown: Option<&MonthlyBreakdown>,
) -> Result<Vec<u8>> {
    let title = match kind {
        ReportKind::Daily => "Daily Cash Summary".to_string(),
        ReportKind::Monthly => format!("Monthly Cash Summary - {period_label}"),
    };

    let (doc, page1, layer1) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Render(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Render(e.to_string()))?;

    let mut cursor = PageCursor {
        layer: doc.get_page(page1).get_layer(layer1),
        y: TOP_Y,
    };

    text(&cursor, &font_bold, &title, 16.0, 55.0);
    advance(&doc, &mut cursor, 14.0);
    text(&cursor, &font, &format!("Date: {period_label}"), 12.0, LABEL_X);
    advance(&doc, &mut cursor, 12.0);

    for (label, value) in summary_rows(totals) {
        amount_row(&doc, &mut cursor, &font, label, value);
    }

    if let Some(breakdown) = breakdown {
        if !breakdown.receipts_by_day.is_empty() {
            section_header(&doc, &mut cursor, &font_bold, "Receipts by Day");
            for row in &breakdown.receipts_by_day {
                amount_row(&doc, &mut cursor, &font, &row.date.to_string(), row.total);
            }
        }
        if !breakdown.expenses_by_category.is_empty() {
            section_header(&doc, &mut cursor, &font_bold, "Expenses by Category");
            for row in &breakdown.expenses_by_category {
                amount_row(&doc, &mut cursor, &font, &row.category, row.total);
            }
        }
        if !breakdown.receipts_by_method.is_empty() {
            section_header(&doc, &mut cursor, &font_bold, "Receipts by Payment Method");
            for row in &breakdown.receipts_by_method {
                amount_row(&doc, &mut cursor, &font, &row.method, row.total);
            }
        }
    }

    let bytes = doc
        .save_to_bytes()
        .map_err(|e| Error::Render(e.to_string()))?;
    debug!("Rendered {} byte PDF for '{}'", bytes.len(), period_label);
    Ok(bytes)
}
