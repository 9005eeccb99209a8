//! Document engines that turn a [`PayslipLayout`] into a file.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use super::layout::{LayoutRow, PayslipLayout};
use crate::error::{EngineError, EngineResult};

/// Draws a payslip layout to a file.
///
/// Implementations are synchronous; callers on an async runtime that care
/// about latency should run them on a blocking thread.
pub trait DocumentEngine: Send + Sync {
    /// Writes the document to `path`, replacing any existing file.
    fn write_document(&self, layout: &PayslipLayout, path: &Path) -> EngineResult<()>;
}

/// A4 PDF engine using the built-in Helvetica fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfEngine;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 20.0;
const EARNING_AMOUNT_X: f32 = 75.0;
const DEDUCTION_LABEL_X: f32 = 110.0;
const DEDUCTION_AMOUNT_X: f32 = 160.0;
const LINE_GAP: f32 = 7.0;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn render_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::Render {
        message: err.to_string(),
    }
}

impl PdfEngine {
    fn table_row(canvas: &PdfLayerReference, row: &LayoutRow, y: f32, font: &IndirectFontRef) {
        canvas.use_text(&row.earning_label, 10.0, Mm(LEFT), Mm(y), font);
        canvas.use_text(&row.earning_amount, 10.0, Mm(EARNING_AMOUNT_X), Mm(y), font);
        canvas.use_text(&row.deduction_label, 10.0, Mm(DEDUCTION_LABEL_X), Mm(y), font);
        canvas.use_text(&row.deduction_amount, 10.0, Mm(DEDUCTION_AMOUNT_X), Mm(y), font);
    }

    fn draw(canvas: &PdfLayerReference, layout: &PayslipLayout, fonts: &Fonts) {
        let mut y = PAGE_HEIGHT - 25.0;

        canvas.use_text(&layout.institution, 20.0, Mm(LEFT), Mm(y), &fonts.bold);
        y -= LINE_GAP;
        canvas.use_text(&layout.tagline, 10.0, Mm(LEFT), Mm(y), &fonts.regular);
        y -= LINE_GAP * 2.0;
        canvas.use_text(&layout.title, 14.0, Mm(LEFT), Mm(y), &fonts.bold);
        y -= LINE_GAP * 2.0;

        for (label, value) in &layout.employee_details {
            canvas.use_text(format!("{}:", label), 10.0, Mm(LEFT), Mm(y), &fonts.bold);
            canvas.use_text(value, 10.0, Mm(EARNING_AMOUNT_X), Mm(y), &fonts.regular);
            y -= LINE_GAP;
        }
        y -= LINE_GAP;

        canvas.use_text("Earnings", 11.0, Mm(LEFT), Mm(y), &fonts.bold);
        canvas.use_text("Deductions", 11.0, Mm(DEDUCTION_LABEL_X), Mm(y), &fonts.bold);
        y -= LINE_GAP;

        for row in &layout.rows {
            Self::table_row(canvas, row, y, &fonts.regular);
            y -= LINE_GAP;
        }
        y -= LINE_GAP / 2.0;
        Self::table_row(canvas, &layout.totals, y, &fonts.bold);
        y -= LINE_GAP * 2.0;

        let (net_label, net_amount) = &layout.net_salary;
        canvas.use_text(net_label, 14.0, Mm(LEFT), Mm(y), &fonts.bold);
        canvas.use_text(net_amount, 14.0, Mm(EARNING_AMOUNT_X), Mm(y), &fonts.bold);

        canvas.use_text(&layout.footer, 8.0, Mm(LEFT), Mm(20.0), &fonts.regular);
    }
}

impl DocumentEngine for PdfEngine {
    fn write_document(&self, layout: &PayslipLayout, path: &Path) -> EngineResult<()> {
        let (doc, page, layer) = PdfDocument::new(
            layout.title.clone(),
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            "Payslip".to_string(),
        );
        let fonts = Fonts {
            regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?,
            bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?,
        };

        let canvas = doc.get_page(page).get_layer(layer);
        Self::draw(&canvas, layout, &fonts);

        let file = File::create(path).map_err(|e| EngineError::Render {
            message: format!("cannot create {}: {}", path.display(), e),
        })?;
        doc.save(&mut BufWriter::new(file)).map_err(render_error)?;
        Ok(())
    }
}
