//! PDF adapter: Printable disease reports via `printpdf`.
//!
//! A4 pages, builtin Helvetica. Long lines are word-wrapped and content
//! flows onto new pages as needed.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use crate::domain::report::sections;
use crate::domain::DiseaseResult;
use crate::FloraguardError;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;
const INDENT: f32 = 25.0;
const WRAP_CHARS: usize = 90;

fn pdf_err(context: &str, e: impl std::fmt::Display) -> FloraguardError {
    FloraguardError::Report(format!("PDF {context} error: {e}"))
}

/// File name for a result's report, e.g. `Tomato - Late blight-Report.pdf`.
#[must_use]
pub fn report_file_name(result: &DiseaseResult) -> String {
    let name: String = result
        .display_name()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{name}-Report.pdf")
}

/// Writes lines top to bottom, starting a new page when space runs out.
struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl<'a> PageWriter<'a> {
    fn line(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef, advance: f32) {
        if self.y - advance < BOTTOM {
            let (page, layer) = self.doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = TOP;
        }
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.y -= advance;
    }

    fn gap(&mut self, amount: f32) {
        self.y -= amount;
    }
}

/// Render a result as PDF bytes.
///
/// # Errors
/// Returns `FloraguardError::Report` if fonts cannot be embedded or the
/// document cannot be serialized.
pub fn render_pdf(result: &DiseaseResult, date: chrono::NaiveDate) -> Result<Vec<u8>, FloraguardError> {
    let title = result.display_name();
    let (doc, page1, layer1) = PdfDocument::new(&title, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_err("font", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_err("font", e))?;

    {
        let mut out = PageWriter {
            doc: &doc,
            layer: doc.get_page(page1).get_layer(layer1),
            y: TOP,
        };

        out.line(&title, 20.0, LEFT, &bold, 12.0);
        out.line(
            &format!("Confidence: {:.1}%", result.confidence * 100.0),
            12.0,
            LEFT,
            &font,
            6.0,
        );
        out.line(&format!("Date: {}", date.format("%Y-%m-%d")), 12.0, LEFT, &font, 10.0);

        if let Some(info) = &result.disease_info {
            for section in sections(info) {
                out.line(section.title, 14.0, LEFT, &bold, 7.0);
                for line in &section.lines {
                    // Builtin fonts only cover WinAnsi.
                    let line = line.replace('•', "-");
                    for wrapped in wrap_text(&line, WRAP_CHARS) {
                        out.line(&wrapped, 10.0, INDENT, &font, 5.0);
                    }
                }
                out.gap(4.0);
            }
        } else {
            out.line(&format!("Solution: {}", result.solution), 11.0, LEFT, &font, 6.0);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(|e| pdf_err("save", e))?;
    buf.into_inner().map_err(|e| pdf_err("buffer", e))
}

fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.chars().count() + word.chars().count() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fallback::generic_disease_info;
    use std::sync::Arc;

    fn sample() -> DiseaseResult {
        DiseaseResult::assemble(
            "Tomato___Late_blight",
            0.91,
            42,
            Arc::new(generic_disease_info("Tomato - Late blight")),
        )
    }

    #[test]
    fn test_render_pdf_produces_document() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid date");
        let bytes = render_pdf(&sample(), date).expect("Should render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_pdf_without_info() {
        let mut result = sample();
        result.disease_info = None;
        let date = chrono::NaiveDate::from_ymd_opt(2026, 5, 4).expect("valid date");
        let bytes = render_pdf(&result, date).expect("Should render");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name(&sample()), "Tomato - Late blight-Report.pdf");

        let mut odd = sample();
        odd.disease = "Corn/maize___Rust".to_string();
        assert_eq!(report_file_name(&odd), "Corn_maize - Rust-Report.pdf");
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("one two three four five", 9);
        assert_eq!(lines, vec!["one two", "three", "four five"]);
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }
}
