use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::ExportError;
use crate::styles::PageStyles;
use crate::table::{Cell, Table};

const LAYER: &str = "Layer 1";

// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

/// Generate a PDF rendering of the report tables using the built-in
/// Helvetica fonts. Each table gets a heading line, a bold header row and
/// one line per data row, spread over fixed-width columns; rows that do not
/// fit on the current page continue on a new one.
pub fn generate_pdf(title: &str, tables: &[Table], styles: &PageStyles) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(styles.page_width_mm),
        Mm(styles.page_height_mm),
        LAYER,
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let mut cursor = Cursor {
        doc: &doc,
        styles,
        layer: doc.get_page(page).get_layer(layer),
        y: styles.page_height_mm - styles.margin_mm,
    };

    cursor.line(title, styles.title_size, styles.margin_mm, &bold);
    cursor.advance(styles.line_height_mm);

    for table in tables {
        cursor.ensure_room(3);
        cursor.line(&table.title, styles.heading_size, styles.margin_mm, &bold);

        let headers: Vec<String> = table.headers.iter().map(|h| h.to_string()).collect();
        cursor.ensure_room(1);
        cursor.row(&headers, &bold);

        for cells in &table.rows {
            let texts: Vec<String> = cells.iter().map(Cell::to_text).collect();
            cursor.ensure_room(1);
            cursor.row(&texts, &regular);
        }

        cursor.advance(styles.line_height_mm);
    }

    drop(cursor);
    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

struct Cursor<'a> {
    doc: &'a PdfDocumentReference,
    styles: &'a PageStyles,
    layer: PdfLayerReference,
    y: f32,
}

impl Cursor<'_> {
    fn line(&mut self, text: &str, size: f32, x: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
        self.advance(self.styles.line_height_mm + size * PT_TO_MM * 0.5);
    }

    fn row(&mut self, cells: &[String], font: &IndirectFontRef) {
        if cells.is_empty() {
            return;
        }
        let col_width = self.styles.usable_width_mm() / cells.len() as f32;
        let max_chars = fit_chars(col_width, self.styles.body_size);

        for (i, text) in cells.iter().enumerate() {
            let x = self.styles.margin_mm + col_width * i as f32;
            self.layer.use_text(
                truncate(text, max_chars),
                self.styles.body_size,
                Mm(x),
                Mm(self.y),
                font,
            );
        }
        self.advance(self.styles.line_height_mm);
    }

    fn advance(&mut self, mm: f32) {
        self.y -= mm;
    }

    /// Start a new page unless `lines` more lines fit above the bottom margin.
    fn ensure_room(&mut self, lines: usize) {
        let needed = lines as f32 * self.styles.line_height_mm;
        if self.y - needed >= self.styles.margin_mm {
            return;
        }
        let (page, layer) = self.doc.add_page(
            Mm(self.styles.page_width_mm),
            Mm(self.styles.page_height_mm),
            LAYER,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.styles.page_height_mm - self.styles.margin_mm;
    }
}

fn fit_chars(width_mm: f32, size_pt: f32) -> usize {
    let glyph_mm = size_pt * PT_TO_MM * GLYPH_WIDTH_EM;
    ((width_mm / glyph_mm).floor() as usize).max(4)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Active", 10), "Active");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("Windshield replacement", 10), "Windsh...");
    }
}
