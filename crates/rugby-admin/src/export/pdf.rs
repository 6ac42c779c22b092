//! A4 PDF export: a paginated table in a built-in font.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rugby_core::MatchResult;

use super::{cells, ExportError, COLUMNS};

const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const LINE_HEIGHT: f32 = 6.0;
const FONT_SIZE: f32 = 8.0;
const TITLE_SIZE: f32 = 14.0;

/// Column x offsets from the left margin, in millimetres.
const COLUMN_X: [f32; 10] = [0.0, 10.0, 30.0, 46.0, 62.0, 82.0, 172.0, 192.0, 208.0, 240.0];
/// Widest cell text per column, in characters.
const COLUMN_CHARS: [usize; 10] = [5, 10, 7, 7, 10, 52, 11, 9, 18, 20];

/// Renders the results as a landscape A4 table, repeating the header on
/// every page.
pub fn results_pdf(results: &[MatchResult], title: &str) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    let mut current = doc.get_page(page).get_layer(layer);
    current.use_text(pdf_text(title), TITLE_SIZE, Mm(MARGIN), Mm(PAGE_HEIGHT - MARGIN), &bold);
    let mut y = PAGE_HEIGHT - MARGIN - 2.0 * LINE_HEIGHT;
    write_row(&current, &COLUMNS.map(str::to_string), y, &bold);
    y -= LINE_HEIGHT;

    if results.is_empty() {
        current.use_text("No results.", FONT_SIZE, Mm(MARGIN), Mm(y), &regular);
    }

    for result in results {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            current = doc.get_page(page).get_layer(layer);
            y = PAGE_HEIGHT - MARGIN;
            write_row(&current, &COLUMNS.map(str::to_string), y, &bold);
            y -= LINE_HEIGHT;
        }
        write_row(&current, &cells(result), y, &regular);
        y -= LINE_HEIGHT;
    }

    Ok(doc.save_to_bytes()?)
}

fn write_row(layer: &PdfLayerReference, cells: &[String; 10], y: f32, font: &IndirectFontRef) {
    for ((cell, x), max) in cells.iter().zip(COLUMN_X).zip(COLUMN_CHARS) {
        layer.use_text(
            truncate(&pdf_text(cell), max),
            FONT_SIZE,
            Mm(MARGIN + x),
            Mm(y),
            font,
        );
    }
}

/// Built-in fonts only cover Latin-1; anything else becomes `?`.
fn pdf_text(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::result;

    #[test]
    fn renders_pdf_bytes() {
        let bytes = results_pdf(&[result(1, "Lions", "Tigers")], "Rugby results").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn paginates_long_lists() {
        let results: Vec<_> = (1..=80).map(|i| result(i, "Lions", "Tigers")).collect();
        let bytes = results_pdf(&results, "Rugby results").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn non_latin_text_is_replaced() {
        assert_eq!(pdf_text("Peñarol 🏉"), "Peñarol ?");
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
