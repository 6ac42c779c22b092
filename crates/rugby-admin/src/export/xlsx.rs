//! Spreadsheet export.

use rugby_core::MatchResult;
use rust_xlsxwriter::{Format, Workbook};

use super::{cells, ExportError, COLUMNS};

/// Column written as a number rather than text.
const ID_COLUMN: usize = 0;

/// Renders one header row plus one row per result.
pub fn results_xlsx(results: &[MatchResult]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Results")?;

    let bold = Format::new().set_bold();
    for (col, heading) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *heading, &bold)?;
    }

    for (i, result) in results.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, cell) in cells(result).iter().enumerate() {
            if col == ID_COLUMN {
                sheet.write_number(row, col as u16, result.id as f64)?;
            } else {
                sheet.write_string(row, col as u16, cell)?;
            }
        }
    }
    sheet.set_freeze_panes(1, 0)?;

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::test_support::result;

    #[test]
    fn writes_a_zip_container() {
        let bytes = results_xlsx(&[result(1, "Lions", "Tigers"), result(2, "Bears", "Wolves")]).unwrap();
        // xlsx files are zip archives.
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn empty_export_still_has_headers() {
        let bytes = results_xlsx(&[]).unwrap();
        assert!(!bytes.is_empty());
    }
}
