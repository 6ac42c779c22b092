//! Result exports rendered to in-memory buffers.

mod pdf;
mod xlsx;

pub use pdf::results_pdf;
pub use xlsx::results_xlsx;

use rugby_core::validate::format_date;
use rugby_core::MatchResult;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("PDF export failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Column headings shared by both exports.
pub const COLUMNS: [&str; 10] = [
    "Id", "Date", "Category", "Gender", "Type", "Teams", "Score", "Tries", "Referee", "Entered by",
];

/// One result flattened to export cells, in [`COLUMNS`] order.
pub(crate) fn cells(result: &MatchResult) -> [String; 10] {
    let tries = result
        .teams
        .iter()
        .map(|t| t.tries.to_string())
        .collect::<Vec<_>>()
        .join("-");
    [
        result.id.to_string(),
        format_date(result.date),
        result.category.label().to_string(),
        result.gender.label().to_string(),
        result.match_type.label().to_string(),
        result.fixture_name(),
        result.score_line(),
        tries,
        result.referee.clone().unwrap_or_default(),
        result.submitted_by.name.clone(),
    ]
}

/// Replaces any character other than alphanumerics, dash and underscore.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
