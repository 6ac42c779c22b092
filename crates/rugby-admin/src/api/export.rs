//! Spreadsheet and PDF downloads of the result list.

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use rugby_core::MatchResult;

use crate::error::AdminError;
use crate::export::{results_pdf, results_xlsx, sanitize_filename};
use crate::query::ResultQuery;
use crate::AppState;

const XLSX_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Every result matching the filters; paging only applies when asked for.
fn matching(state: &AppState, query: &ResultQuery) -> Result<Vec<MatchResult>, AdminError> {
    Ok(state.store.results().list(&query.filter(usize::MAX))?)
}

fn filename(query: &ResultQuery, extension: &str) -> String {
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d");
    format!(
        "rugby_results_{}_{}.{}",
        sanitize_filename(&query.label()),
        today,
        extension
    )
}

fn attachment(content_type: &'static str, filename: &str, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// `GET /export/results.xlsx`
pub async fn export_xlsx(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Response, AdminError> {
    let results = matching(&state, &query)?;
    let bytes = results_xlsx(&results)?;
    tracing::info!(rows = results.len(), "spreadsheet exported");
    Ok(attachment(XLSX_TYPE, &filename(&query, "xlsx"), bytes))
}

/// `GET /export/results.pdf`
pub async fn export_pdf(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Response, AdminError> {
    let results = matching(&state, &query)?;
    let title = match query.label().as_str() {
        "all" => "Rugby results".to_string(),
        label => format!("Rugby results: {}", label.replace('_', " ")),
    };
    let bytes = results_pdf(&results, &title)?;
    tracing::info!(rows = results.len(), "PDF exported");
    Ok(attachment("application/pdf", &filename(&query, "pdf"), bytes))
}
