//! Dashboard page.

use askama::Template;
use axum::{extract::State, response::Html};
use rugby_core::UserStatus;
use rugby_store::ResultFilter;

use crate::error::AdminError;
use crate::templates::{DashboardTemplate, ResultRow};
use crate::AppState;

/// Results shown on the dashboard.
const LATEST: usize = 5;

/// `GET /`
pub async fn dashboard(State(state): State<AppState>) -> Result<Html<String>, AdminError> {
    let store = &state.store;
    let latest = store.results().list(&ResultFilter {
        limit: LATEST,
        ..ResultFilter::default()
    })?;
    let users = store.users().list()?;

    let page = DashboardTemplate {
        result_count: store.results().count()?,
        team_count: store.teams().list()?.len(),
        user_count: users.len(),
        pending_count: users.iter().filter(|u| u.status == UserStatus::Pending).count(),
        rows: latest.iter().map(ResultRow::from).collect(),
    };
    Ok(Html(page.render()?))
}
