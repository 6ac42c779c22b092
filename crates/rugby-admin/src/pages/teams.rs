//! Team list maintenance.

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use rugby_store::StoreError;
use serde::Deserialize;

use crate::error::AdminError;
use crate::templates::{TeamRow, TeamsTemplate};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TeamForm {
    #[serde(default)]
    pub name: String,
}

fn render(state: &AppState, name: String, error: Option<String>) -> Result<String, AdminError> {
    let teams = state.store.teams().list()?;
    let page = TeamsTemplate {
        teams: teams.iter().map(TeamRow::from).collect(),
        name,
        error,
    };
    Ok(page.render()?)
}

/// `GET /teams`
pub async fn list_teams(State(state): State<AppState>) -> Result<Html<String>, AdminError> {
    Ok(Html(render(&state, String::new(), None)?))
}

/// `POST /teams`
///
/// Duplicates re-render with `409 Conflict`, invalid names with `422`.
pub async fn add_team(State(state): State<AppState>, Form(form): Form<TeamForm>) -> Result<Response, AdminError> {
    match state.store.teams().add(&form.name) {
        Ok(team) => {
            tracing::info!(name = %team.name, "team added from panel");
            Ok(Redirect::to("/teams").into_response())
        }
        Err(e @ (StoreError::Duplicate(_) | StoreError::Invalid(_))) => {
            let status = if matches!(e, StoreError::Duplicate(_)) {
                StatusCode::CONFLICT
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            let html = render(&state, form.name, Some(e.to_string()))?;
            Ok((status, Html(html)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `POST /teams/:name/delete`
pub async fn remove_team(State(state): State<AppState>, Path(name): Path<String>) -> Result<Redirect, AdminError> {
    state.store.teams().remove(&name)?;
    tracing::info!(%name, "team removed from panel");
    Ok(Redirect::to("/teams"))
}
