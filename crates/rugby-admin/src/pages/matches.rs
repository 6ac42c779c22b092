//! Result list, create, edit and delete.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use rugby_core::{Category, Gender, MatchType, Submitter};

use crate::error::AdminError;
use crate::forms::MatchForm;
use crate::query::ResultQuery;
use crate::templates::{LegView, MatchFormTemplate, MatchesTemplate, ResultRow, SelectOption};
use crate::AppState;

/// Results per list page.
pub const PAGE_SIZE: usize = 25;
const MAX_PAGE_SIZE: usize = 200;

/// User id recorded for results entered through the panel.
pub const PANEL_USER_ID: i64 = 0;

/// `GET /matches`
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<ResultQuery>,
) -> Result<Html<String>, AdminError> {
    let mut filter = query.filter(PAGE_SIZE);
    let page_size = filter.limit.clamp(1, MAX_PAGE_SIZE);
    // One extra row tells whether an older page exists.
    filter.limit = page_size + 1;
    let mut results = state.store.results().list(&filter)?;
    let has_more = results.len() > page_size;
    results.truncate(page_size);

    let offset = filter.offset;
    let page = MatchesTemplate {
        rows: results.iter().map(ResultRow::from).collect(),
        categories: SelectOption::filter(Category::ALL.map(Category::label), &query.category),
        genders: SelectOption::filter(Gender::ALL.map(Gender::label), &query.gender),
        team: query.team.clone(),
        query: query.filters_query(),
        prev_url: (offset > 0)
            .then(|| format!("/matches{}", query.at_offset(offset.saturating_sub(page_size)))),
        next_url: has_more.then(|| format!("/matches{}", query.at_offset(offset + page_size))),
    };
    Ok(Html(page.render()?))
}

fn render_form(
    title: String,
    action: String,
    result_id: Option<u64>,
    form: MatchForm,
    error: Option<String>,
) -> Result<String, AdminError> {
    let page = MatchFormTemplate {
        title,
        action,
        result_id,
        error,
        categories: SelectOption::list(Category::ALL.map(Category::label), &form.category),
        genders: SelectOption::list(Gender::ALL.map(Gender::label), &form.gender),
        match_types: SelectOption::list(MatchType::ALL.map(MatchType::label), &form.match_type),
        legs: LegView::from_form(&form),
        form,
    };
    Ok(page.render()?)
}

/// `GET /matches/new`
pub async fn new_match_form() -> Result<Html<String>, AdminError> {
    let form = MatchForm::blank(chrono::Local::now().date_naive());
    let html = render_form("New result".to_string(), "/matches/new".to_string(), None, form, None)?;
    Ok(Html(html))
}

/// `POST /matches/new`
///
/// Redirects to the stored result, or re-renders the form with
/// `422 Unprocessable Entity`.
pub async fn create_match(
    State(state): State<AppState>,
    Form(form): Form<MatchForm>,
) -> Result<Response, AdminError> {
    let submitter = Submitter {
        user_id: PANEL_USER_ID,
        name: state.credentials.username.clone(),
    };
    let draft = match form.to_draft(submitter) {
        Ok(draft) => draft,
        Err(e) => {
            let html = render_form(
                "New result".to_string(),
                "/matches/new".to_string(),
                None,
                form,
                Some(e.to_string()),
            )?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    let result = state.store.results().insert(draft)?;
    state
        .store
        .teams()
        .ensure(result.teams.iter().map(|t| t.name.as_str()))?;
    Ok(Redirect::to(&format!("/matches/{}", result.id)).into_response())
}

/// `GET /matches/:id`
pub async fn edit_match_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Html<String>, AdminError> {
    let result = state
        .store
        .results()
        .get(id)?
        .ok_or_else(|| AdminError::NotFound(format!("result {id}")))?;
    let html = render_form(
        format!("Result #{id}"),
        format!("/matches/{id}"),
        Some(id),
        MatchForm::from_result(&result),
        None,
    )?;
    Ok(Html(html))
}

/// `POST /matches/:id`
///
/// The original submitter is kept. A result already published to the
/// channel is not re-published.
pub async fn update_match(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Form(form): Form<MatchForm>,
) -> Result<Response, AdminError> {
    let existing = state
        .store
        .results()
        .get(id)?
        .ok_or_else(|| AdminError::NotFound(format!("result {id}")))?;

    let draft = match form.to_draft(existing.submitted_by) {
        Ok(draft) => draft,
        Err(e) => {
            let html = render_form(
                format!("Result #{id}"),
                format!("/matches/{id}"),
                Some(id),
                form,
                Some(e.to_string()),
            )?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response());
        }
    };

    let result = state.store.results().replace(id, draft)?;
    state
        .store
        .teams()
        .ensure(result.teams.iter().map(|t| t.name.as_str()))?;
    tracing::info!(id, fixture = %result.fixture_name(), "result updated from panel");
    Ok(Redirect::to(&format!("/matches/{id}")).into_response())
}

/// `POST /matches/:id/delete`
pub async fn delete_match(State(state): State<AppState>, Path(id): Path<u64>) -> Result<Redirect, AdminError> {
    state.store.results().delete(id)?;
    tracing::info!(id, "result deleted from panel");
    Ok(Redirect::to("/matches"))
}
