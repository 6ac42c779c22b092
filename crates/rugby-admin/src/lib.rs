//! Web admin panel for rugby match results.
//!
//! Server-rendered pages behind a single password login:
//! - dashboard, result list with filters, create/edit/delete forms
//! - team list maintenance
//! - user approval and roles
//! - spreadsheet, PDF and JSON exports

pub mod api;
pub mod auth;
pub mod error;
pub mod export;
pub mod forms;
pub mod middleware;
pub mod pages;
pub mod query;
pub mod templates;

use std::path::Path;
use std::sync::Arc;

use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use rugby_store::Store;
use tower_http::services::ServeDir;

use auth::{Credentials, SessionStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub credentials: Arc<Credentials>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(store: Store, credentials: Credentials, session_ttl: chrono::Duration) -> Self {
        Self {
            store,
            credentials: Arc::new(credentials),
            sessions: Arc::new(SessionStore::new(session_ttl)),
        }
    }
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

/// Builds the panel router. Everything except `/health`, `/login` and the
/// stylesheet requires a session.
pub fn router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let protected = Router::new()
        .route("/", get(pages::dashboard::dashboard))
        .route("/logout", post(auth::logout))
        .route("/matches", get(pages::matches::list_matches))
        .route(
            "/matches/new",
            get(pages::matches::new_match_form).post(pages::matches::create_match),
        )
        .route(
            "/matches/:id",
            get(pages::matches::edit_match_form).post(pages::matches::update_match),
        )
        .route("/matches/:id/delete", post(pages::matches::delete_match))
        .route(
            "/teams",
            get(pages::teams::list_teams).post(pages::teams::add_team),
        )
        .route("/teams/:name/delete", post(pages::teams::remove_team))
        .route("/users", get(pages::users::list_users))
        .route("/users/:id/status", post(pages::users::set_user_status))
        .route("/users/:id/role", post(pages::users::set_user_role))
        .route("/export/results.xlsx", get(api::export::export_xlsx))
        .route("/export/results.pdf", get(api::export::export_pdf))
        .route("/api/results", get(api::results::list_results))
        .route_layer(from_fn_with_state(state.clone(), auth::require_session));

    Router::new()
        .route("/health", get(health))
        .route("/login", get(auth::login_page).post(auth::login))
        .merge(protected)
        .with_state(state)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(from_fn(middleware::timing_layer))
}
