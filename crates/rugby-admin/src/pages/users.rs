//! User approval and roles.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use rugby_core::{Role, UserStatus};
use serde::Deserialize;

use crate::error::AdminError;
use crate::templates::{UserRow, UsersTemplate};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: Role,
}

/// `GET /users`
///
/// Pending users first, then by name.
pub async fn list_users(State(state): State<AppState>) -> Result<Html<String>, AdminError> {
    let mut users = state.store.users().list()?;
    users.sort_by(|a, b| {
        (b.status == UserStatus::Pending)
            .cmp(&(a.status == UserStatus::Pending))
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    let page = UsersTemplate {
        users: users.iter().map(UserRow::from).collect(),
    };
    Ok(Html(page.render()?))
}

/// `POST /users/:id/status`
///
/// The user is not notified in chat; the bot tells them on their next
/// `/new`.
pub async fn set_user_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, AdminError> {
    let user = state.store.users().set_status(id, form.status)?;
    tracing::info!(user_id = id, status = %user.status, "user status changed from panel");
    Ok(Redirect::to("/users"))
}

/// `POST /users/:id/role`
pub async fn set_user_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<RoleForm>,
) -> Result<Redirect, AdminError> {
    let user = state.store.users().set_role(id, form.role)?;
    tracing::info!(user_id = id, role = %user.role, "user role changed from panel");
    Ok(Redirect::to("/users"))
}
