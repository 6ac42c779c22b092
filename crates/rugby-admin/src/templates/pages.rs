//! Page templates.
//!
//! Every page extends `base.html`, which renders the navigation unless a
//! page overrides the `nav` block.

use askama::Template;

use super::rows::{LegView, ResultRow, SelectOption, TeamRow, UserRow};
use crate::forms::MatchForm;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub username: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub result_count: usize,
    pub team_count: usize,
    pub user_count: usize,
    pub pending_count: usize,
    /// Latest results.
    pub rows: Vec<ResultRow>,
}

/// Result list with filters and paging links.
#[derive(Template)]
#[template(path = "matches.html")]
pub struct MatchesTemplate {
    pub rows: Vec<ResultRow>,
    pub categories: Vec<SelectOption>,
    pub genders: Vec<SelectOption>,
    pub team: String,
    /// Query string of the active filters, for export links.
    pub query: String,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

/// Create or edit form for one result.
#[derive(Template)]
#[template(path = "match_form.html")]
pub struct MatchFormTemplate {
    pub title: String,
    pub action: String,
    /// Set when editing; enables the delete button.
    pub result_id: Option<u64>,
    pub error: Option<String>,
    pub form: MatchForm,
    pub categories: Vec<SelectOption>,
    pub genders: Vec<SelectOption>,
    pub match_types: Vec<SelectOption>,
    pub legs: Vec<LegView>,
}

#[derive(Template)]
#[template(path = "teams.html")]
pub struct TeamsTemplate {
    pub teams: Vec<TeamRow>,
    pub name: String,
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "users.html")]
pub struct UsersTemplate {
    pub users: Vec<UserRow>,
}
