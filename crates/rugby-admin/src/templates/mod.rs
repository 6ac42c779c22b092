//! Askama page templates and the row types they display.

mod pages;
mod rows;

pub use pages::{
    DashboardTemplate, LoginTemplate, MatchFormTemplate, MatchesTemplate, TeamsTemplate, UsersTemplate,
};
pub use rows::{LegView, ResultRow, SelectOption, TeamRow, UserRow};
