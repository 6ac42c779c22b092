//! Display rows built from stored records.

use rugby_core::validate::format_date;
use rugby_core::{MatchResult, Team, UserRecord, UserStatus};

use crate::forms::{MatchForm, LEG_PAIRS};

/// One `<option>` of a select box.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    /// Options for `labels`, selecting the one equal (ignoring case) to `current`.
    pub fn list<'a>(labels: impl IntoIterator<Item = &'a str>, current: &str) -> Vec<Self> {
        labels
            .into_iter()
            .map(|label| SelectOption {
                value: label.to_string(),
                label: label.to_string(),
                selected: label.eq_ignore_ascii_case(current.trim()),
            })
            .collect()
    }

    /// Like [`Self::list`] with a leading "any" option for filters.
    pub fn filter<'a>(labels: impl IntoIterator<Item = &'a str>, current: &str) -> Vec<Self> {
        let mut options = vec![SelectOption {
            value: String::new(),
            label: "Any".to_string(),
            selected: current.trim().is_empty(),
        }];
        options.extend(Self::list(labels, current));
        options
    }
}

/// A result as shown in tables.
#[derive(Debug, Clone)]
pub struct ResultRow {
    pub id: u64,
    pub date: String,
    pub category: String,
    pub gender: String,
    pub match_type: String,
    pub fixture: String,
    pub score: String,
    pub tries: String,
    pub referee: String,
    pub submitted_by: String,
    pub published: bool,
}

impl From<&MatchResult> for ResultRow {
    fn from(result: &MatchResult) -> Self {
        Self {
            id: result.id,
            date: format_date(result.date),
            category: result.category.label().to_string(),
            gender: result.gender.label().to_string(),
            match_type: result.match_type.label().to_string(),
            fixture: result.fixture_name(),
            score: result.score_line(),
            tries: result
                .teams
                .iter()
                .map(|t| t.tries.to_string())
                .collect::<Vec<_>>()
                .join("-"),
            referee: result.referee.clone().unwrap_or_default(),
            submitted_by: result.submitted_by.name.clone(),
            published: result.channel_message_id.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamRow {
    pub name: String,
    pub added: String,
}

impl From<&Team> for TeamRow {
    fn from(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            added: format_date(team.created_at.date_naive()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub status: String,
    pub role: String,
    pub registered: String,
    pub pending: bool,
    pub approved: bool,
    pub admin: bool,
}

impl From<&UserRecord> for UserRow {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            username: user
                .username
                .as_deref()
                .map(|u| format!("@{u}"))
                .unwrap_or_default(),
            status: user.status.label().to_string(),
            role: user.role.label().to_string(),
            registered: format_date(user.registered_at.date_naive()),
            pending: user.status == UserStatus::Pending,
            approved: user.status == UserStatus::Approved,
            admin: user.is_admin(),
        }
    }
}

/// Input fields for one triangular leg.
#[derive(Debug, Clone)]
pub struct LegView {
    /// Field name prefix, e.g. `leg2`.
    pub prefix: String,
    pub home: String,
    pub away: String,
    pub home_score: String,
    pub away_score: String,
    pub home_tries: String,
    pub away_tries: String,
}

impl LegView {
    /// The three legs of `form`, labelled with its team names.
    pub fn from_form(form: &MatchForm) -> Vec<Self> {
        let names = [&form.team1, &form.team2, &form.team3];
        let label = |i: usize| {
            let name = names[i].trim();
            if name.is_empty() {
                format!("Team {}", i + 1)
            } else {
                name.to_string()
            }
        };
        LEG_PAIRS
            .iter()
            .enumerate()
            .map(|(n, &(h, a))| {
                let leg = form.leg(n);
                LegView {
                    prefix: format!("leg{}", n + 1),
                    home: label(h),
                    away: label(a),
                    home_score: leg.home_score,
                    away_score: leg.away_score,
                    home_tries: leg.home_tries,
                    away_tries: leg.away_tries,
                }
            })
            .collect()
    }
}
