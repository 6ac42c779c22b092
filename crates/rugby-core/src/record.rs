//! Match result records.

use crate::category::{Category, Gender, MatchType};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One team's line in a result: name, points and tries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLine {
    pub name: String,
    pub score: u32,
    pub tries: u32,
}

impl TeamLine {
    pub fn new(name: impl Into<String>, score: u32, tries: u32) -> Self {
        Self {
            name: name.into(),
            score,
            tries,
        }
    }
}

/// One leg of a triangular fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubMatch {
    pub home: String,
    pub away: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_tries: u32,
    pub away_tries: u32,
}

/// Who entered the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub user_id: i64,
    pub name: String,
}

/// Every field collected for a result before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub category: Category,
    pub gender: Gender,
    pub match_type: MatchType,
    pub teams: Vec<TeamLine>,
    pub date: NaiveDate,
    pub referee: Option<String>,
    pub submitted_by: Submitter,
    #[serde(default)]
    pub sub_matches: Vec<SubMatch>,
}

/// A persisted match result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: u64,
    pub category: Category,
    pub gender: Gender,
    #[serde(default)]
    pub match_type: MatchType,
    /// Two lines for a standard fixture, three for a triangular.
    pub teams: Vec<TeamLine>,
    pub date: NaiveDate,
    pub referee: Option<String>,
    pub submitted_by: Submitter,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub sub_matches: Vec<SubMatch>,
    /// Id of the published summary in the broadcast channel.
    #[serde(default)]
    pub channel_message_id: Option<i64>,
}

impl MatchResult {
    /// Builds the persisted form of a draft.
    pub fn from_draft(id: u64, draft: MatchDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            category: draft.category,
            gender: draft.gender,
            match_type: draft.match_type,
            teams: draft.teams,
            date: draft.date,
            referee: draft.referee,
            submitted_by: draft.submitted_by,
            created_at,
            sub_matches: draft.sub_matches,
            channel_message_id: None,
        }
    }

    pub fn is_triangular(&self) -> bool {
        self.match_type == MatchType::Triangular
    }

    /// Whether any team name contains `needle`, ignoring case.
    pub fn involves(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.teams
            .iter()
            .any(|t| t.name.to_lowercase().contains(&needle))
    }

    /// Team names joined for headings, e.g. `Lions vs Tigers`.
    pub fn fixture_name(&self) -> String {
        self.teams
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(" vs ")
    }

    /// Scores joined in team order, e.g. `24-17`.
    pub fn score_line(&self) -> String {
        self.teams
            .iter()
            .map(|t| t.score.to_string())
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// A team known to the bot's team pickers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_draft() -> MatchDraft {
        MatchDraft {
            category: Category::U16,
            gender: Gender::Female,
            match_type: MatchType::Standard,
            teams: vec![TeamLine::new("Lions", 24, 4), TeamLine::new("Tigers", 17, 3)],
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            referee: Some("J. Smith".to_string()),
            submitted_by: Submitter {
                user_id: 42,
                name: "Alex".to_string(),
            },
            sub_matches: vec![],
        }
    }

    #[test]
    fn from_draft_keeps_every_field() {
        let draft = sample_draft();
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap();
        let result = MatchResult::from_draft(7, draft.clone(), at);

        assert_eq!(result.id, 7);
        assert_eq!(result.category, draft.category);
        assert_eq!(result.gender, draft.gender);
        assert_eq!(result.teams, draft.teams);
        assert_eq!(result.date, draft.date);
        assert_eq!(result.referee, draft.referee);
        assert_eq!(result.submitted_by, draft.submitted_by);
        assert_eq!(result.created_at, at);
        assert_eq!(result.channel_message_id, None);
    }

    #[test]
    fn fixture_name_and_score_line() {
        let result = MatchResult::from_draft(1, sample_draft(), Utc::now());
        assert_eq!(result.fixture_name(), "Lions vs Tigers");
        assert_eq!(result.score_line(), "24-17");
    }

    #[test]
    fn involves_matches_substring_ignoring_case() {
        let result = MatchResult::from_draft(1, sample_draft(), Utc::now());
        assert!(result.involves("tig"));
        assert!(!result.involves("bears"));
    }

    #[test]
    fn legacy_documents_without_optional_fields_deserialize() {
        let json = r#"{
            "id": 3,
            "category": "U10",
            "gender": "Mixed",
            "teams": [
                {"name": "A", "score": 10, "tries": 2},
                {"name": "B", "score": 5, "tries": 1}
            ],
            "date": "2026-01-10",
            "referee": null,
            "submitted_by": {"user_id": 1, "name": "Sam"},
            "created_at": "2026-01-10T12:00:00Z"
        }"#;
        let result: MatchResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.match_type, MatchType::Standard);
        assert!(result.sub_matches.is_empty());
        assert!(result.channel_message_id.is_none());
    }
}
