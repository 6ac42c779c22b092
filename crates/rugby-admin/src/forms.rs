//! Match result form parsing.
//!
//! Every field arrives as text so a rejected submission can be rendered
//! back exactly as typed.

use rugby_core::scoring::fold_sub_matches;
use rugby_core::validate::{format_date, parse_date, parse_non_negative, validate_team_name};
use rugby_core::{
    Category, Gender, MatchDraft, MatchResult, MatchType, SubMatch, Submitter, TeamLine, UnknownLabel,
    ValidationError,
};
use serde::Deserialize;
use thiserror::Error;

/// Team index pairs for the three legs of a triangular.
pub const LEG_PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

#[derive(Error, Debug)]
pub enum FormError {
    #[error("{field}: {source}")]
    Field {
        field: String,
        #[source]
        source: ValidationError,
    },
    #[error(transparent)]
    Label(#[from] UnknownLabel),
    #[error("{0} does not play triangular matches.")]
    TriangularNotAllowed(Category),
    #[error("Fill in every score of all three legs, or leave the legs empty.")]
    IncompleteLegs,
    #[error("The leg scores add up to more than a team total can hold.")]
    LegTotalsTooLarge,
}

fn field(name: impl Into<String>) -> impl FnOnce(ValidationError) -> FormError {
    let field = name.into();
    move |source| FormError::Field { field, source }
}

/// Scores of one triangular leg as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegInput {
    pub home_score: String,
    pub away_score: String,
    pub home_tries: String,
    pub away_tries: String,
}

impl LegInput {
    fn is_blank(&self) -> bool {
        [&self.home_score, &self.away_score, &self.home_tries, &self.away_tries]
            .iter()
            .all(|v| v.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchForm {
    pub category: String,
    pub gender: String,
    pub match_type: String,
    pub date: String,
    pub referee: String,
    pub team1: String,
    pub team2: String,
    pub team3: String,
    pub score1: String,
    pub score2: String,
    pub score3: String,
    pub tries1: String,
    pub tries2: String,
    pub tries3: String,
    pub leg1_home_score: String,
    pub leg1_away_score: String,
    pub leg1_home_tries: String,
    pub leg1_away_tries: String,
    pub leg2_home_score: String,
    pub leg2_away_score: String,
    pub leg2_home_tries: String,
    pub leg2_away_tries: String,
    pub leg3_home_score: String,
    pub leg3_away_score: String,
    pub leg3_home_tries: String,
    pub leg3_away_tries: String,
}

impl MatchForm {
    /// A blank form for a new result dated `today`.
    pub fn blank(today: chrono::NaiveDate) -> Self {
        Self {
            category: Category::U12.label().to_string(),
            gender: Gender::Male.label().to_string(),
            match_type: MatchType::Standard.label().to_string(),
            date: format_date(today),
            ..Self::default()
        }
    }

    /// Prefills the form from a stored result.
    pub fn from_result(result: &MatchResult) -> Self {
        let mut form = Self {
            category: result.category.label().to_string(),
            gender: result.gender.label().to_string(),
            match_type: result.match_type.label().to_string(),
            date: format_date(result.date),
            referee: result.referee.clone().unwrap_or_default(),
            ..Self::default()
        };
        for (i, team) in result.teams.iter().enumerate().take(3) {
            let [name, score, tries] = form.team_mut(i);
            *name = team.name.clone();
            *score = team.score.to_string();
            *tries = team.tries.to_string();
        }
        for leg in &result.sub_matches {
            let pos = |name: &str| result.teams.iter().position(|t| t.name == name);
            let (Some(home), Some(away)) = (pos(&leg.home), pos(&leg.away)) else {
                continue;
            };
            if let Some(n) = LEG_PAIRS.iter().position(|&pair| pair == (home, away)) {
                form.set_leg(
                    n,
                    LegInput {
                        home_score: leg.home_score.to_string(),
                        away_score: leg.away_score.to_string(),
                        home_tries: leg.home_tries.to_string(),
                        away_tries: leg.away_tries.to_string(),
                    },
                );
            }
        }
        form
    }

    fn team_mut(&mut self, i: usize) -> [&mut String; 3] {
        match i {
            0 => [&mut self.team1, &mut self.score1, &mut self.tries1],
            1 => [&mut self.team2, &mut self.score2, &mut self.tries2],
            _ => [&mut self.team3, &mut self.score3, &mut self.tries3],
        }
    }

    fn team(&self, i: usize) -> [&str; 3] {
        match i {
            0 => [&self.team1, &self.score1, &self.tries1],
            1 => [&self.team2, &self.score2, &self.tries2],
            _ => [&self.team3, &self.score3, &self.tries3],
        }
    }

    /// The typed scores of leg `n` (0-based).
    pub fn leg(&self, n: usize) -> LegInput {
        let [home_score, away_score, home_tries, away_tries] = match n {
            0 => [&self.leg1_home_score, &self.leg1_away_score, &self.leg1_home_tries, &self.leg1_away_tries],
            1 => [&self.leg2_home_score, &self.leg2_away_score, &self.leg2_home_tries, &self.leg2_away_tries],
            _ => [&self.leg3_home_score, &self.leg3_away_score, &self.leg3_home_tries, &self.leg3_away_tries],
        };
        LegInput {
            home_score: home_score.clone(),
            away_score: away_score.clone(),
            home_tries: home_tries.clone(),
            away_tries: away_tries.clone(),
        }
    }

    fn set_leg(&mut self, n: usize, leg: LegInput) {
        let slots = match n {
            0 => [&mut self.leg1_home_score, &mut self.leg1_away_score, &mut self.leg1_home_tries, &mut self.leg1_away_tries],
            1 => [&mut self.leg2_home_score, &mut self.leg2_away_score, &mut self.leg2_home_tries, &mut self.leg2_away_tries],
            _ => [&mut self.leg3_home_score, &mut self.leg3_away_score, &mut self.leg3_home_tries, &mut self.leg3_away_tries],
        };
        let [home_score, away_score, home_tries, away_tries] = slots;
        *home_score = leg.home_score;
        *away_score = leg.away_score;
        *home_tries = leg.home_tries;
        *away_tries = leg.away_tries;
    }

    /// Validates the form into a draft attributed to `submitted_by`.
    ///
    /// Triangular results with legs filled in get their team totals
    /// recomputed from the legs; the typed totals are ignored.
    pub fn to_draft(&self, submitted_by: Submitter) -> Result<MatchDraft, FormError> {
        let category: Category = self.category.parse()?;
        let gender: Gender = self.gender.parse()?;
        let match_type: MatchType = self.match_type.parse()?;
        if match_type == MatchType::Triangular && !category.allows_triangular() {
            return Err(FormError::TriangularNotAllowed(category));
        }
        let date = parse_date(&self.date).map_err(field("Date"))?;

        let mut names: Vec<String> = Vec::new();
        for i in 0..match_type.team_count() {
            let [name, _, _] = self.team(i);
            let name = validate_team_name(name, &names).map_err(field(format!("Team {}", i + 1)))?;
            names.push(name);
        }

        let sub_matches = if match_type == MatchType::Triangular {
            self.sub_matches(&names)?
        } else {
            Vec::new()
        };

        let teams = if sub_matches.is_empty() {
            let mut teams = Vec::with_capacity(names.len());
            for (i, name) in names.into_iter().enumerate() {
                let [_, score, tries] = self.team(i);
                let label = format!("{name} points");
                let score = parse_non_negative(score).map_err(field(label))?;
                let label = format!("{name} tries");
                let tries = parse_non_negative(tries).map_err(field(label))?;
                teams.push(TeamLine::new(name, score, tries));
            }
            teams
        } else {
            fold_sub_matches(&sub_matches).ok_or(FormError::LegTotalsTooLarge)?
        };

        let referee = self.referee.trim();
        Ok(MatchDraft {
            category,
            gender,
            match_type,
            teams,
            date,
            referee: (!referee.is_empty() && referee != "-").then(|| referee.to_string()),
            submitted_by,
            sub_matches,
        })
    }

    /// Parses the legs; all blank means none were entered.
    fn sub_matches(&self, names: &[String]) -> Result<Vec<SubMatch>, FormError> {
        let legs: Vec<LegInput> = (0..LEG_PAIRS.len()).map(|n| self.leg(n)).collect();
        if legs.iter().all(LegInput::is_blank) {
            return Ok(Vec::new());
        }
        if legs.iter().any(LegInput::is_blank) {
            return Err(FormError::IncompleteLegs);
        }

        LEG_PAIRS
            .iter()
            .zip(&legs)
            .map(|(&(h, a), leg)| -> Result<SubMatch, FormError> {
                let (home, away) = (&names[h], &names[a]);
                let num = |value: &str, what: &str| {
                    parse_non_negative(value).map_err(field(format!("{home} vs {away} {what}")))
                };
                Ok(SubMatch {
                    home: home.clone(),
                    away: away.clone(),
                    home_score: num(&leg.home_score, "home points")?,
                    away_score: num(&leg.away_score, "away points")?,
                    home_tries: num(&leg.home_tries, "home tries")?,
                    away_tries: num(&leg.away_tries, "away tries")?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn admin() -> Submitter {
        Submitter {
            user_id: 0,
            name: "admin".to_string(),
        }
    }

    fn standard() -> MatchForm {
        MatchForm {
            category: "u12".into(),
            gender: "Female".into(),
            match_type: "Standard".into(),
            date: "14/03/2026".into(),
            referee: " Pat ".into(),
            team1: "Lions".into(),
            team2: "Tigers".into(),
            score1: "24".into(),
            score2: "17".into(),
            tries1: "4".into(),
            tries2: "3".into(),
            ..MatchForm::default()
        }
    }

    fn triangular() -> MatchForm {
        MatchForm {
            category: "U14".into(),
            match_type: "Triangular".into(),
            team3: "Bears".into(),
            score3: "0".into(),
            tries3: "0".into(),
            ..standard()
        }
    }

    #[test]
    fn standard_form_becomes_draft() {
        let draft = standard().to_draft(admin()).unwrap();
        assert_eq!(draft.category, Category::U12);
        assert_eq!(draft.gender, Gender::Female);
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(
            draft.teams,
            vec![TeamLine::new("Lions", 24, 4), TeamLine::new("Tigers", 17, 3)]
        );
        assert_eq!(draft.referee.as_deref(), Some("Pat"));
        assert!(draft.sub_matches.is_empty());
    }

    #[test]
    fn unused_third_team_is_ignored_for_standard() {
        let form = MatchForm {
            team3: "Bears".into(),
            score3: "oops".into(),
            ..standard()
        };
        assert_eq!(form.to_draft(admin()).unwrap().teams.len(), 2);
    }

    #[test]
    fn dash_or_blank_referee_means_none() {
        for referee in ["", "-", "   "] {
            let form = MatchForm {
                referee: referee.into(),
                ..standard()
            };
            assert_eq!(form.to_draft(admin()).unwrap().referee, None);
        }
    }

    #[test]
    fn field_errors_name_the_field() {
        let form = MatchForm {
            score2: "-3".into(),
            ..standard()
        };
        let err = form.to_draft(admin()).unwrap_err();
        assert_eq!(err.to_string(), "Tigers points: The number cannot be negative.");

        let form = MatchForm {
            date: "2026-03-14".into(),
            ..standard()
        };
        assert!(form.to_draft(admin()).unwrap_err().to_string().starts_with("Date:"));
    }

    #[test]
    fn duplicate_team_is_rejected() {
        let form = MatchForm {
            team2: "lions".into(),
            ..standard()
        };
        assert!(matches!(
            form.to_draft(admin()),
            Err(FormError::Field {
                source: ValidationError::DuplicateTeam(_),
                ..
            })
        ));
    }

    #[test]
    fn unknown_labels_are_rejected() {
        let form = MatchForm {
            category: "U99".into(),
            ..standard()
        };
        assert!(matches!(form.to_draft(admin()), Err(FormError::Label(_))));
    }

    #[test]
    fn triangular_only_for_its_bracket() {
        let form = MatchForm {
            category: "U16".into(),
            ..triangular()
        };
        assert!(matches!(
            form.to_draft(admin()),
            Err(FormError::TriangularNotAllowed(Category::U16))
        ));
        assert_eq!(triangular().to_draft(admin()).unwrap().teams.len(), 3);
    }

    #[test]
    fn legs_replace_typed_totals() {
        let form = MatchForm {
            leg1_home_score: "12".into(),
            leg1_away_score: "5".into(),
            leg1_home_tries: "2".into(),
            leg1_away_tries: "1".into(),
            leg2_home_score: "7".into(),
            leg2_away_score: "0".into(),
            leg2_home_tries: "1".into(),
            leg2_away_tries: "0".into(),
            leg3_home_score: "10".into(),
            leg3_away_score: "10".into(),
            leg3_home_tries: "2".into(),
            leg3_away_tries: "2".into(),
            ..triangular()
        };
        let draft = form.to_draft(admin()).unwrap();
        assert_eq!(draft.sub_matches.len(), 3);
        assert_eq!(draft.sub_matches[1].away, "Bears");
        assert_eq!(
            draft.teams,
            vec![
                TeamLine::new("Lions", 19, 3),
                TeamLine::new("Tigers", 15, 3),
                TeamLine::new("Bears", 10, 2),
            ]
        );
    }

    #[test]
    fn partially_filled_legs_are_rejected() {
        let form = MatchForm {
            leg1_home_score: "12".into(),
            ..triangular()
        };
        assert!(matches!(form.to_draft(admin()), Err(FormError::IncompleteLegs)));
    }

    #[test]
    fn from_result_round_trips_legs() {
        let form = MatchForm {
            leg1_home_score: "12".into(),
            leg1_away_score: "5".into(),
            leg1_home_tries: "2".into(),
            leg1_away_tries: "1".into(),
            leg2_home_score: "7".into(),
            leg2_away_score: "0".into(),
            leg2_home_tries: "1".into(),
            leg2_away_tries: "0".into(),
            leg3_home_score: "10".into(),
            leg3_away_score: "10".into(),
            leg3_home_tries: "2".into(),
            leg3_away_tries: "2".into(),
            ..triangular()
        };
        let draft = form.to_draft(admin()).unwrap();
        let result = MatchResult::from_draft(4, draft.clone(), chrono::Utc::now());
        let prefilled = MatchForm::from_result(&result);
        assert_eq!(prefilled.team3, "Bears");
        assert_eq!(prefilled.score1, "19");
        assert_eq!(prefilled.leg(2).home_score, "10");
        assert_eq!(prefilled.to_draft(admin()).unwrap(), draft);
    }

    #[test]
    fn oversized_leg_totals_are_rejected() {
        let form = MatchForm {
            leg1_home_score: u32::MAX.to_string(),
            leg1_away_score: "1".into(),
            leg1_home_tries: "0".into(),
            leg1_away_tries: "0".into(),
            leg2_home_score: "1".into(),
            leg2_away_score: "0".into(),
            leg2_home_tries: "0".into(),
            leg2_away_tries: "0".into(),
            leg3_home_score: "0".into(),
            leg3_away_score: "0".into(),
            leg3_home_tries: "0".into(),
            leg3_away_tries: "0".into(),
            ..triangular()
        };
        assert!(matches!(form.to_draft(admin()), Err(FormError::LegTotalsTooLarge)));
    }
}
