//! Match-entry conversation.
//!
//! A [`Dialogue`] walks one user through every field of a result:
//! category, gender, match type (triangular bracket only), teams, date,
//! scores, tries, referee and a final confirmation. Each step validates its
//! own input and asks again on failure. Nothing here does I/O; the bot feeds
//! inputs in and acts on the returned [`Outcome`].

use chrono::{NaiveDate, Utc};
use rugby_core::summary::{escape_html, format_summary};
use rugby_core::validate::{parse_date, parse_non_negative, validate_team_name};
use rugby_core::{scoring, Category, Gender, MatchDraft, MatchResult, MatchType, Submitter, TeamLine};
use std::str::FromStr;

use crate::keyboards::{self, CANCEL, CONFIRM, NO_REFEREE, TEAM, TODAY};
use crate::telegram::InlineKeyboard;

const MAX_REFEREE_NAME: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Category,
    Gender,
    MatchType,
    /// Zero-based team slot.
    Team(usize),
    Date,
    Score(usize),
    Tries(usize),
    Referee,
    Confirm,
}

/// What the user sent: typed text or the payload of a dialogue button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input<'a> {
    Text(&'a str),
    Button(&'a str),
}

/// A question for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub keyboard: InlineKeyboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The input was accepted; ask the next question.
    Ask(Prompt),
    /// The input was rejected; ask the same question again.
    Retry { error: String, prompt: Prompt },
    /// The user confirmed. The draft holds every collected field.
    Done(MatchDraft),
    Cancelled,
}

/// State of one user's result entry.
#[derive(Debug, Clone)]
pub struct Dialogue {
    step: Step,
    submitter: Submitter,
    known_teams: Vec<String>,
    today: NaiveDate,
    category: Option<Category>,
    gender: Option<Gender>,
    match_type: MatchType,
    teams: Vec<String>,
    date: Option<NaiveDate>,
    scores: Vec<u32>,
    tries: Vec<u32>,
    referee: Option<String>,
}

impl Dialogue {
    /// Starts a dialogue and returns the first prompt.
    ///
    /// `known_teams` backs the team buttons; `today` backs the Today button.
    pub fn start(submitter: Submitter, known_teams: Vec<String>, today: NaiveDate) -> (Self, Prompt) {
        let dialogue = Self {
            step: Step::Category,
            submitter,
            known_teams,
            today,
            category: None,
            gender: None,
            match_type: MatchType::Standard,
            teams: Vec::new(),
            date: None,
            scores: Vec::new(),
            tries: Vec::new(),
            referee: None,
        };
        let prompt = dialogue.prompt();
        (dialogue, prompt)
    }

    pub fn step(&self) -> Step {
        self.step
    }

    /// Feeds one input to the current step.
    pub fn handle(&mut self, input: Input<'_>) -> Outcome {
        let cancel = match input {
            Input::Button(payload) => payload == CANCEL,
            Input::Text(text) => text.trim().eq_ignore_ascii_case("/cancel"),
        };
        if cancel {
            return Outcome::Cancelled;
        }

        match self.apply(input) {
            Ok(false) => Outcome::Ask(self.prompt()),
            Ok(true) => match self.draft() {
                Some(draft) => Outcome::Done(draft),
                // Unreachable through `apply`, which only finishes from Confirm.
                None => Outcome::Retry {
                    error: "Some fields are missing.".to_string(),
                    prompt: self.prompt(),
                },
            },
            Err(error) => Outcome::Retry {
                error,
                prompt: self.prompt(),
            },
        }
    }

    /// The question for the current step.
    pub fn prompt(&self) -> Prompt {
        match self.step {
            Step::Category => Prompt {
                text: "🏉 <b>New match</b>\n\nSelect the <b>category</b>:".to_string(),
                keyboard: keyboards::categories(),
            },
            Step::Gender => Prompt {
                text: format!(
                    "Category: {}\nSelect the <b>gender</b>:",
                    self.category.map(|c| c.label()).unwrap_or("?")
                ),
                keyboard: keyboards::genders(),
            },
            Step::MatchType => Prompt {
                text: "Select the <b>match type</b>:".to_string(),
                keyboard: keyboards::match_types(),
            },
            Step::Team(i) => Prompt {
                text: format!("<b>Team {}</b>: pick a team or type its name:", i + 1),
                keyboard: keyboards::teams(&self.known_teams, &self.teams[..i.min(self.teams.len())]),
            },
            Step::Date => Prompt {
                text: "Match <b>date</b> (DD/MM/YYYY):".to_string(),
                keyboard: keyboards::date(),
            },
            Step::Score(i) => Prompt {
                text: format!("Points scored by <b>{}</b>:", self.team_label(i)),
                keyboard: keyboards::cancel_only(),
            },
            Step::Tries(i) => Prompt {
                text: format!("Tries scored by <b>{}</b>:", self.team_label(i)),
                keyboard: keyboards::cancel_only(),
            },
            Step::Referee => Prompt {
                text: "<b>Referee</b> name (or press No referee):".to_string(),
                keyboard: keyboards::referee(),
            },
            Step::Confirm => Prompt {
                text: self.confirmation_text(),
                keyboard: keyboards::confirm(),
            },
        }
    }

    fn team_label(&self, i: usize) -> String {
        self.teams
            .get(i)
            .map(|t| escape_html(t))
            .unwrap_or_else(|| format!("team {}", i + 1))
    }

    fn team_count(&self) -> usize {
        self.match_type.team_count()
    }

    /// Applies input to the current step. Returns `Ok(true)` on confirmation.
    fn apply(&mut self, input: Input<'_>) -> Result<bool, String> {
        match self.step {
            Step::Category => {
                self.category = Some(choice(input)?);
                self.step = Step::Gender;
            }
            Step::Gender => {
                self.gender = Some(choice(input)?);
                if self.category.is_some_and(Category::allows_triangular) {
                    self.step = Step::MatchType;
                } else {
                    self.match_type = MatchType::Standard;
                    self.step = Step::Team(0);
                }
            }
            Step::MatchType => {
                self.match_type = choice(input)?;
                self.step = Step::Team(0);
            }
            Step::Team(i) => {
                let raw = self.team_input(input)?;
                self.teams.truncate(i);
                let name = validate_team_name(&raw, &self.teams).map_err(|e| e.to_string())?;
                self.teams.push(name);
                self.step = if i + 1 < self.team_count() {
                    Step::Team(i + 1)
                } else {
                    Step::Date
                };
            }
            Step::Date => {
                self.date = Some(match input {
                    Input::Button(TODAY) => self.today,
                    Input::Text(text) => parse_date(text).map_err(|e| e.to_string())?,
                    Input::Button(_) => return Err("Type the date as DD/MM/YYYY.".to_string()),
                });
                self.step = Step::Score(0);
            }
            Step::Score(i) => {
                let points = number(input)?;
                self.scores.truncate(i);
                self.scores.push(points);
                self.step = if i + 1 < self.team_count() {
                    Step::Score(i + 1)
                } else {
                    Step::Tries(0)
                };
            }
            Step::Tries(i) => {
                let tries = number(input)?;
                self.tries.truncate(i);
                self.tries.push(tries);
                self.step = if i + 1 < self.team_count() {
                    Step::Tries(i + 1)
                } else {
                    Step::Referee
                };
            }
            Step::Referee => {
                self.referee = match input {
                    Input::Button(NO_REFEREE) => None,
                    Input::Button(_) => return Err("Type the referee's name.".to_string()),
                    Input::Text(text) => {
                        let name = text.trim();
                        if name == "-" {
                            None
                        } else if name.is_empty() {
                            return Err("The referee name cannot be empty.".to_string());
                        } else if name.chars().count() > MAX_REFEREE_NAME {
                            return Err(format!(
                                "The referee name is too long (max {MAX_REFEREE_NAME} characters)."
                            ));
                        } else {
                            Some(name.to_string())
                        }
                    }
                };
                self.step = Step::Confirm;
            }
            Step::Confirm => {
                let confirmed = match input {
                    Input::Button(payload) => payload == CONFIRM,
                    Input::Text(text) => {
                        matches!(text.trim().to_lowercase().as_str(), "confirm" | "yes")
                    }
                };
                if !confirmed {
                    return Err("Press Confirm to save the result or Cancel to discard it.".to_string());
                }
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn team_input(&self, input: Input<'_>) -> Result<String, String> {
        match input {
            Input::Text(text) => Ok(text.to_string()),
            Input::Button(payload) => payload
                .strip_prefix(TEAM)
                .and_then(|rest| rest.strip_prefix(':'))
                .and_then(|idx| idx.parse::<usize>().ok())
                .and_then(|idx| self.known_teams.get(idx))
                .cloned()
                .ok_or_else(|| "Pick a team from the list or type its name.".to_string()),
        }
    }

    /// Every collected field, once all steps are answered.
    pub fn draft(&self) -> Option<MatchDraft> {
        let n = self.team_count();
        if self.teams.len() != n || self.scores.len() != n || self.tries.len() != n {
            return None;
        }
        let teams = self
            .teams
            .iter()
            .zip(&self.scores)
            .zip(&self.tries)
            .map(|((name, &score), &tries)| TeamLine::new(name.clone(), score, tries))
            .collect();
        Some(MatchDraft {
            category: self.category?,
            gender: self.gender?,
            match_type: self.match_type,
            teams,
            date: self.date?,
            referee: self.referee.clone(),
            submitted_by: self.submitter.clone(),
            sub_matches: Vec::new(),
        })
    }

    fn confirmation_text(&self) -> String {
        let Some(draft) = self.draft() else {
            return "Some fields are missing.".to_string();
        };
        let warnings = scoring::check(&draft.teams);
        let preview = MatchResult::from_draft(0, draft, Utc::now());
        let mut text = format!("<b>Please check the result:</b>\n\n{}", format_summary(&preview));
        if !warnings.is_empty() {
            text.push_str("\n\n⚠️ <b>Check these scores:</b>");
            for warning in &warnings {
                text.push_str("\n• ");
                text.push_str(&escape_html(&warning.to_string()));
            }
            text.push_str("\nYou can still confirm if they are correct.");
        }
        text
    }
}

fn choice<T: FromStr>(input: Input<'_>) -> Result<T, String> {
    let raw = match input {
        Input::Text(text) | Input::Button(text) => text,
    };
    raw.parse()
        .map_err(|_| "Please choose one of the buttons.".to_string())
}

fn number(input: Input<'_>) -> Result<u32, String> {
    match input {
        Input::Text(text) => parse_non_negative(text).map_err(|e| e.to_string()),
        Input::Button(_) => Err("Type a whole number.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn start() -> Dialogue {
        let submitter = Submitter {
            user_id: 9,
            name: "Lee".to_string(),
        };
        let known = vec!["Bears".to_string(), "Lions".to_string(), "Tigers".to_string()];
        Dialogue::start(submitter, known, today()).0
    }

    fn feed(d: &mut Dialogue, inputs: &[Input<'_>]) -> Outcome {
        let mut last = Outcome::Cancelled;
        for input in inputs {
            last = d.handle(*input);
            assert!(
                !matches!(last, Outcome::Retry { .. }),
                "input {input:?} rejected: {last:?}"
            );
        }
        last
    }

    use Input::{Button, Text};

    #[test]
    fn standard_flow_collects_every_field_unchanged() {
        let mut d = start();
        let out = feed(
            &mut d,
            &[
                Button("U16"),
                Button("Female"),
                Text("Lions"),
                Text("Wolves"),
                Text("14/03/2026"),
                Text("24"),
                Text("17"),
                Text("4"),
                Text("3"),
                Text("Pat Doe"),
                Button(CONFIRM),
            ],
        );
        let Outcome::Done(draft) = out else {
            panic!("expected Done, got {out:?}");
        };
        assert_eq!(draft.category, Category::U16);
        assert_eq!(draft.gender, Gender::Female);
        assert_eq!(draft.match_type, MatchType::Standard);
        assert_eq!(
            draft.teams,
            vec![TeamLine::new("Lions", 24, 4), TeamLine::new("Wolves", 17, 3)]
        );
        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        assert_eq!(draft.referee.as_deref(), Some("Pat Doe"));
        assert_eq!(draft.submitted_by.user_id, 9);
    }

    #[test]
    fn non_triangular_bracket_skips_match_type() {
        let mut d = start();
        feed(&mut d, &[Button("U10"), Button("Mixed")]);
        assert_eq!(d.step(), Step::Team(0));
    }

    #[test]
    fn triangular_flow_asks_for_three_teams() {
        let mut d = start();
        feed(
            &mut d,
            &[
                Button("U14"),
                Button("Male"),
                Button("Triangular"),
                Button("team:0"),
                Button("team:1"),
                Text("Sharks"),
            ],
        );
        assert_eq!(d.step(), Step::Date);
        let out = feed(
            &mut d,
            &[
                Button(TODAY),
                Text("10"),
                Text("5"),
                Text("0"),
                Text("2"),
                Text("1"),
                Text("0"),
                Button(NO_REFEREE),
                Text("yes"),
            ],
        );
        let Outcome::Done(draft) = out else {
            panic!("expected Done, got {out:?}");
        };
        assert_eq!(draft.match_type, MatchType::Triangular);
        assert_eq!(draft.teams.len(), 3);
        assert_eq!(draft.teams[0], TeamLine::new("Bears", 10, 2));
        assert_eq!(draft.teams[2], TeamLine::new("Sharks", 0, 0));
        assert_eq!(draft.date, today());
        assert_eq!(draft.referee, None);
    }

    #[test]
    fn u14_standard_still_has_two_teams() {
        let mut d = start();
        feed(
            &mut d,
            &[Button("U14"), Button("Male"), Button("Standard"), Text("A"), Text("B")],
        );
        assert_eq!(d.step(), Step::Date);
    }

    #[test]
    fn invalid_date_reprompts_same_step() {
        let mut d = start();
        feed(&mut d, &[Button("U8"), Button("Male"), Text("A"), Text("B")]);
        let out = d.handle(Text("2026-03-14"));
        match out {
            Outcome::Retry { error, prompt } => {
                assert!(error.contains("DD/MM/YYYY"));
                assert!(prompt.text.contains("date"));
            }
            other => panic!("expected Retry, got {other:?}"),
        }
        assert_eq!(d.step(), Step::Date);
    }

    #[test]
    fn negative_and_text_scores_are_rejected() {
        let mut d = start();
        feed(
            &mut d,
            &[Button("U8"), Button("Male"), Text("A"), Text("B"), Text("01/02/2026")],
        );
        assert!(matches!(d.handle(Text("-5")), Outcome::Retry { .. }));
        assert!(matches!(d.handle(Text("ten")), Outcome::Retry { .. }));
        assert!(matches!(d.handle(Button("team:0")), Outcome::Retry { .. }));
        assert_eq!(d.step(), Step::Score(0));
        assert!(matches!(d.handle(Text("10")), Outcome::Ask(_)));
        assert_eq!(d.step(), Step::Score(1));
    }

    #[test]
    fn duplicate_team_is_rejected() {
        let mut d = start();
        feed(&mut d, &[Button("U8"), Button("Male"), Button("team:1")]);
        let out = d.handle(Text("lions"));
        match out {
            Outcome::Retry { error, .. } => assert!(error.contains("already been selected")),
            other => panic!("expected Retry, got {other:?}"),
        }
        assert_eq!(d.step(), Step::Team(1));
    }

    #[test]
    fn second_team_keyboard_hides_first_pick() {
        let mut d = start();
        let out = feed(&mut d, &[Button("U8"), Button("Male"), Button("team:1")]);
        let Outcome::Ask(prompt) = out else {
            panic!("expected Ask");
        };
        assert!(prompt.keyboard.buttons().all(|b| b.text != "Lions"));
    }

    #[test]
    fn unknown_team_button_is_rejected() {
        let mut d = start();
        feed(&mut d, &[Button("U8"), Button("Male")]);
        assert!(matches!(d.handle(Button("team:99")), Outcome::Retry { .. }));
    }

    #[test]
    fn bad_category_choice_reprompts() {
        let mut d = start();
        assert!(matches!(d.handle(Text("U13")), Outcome::Retry { .. }));
        assert_eq!(d.step(), Step::Category);
        assert!(matches!(d.handle(Text("senior")), Outcome::Ask(_)));
    }

    #[test]
    fn cancel_works_from_any_step() {
        let mut d = start();
        assert_eq!(d.handle(Button(CANCEL)), Outcome::Cancelled);

        let mut d = start();
        feed(&mut d, &[Button("U8"), Button("Male"), Text("A")]);
        assert_eq!(d.handle(Text("/cancel")), Outcome::Cancelled);
    }

    #[test]
    fn referee_dash_means_none_and_empty_is_rejected() {
        let mut d = start();
        feed(
            &mut d,
            &[
                Button("U8"),
                Button("Male"),
                Text("A"),
                Text("B"),
                Text("01/02/2026"),
                Text("5"),
                Text("0"),
                Text("1"),
                Text("0"),
            ],
        );
        assert_eq!(d.step(), Step::Referee);
        assert!(matches!(d.handle(Text("   ")), Outcome::Retry { .. }));
        assert!(matches!(d.handle(Text("-")), Outcome::Ask(_)));
        assert_eq!(d.step(), Step::Confirm);
        assert_eq!(d.draft().unwrap().referee, None);
    }

    #[test]
    fn implausible_scores_warn_but_still_confirm() {
        let mut d = start();
        let out = feed(
            &mut d,
            &[
                Button("U18"),
                Button("Male"),
                Text("A"),
                Text("B"),
                Text("01/02/2026"),
                Text("7"),
                Text("3"),
                Text("0"),
                Text("0"),
                Text("Ref"),
            ],
        );
        let Outcome::Ask(prompt) = out else {
            panic!("expected confirmation prompt");
        };
        assert!(prompt.text.contains("Check these scores"));
        assert!(prompt.text.contains("A: 7 points"));
        assert!(!prompt.text.contains("B: 3"));
        assert!(matches!(d.handle(Button(CONFIRM)), Outcome::Done(_)));
    }

    #[test]
    fn confirm_step_rejects_other_input() {
        let mut d = start();
        feed(
            &mut d,
            &[
                Button("U8"),
                Button("Male"),
                Text("A"),
                Text("B"),
                Text("01/02/2026"),
                Text("5"),
                Text("0"),
                Text("1"),
                Text("0"),
                Text("-"),
            ],
        );
        assert!(matches!(d.handle(Text("maybe")), Outcome::Retry { .. }));
        assert_eq!(d.step(), Step::Confirm);
    }

    #[test]
    fn escapes_team_names_in_prompts() {
        let mut d = start();
        let out = feed(
            &mut d,
            &[Button("U8"), Button("Male"), Text("<A>"), Text("B"), Text("01/02/2026")],
        );
        let Outcome::Ask(prompt) = out else {
            panic!("expected Ask");
        };
        assert!(prompt.text.contains("&lt;A&gt;"));
    }
}
