//! Input validation for result entry.
//!
//! The error messages are shown to users verbatim when a step re-prompts.

use chrono::NaiveDate;
use thiserror::Error;

/// Longest team name accepted, in characters.
pub const MAX_TEAM_NAME: usize = 64;

/// Date format used for entry and display.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date \"{0}\". Use the format DD/MM/YYYY, e.g. 14/03/2026.")]
    InvalidDate(String),
    #[error("\"{0}\" is not a whole number.")]
    NotANumber(String),
    #[error("The number cannot be negative.")]
    Negative,
    #[error("The team name cannot be empty.")]
    EmptyTeam,
    #[error("The team name is too long (max {MAX_TEAM_NAME} characters).")]
    TeamTooLong,
    #[error("{0} has already been selected for this match.")]
    DuplicateTeam(String),
}

/// Parses a `DD/MM/YYYY` date.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] for any other shape and for
/// dates that do not exist on the calendar.
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    // chrono accepts a trailing time or extra fields for some formats;
    // require exactly three slash-separated numeric parts.
    let parts: Vec<&str> = trimmed.split('/').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
        && parts[2].len() == 4;
    if !well_formed {
        return Err(ValidationError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Formats a date the way [`parse_date`] reads it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses a score or try count.
///
/// # Errors
///
/// Returns [`ValidationError::Negative`] for negative integers and
/// [`ValidationError::NotANumber`] for anything else that is not a whole
/// number fitting in `u32`.
pub fn parse_non_negative(input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    match trimmed.parse::<i64>() {
        Ok(n) if n < 0 => Err(ValidationError::Negative),
        Ok(n) => u32::try_from(n).map_err(|_| ValidationError::NotANumber(trimmed.to_string())),
        Err(_) => Err(ValidationError::NotANumber(trimmed.to_string())),
    }
}

/// Whether two team names refer to the same team: equal after trimming,
/// ignoring case (including non-ASCII letters).
pub fn same_team_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Validates a team name against the teams already chosen for a match.
///
/// Returns the trimmed name.
pub fn validate_team_name(name: &str, already_chosen: &[String]) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyTeam);
    }
    if name.chars().count() > MAX_TEAM_NAME {
        return Err(ValidationError::TeamTooLong);
    }
    if already_chosen.iter().any(|chosen| same_team_name(chosen, name)) {
        return Err(ValidationError::DuplicateTeam(name.to_string()));
    }
    Ok(name.to_string())
}
