//! Competition brackets: age category, gender and fixture format.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a label does not name a known bracket value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownLabel {
    kind: &'static str,
    value: String,
}

impl UnknownLabel {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Age category of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    U6,
    U8,
    U10,
    U12,
    U14,
    U16,
    U18,
    Senior,
}

impl Category {
    /// All categories, youngest first.
    pub const ALL: [Category; 8] = [
        Category::U6,
        Category::U8,
        Category::U10,
        Category::U12,
        Category::U14,
        Category::U16,
        Category::U18,
        Category::Senior,
    ];

    /// Display label, also accepted by [`FromStr`].
    pub const fn label(self) -> &'static str {
        match self {
            Category::U6 => "U6",
            Category::U8 => "U8",
            Category::U10 => "U10",
            Category::U12 => "U12",
            Category::U14 => "U14",
            Category::U16 => "U16",
            Category::U18 => "U18",
            Category::Senior => "Senior",
        }
    }

    /// Whether fixtures in this bracket may be played as a triangular.
    ///
    /// Only U14 runs three-team rounds; every other bracket goes straight
    /// from gender to team selection.
    pub const fn allows_triangular(self) -> bool {
        matches!(self, Category::U14)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabel::new("category", s))
    }
}

/// Gender bracket of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Mixed,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Mixed];

    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Gender::ALL
            .into_iter()
            .find(|g| g.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabel::new("gender", s))
    }
}

/// Fixture format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchType {
    /// Two teams, one game.
    #[default]
    Standard,
    /// Three teams, round robin.
    Triangular,
}

impl MatchType {
    pub const ALL: [MatchType; 2] = [MatchType::Standard, MatchType::Triangular];

    pub const fn label(self) -> &'static str {
        match self {
            MatchType::Standard => "Standard",
            MatchType::Triangular => "Triangular",
        }
    }

    /// Number of teams taking part.
    pub const fn team_count(self) -> usize {
        match self {
            MatchType::Standard => 2,
            MatchType::Triangular => 3,
        }
    }
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MatchType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MatchType::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabel::new("match type", s))
    }
}
