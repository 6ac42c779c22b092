//! Rugby union scoring checks and triangular aggregation.
//!
//! The plausibility check is guidance for the person entering a result.
//! A flagged line can still be saved.

use crate::record::{SubMatch, TeamLine};

pub const TRY_POINTS: u32 = 5;
pub const CONVERSION_POINTS: u32 = 2;
/// Penalty goal or drop goal.
pub const KICK_POINTS: u32 = 3;

/// Whether `score` can be reached with exactly `tries` tries.
///
/// Each try may or may not be converted; any remainder must come from
/// three-point kicks. A penalty try counts as a converted try.
pub fn is_plausible(score: u32, tries: u32) -> bool {
    let Some(base) = tries.checked_mul(TRY_POINTS) else {
        return false;
    };
    if base > score {
        return false;
    }
    let rest = score - base;
    (0..=tries)
        .map_while(|c| rest.checked_sub(c * CONVERSION_POINTS))
        .any(|kicks| kicks % KICK_POINTS == 0)
}

/// A team line whose score cannot be made from its tries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlausibilityWarning {
    pub team: String,
    pub score: u32,
    pub tries: u32,
}

impl std::fmt::Display for PlausibilityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.tries == 0 {
            write!(
                f,
                "{}: {} points without tries must come from 3-point kicks",
                self.team, self.score
            )
        } else {
            write!(
                f,
                "{}: {} points is not reachable with {} tries",
                self.team, self.score, self.tries
            )
        }
    }
}

/// Returns a warning for every implausible line.
pub fn check(teams: &[TeamLine]) -> Vec<PlausibilityWarning> {
    teams
        .iter()
        .filter(|t| !is_plausible(t.score, t.tries))
        .map(|t| PlausibilityWarning {
            team: t.name.clone(),
            score: t.score,
            tries: t.tries,
        })
        .collect()
}

/// Folds triangular legs into one total line per team.
///
/// Teams appear in the order they are first seen across the legs. Returns
/// `None` if a total does not fit in `u32`.
pub fn fold_sub_matches(legs: &[SubMatch]) -> Option<Vec<TeamLine>> {
    let mut totals: Vec<TeamLine> = Vec::new();
    let mut add = |name: &str, score: u32, tries: u32| -> Option<()> {
        match totals.iter_mut().find(|t| t.name == name) {
            Some(line) => {
                line.score = line.score.checked_add(score)?;
                line.tries = line.tries.checked_add(tries)?;
            }
            None => totals.push(TeamLine::new(name, score, tries)),
        }
        Some(())
    };
    for leg in legs {
        add(&leg.home, leg.home_score, leg.home_tries)?;
        add(&leg.away, leg.away_score, leg.away_tries)?;
    }
    Some(totals)
}
