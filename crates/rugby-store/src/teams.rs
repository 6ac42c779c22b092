//! Known team names.

use crate::collection::JsonCollection;
use crate::error::StoreError;
use rugby_core::validate::{same_team_name, validate_team_name};
use rugby_core::Team;

pub(crate) type TeamsDoc = Vec<Team>;

pub struct TeamRepo<'a> {
    docs: &'a JsonCollection<TeamsDoc>,
}

impl<'a> TeamRepo<'a> {
    pub(crate) fn new(docs: &'a JsonCollection<TeamsDoc>) -> Self {
        Self { docs }
    }

    /// All teams sorted by name, ignoring case.
    pub fn list(&self) -> Result<Vec<Team>, StoreError> {
        let mut teams = self.docs.read()?;
        teams.sort_by_key(|t| t.name.to_lowercase());
        Ok(teams)
    }

    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.list()?.into_iter().map(|t| t.name).collect())
    }

    /// Adds a team.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] if a team with the same name
    /// (ignoring case) exists, or [`StoreError::Invalid`] for an empty or
    /// overlong name.
    pub fn add(&self, name: &str) -> Result<Team, StoreError> {
        self.docs.update(|teams| {
            let name = validate_team_name(name, &[])?;
            if teams.iter().any(|t| same_team_name(&t.name, &name)) {
                return Err(StoreError::Duplicate(format!("team {name}")));
            }
            let team = Team {
                name,
                created_at: chrono::Utc::now(),
            };
            teams.push(team.clone());
            Ok(team)
        })
    }

    /// Adds every name not yet known. Returns how many were added.
    pub fn ensure<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Result<usize, StoreError> {
        let names: Vec<&str> = names.into_iter().collect();
        self.docs.update(|teams| {
            let mut added = 0;
            for name in names {
                let name = name.trim();
                if name.is_empty() || teams.iter().any(|t| same_team_name(&t.name, name)) {
                    continue;
                }
                teams.push(Team {
                    name: name.to_string(),
                    created_at: chrono::Utc::now(),
                });
                added += 1;
            }
            Ok(added)
        })
    }

    pub fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.docs.update(|teams| {
            let before = teams.len();
            teams.retain(|t| !same_team_name(&t.name, name));
            if teams.len() == before {
                return Err(StoreError::NotFound(format!("team {name}")));
            }
            Ok(())
        })
    }
}
