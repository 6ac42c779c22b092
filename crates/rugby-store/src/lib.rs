//! File-backed storage for the rugby results bot and admin panel.
//!
//! Each entity collection lives in one JSON document under the data
//! directory:
//!
//! - `results.json`: match results
//! - `users.json`: bot users and their approval state
//! - `reactions.json`: reaction tallies keyed by channel message id
//! - `teams.json`: team names offered by the pickers
//!
//! # Example
//!
//! ```ignore
//! let store = Store::open("data", Duration::from_secs(5));
//! let stored = store.results().insert(draft)?;
//! store.teams().ensure(stored.teams.iter().map(|t| t.name.as_str()))?;
//! ```

mod cache;
mod collection;
mod error;
mod reactions;
mod results;
mod teams;
mod users;

pub use collection::JsonCollection;
pub use error::StoreError;
pub use reactions::ReactionRepo;
pub use results::{ResultFilter, ResultRepo};
pub use teams::TeamRepo;
pub use users::UserRepo;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

struct Collections {
    results: JsonCollection<results::ResultsDoc>,
    users: JsonCollection<users::UsersDoc>,
    reactions: JsonCollection<reactions::ReactionsDoc>,
    teams: JsonCollection<teams::TeamsDoc>,
}

/// Handle to all collections. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    dir: PathBuf,
    inner: Arc<Collections>,
}

impl Store {
    /// Opens the collections under `dir`. Files are created on first write.
    pub fn open(dir: impl AsRef<Path>, ttl: Duration) -> Self {
        let dir = dir.as_ref().to_path_buf();
        let inner = Collections {
            results: JsonCollection::new(dir.join("results.json"), ttl),
            users: JsonCollection::new(dir.join("users.json"), ttl),
            reactions: JsonCollection::new(dir.join("reactions.json"), ttl),
            teams: JsonCollection::new(dir.join("teams.json"), ttl),
        };
        Self {
            dir,
            inner: Arc::new(inner),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn results(&self) -> ResultRepo<'_> {
        ResultRepo::new(&self.inner.results)
    }

    pub fn users(&self) -> UserRepo<'_> {
        UserRepo::new(&self.inner.users)
    }

    pub fn reactions(&self) -> ReactionRepo<'_> {
        ReactionRepo::new(&self.inner.reactions)
    }

    pub fn teams(&self) -> TeamRepo<'_> {
        TeamRepo::new(&self.inner.teams)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Store;
    use chrono::NaiveDate;
    use rugby_core::{Category, Gender, MatchDraft, MatchType, Submitter, TeamLine};
    use std::time::Duration;

    pub fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path(), Duration::from_secs(5));
        (dir, store)
    }

    /// A standard U12 male fixture played on March `day`, 2026.
    pub fn draft(home: &str, away: &str, day: u32) -> MatchDraft {
        MatchDraft {
            category: Category::U12,
            gender: Gender::Male,
            match_type: MatchType::Standard,
            teams: vec![TeamLine::new(home, 12, 2), TeamLine::new(away, 7, 1)],
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            referee: Some("Ref".to_string()),
            submitted_by: Submitter {
                user_id: 1,
                name: "Tester".to_string(),
            },
            sub_matches: vec![],
        }
    }
}
