//! Match result repository.

use crate::collection::JsonCollection;
use crate::error::StoreError;
use rugby_core::{Category, Gender, MatchDraft, MatchResult};

pub(crate) type ResultsDoc = Vec<MatchResult>;

/// Filter options for listing results.
#[derive(Debug, Clone)]
pub struct ResultFilter {
    pub category: Option<Category>,
    pub gender: Option<Gender>,
    /// Case-insensitive substring of any team name.
    pub team: Option<String>,
    /// Maximum number of results to return.
    pub limit: usize,
    /// Number of results to skip.
    pub offset: usize,
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self {
            category: None,
            gender: None,
            team: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl ResultFilter {
    fn matches(&self, result: &MatchResult) -> bool {
        self.category.map_or(true, |c| result.category == c)
            && self.gender.map_or(true, |g| result.gender == g)
            && self
                .team
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .map_or(true, |t| result.involves(t.trim()))
    }
}

/// Repository for match results.
pub struct ResultRepo<'a> {
    docs: &'a JsonCollection<ResultsDoc>,
}

impl<'a> ResultRepo<'a> {
    pub(crate) fn new(docs: &'a JsonCollection<ResultsDoc>) -> Self {
        Self { docs }
    }

    /// Stores a new result and returns it with its assigned id.
    pub fn insert(&self, draft: MatchDraft) -> Result<MatchResult, StoreError> {
        self.docs.update(|results| {
            let id = results.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            let result = MatchResult::from_draft(id, draft, chrono::Utc::now());
            results.push(result.clone());
            tracing::info!(id, fixture = %result.fixture_name(), "result stored");
            Ok(result)
        })
    }

    pub fn get(&self, id: u64) -> Result<Option<MatchResult>, StoreError> {
        Ok(self.docs.read()?.into_iter().find(|r| r.id == id))
    }

    /// Lists results, most recent match date first.
    pub fn list(&self, filter: &ResultFilter) -> Result<Vec<MatchResult>, StoreError> {
        let mut results: Vec<MatchResult> = self
            .docs
            .read()?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        results.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(results
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect())
    }

    /// Every stored result, most recent match date first.
    pub fn all(&self) -> Result<Vec<MatchResult>, StoreError> {
        self.list(&ResultFilter {
            limit: usize::MAX,
            ..ResultFilter::default()
        })
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.docs.read()?.len())
    }

    /// Replaces the editable fields of result `id` with those of `draft`.
    ///
    /// The id, creation time and published message id are kept.
    pub fn replace(&self, id: u64, draft: MatchDraft) -> Result<MatchResult, StoreError> {
        self.docs.update(|results| {
            let slot = results
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("result {id}")))?;
            let mut updated = MatchResult::from_draft(id, draft, slot.created_at);
            updated.channel_message_id = slot.channel_message_id;
            *slot = updated.clone();
            Ok(updated)
        })
    }

    pub fn delete(&self, id: u64) -> Result<(), StoreError> {
        self.docs.update(|results| {
            let before = results.len();
            results.retain(|r| r.id != id);
            if results.len() == before {
                return Err(StoreError::NotFound(format!("result {id}")));
            }
            Ok(())
        })
    }

    /// Records where the summary of result `id` was published.
    pub fn set_channel_message(&self, id: u64, message_id: i64) -> Result<(), StoreError> {
        self.docs.update(|results| {
            let result = results
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("result {id}")))?;
            result.channel_message_id = Some(message_id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{draft, temp_store};
    use crate::{ResultFilter, StoreError};
    use rugby_core::{Category, Gender};

    #[test]
    fn insert_assigns_increasing_ids() {
        let (_dir, store) = temp_store();
        let a = store.results().insert(draft("Lions", "Tigers", 14)).unwrap();
        let b = store.results().insert(draft("Bears", "Wolves", 15)).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.results().count().unwrap(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_delete_of_older_result() {
        let (_dir, store) = temp_store();
        store.results().insert(draft("A", "B", 1)).unwrap();
        store.results().insert(draft("C", "D", 2)).unwrap();
        store.results().delete(1).unwrap();
        let c = store.results().insert(draft("E", "F", 3)).unwrap();
        assert_eq!(c.id, 3);
    }

    #[test]
    fn insert_keeps_every_collected_field() {
        let (_dir, store) = temp_store();
        let d = draft("Lions", "Tigers", 14);
        let stored = store.results().insert(d.clone()).unwrap();
        let fetched = store.results().get(stored.id).unwrap().unwrap();
        assert_eq!(fetched.category, d.category);
        assert_eq!(fetched.gender, d.gender);
        assert_eq!(fetched.teams, d.teams);
        assert_eq!(fetched.date, d.date);
        assert_eq!(fetched.referee, d.referee);
        assert_eq!(fetched.submitted_by, d.submitted_by);
    }

    #[test]
    fn list_orders_by_match_date_descending() {
        let (_dir, store) = temp_store();
        store.results().insert(draft("A", "B", 10)).unwrap();
        store.results().insert(draft("C", "D", 20)).unwrap();
        store.results().insert(draft("E", "F", 15)).unwrap();
        let ids: Vec<u64> = store
            .results()
            .list(&ResultFilter::default())
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn list_filters_and_paginates() {
        let (_dir, store) = temp_store();
        let mut other = draft("Lions", "Bears", 11);
        other.category = Category::Senior;
        other.gender = Gender::Female;
        store.results().insert(draft("Lions", "Tigers", 10)).unwrap();
        store.results().insert(other).unwrap();
        store.results().insert(draft("Wolves", "Tigers", 12)).unwrap();

        let seniors = store
            .results()
            .list(&ResultFilter {
                category: Some(Category::Senior),
                ..ResultFilter::default()
            })
            .unwrap();
        assert_eq!(seniors.len(), 1);

        let lions = store
            .results()
            .list(&ResultFilter {
                team: Some("lion".into()),
                ..ResultFilter::default()
            })
            .unwrap();
        assert_eq!(lions.len(), 2);

        let page = store
            .results()
            .list(&ResultFilter {
                limit: 1,
                offset: 1,
                ..ResultFilter::default()
            })
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, 2);
    }

    #[test]
    fn replace_keeps_identity_and_channel_message() {
        let (_dir, store) = temp_store();
        let original = store.results().insert(draft("A", "B", 10)).unwrap();
        store.results().set_channel_message(original.id, 555).unwrap();

        let updated = store
            .results()
            .replace(original.id, draft("A", "C", 11))
            .unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.channel_message_id, Some(555));
        assert_eq!(updated.teams[1].name, "C");
    }

    #[test]
    fn missing_ids_are_not_found() {
        let (_dir, store) = temp_store();
        assert!(store.results().get(9).unwrap().is_none());
        assert!(matches!(
            store.results().delete(9),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.results().replace(9, draft("A", "B", 1)),
            Err(StoreError::NotFound(_))
        ));
    }
}
