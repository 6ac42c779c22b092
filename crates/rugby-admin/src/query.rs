//! Result list query parameters shared by pages, exports and the JSON API.

use rugby_core::{Category, Gender};
use rugby_store::ResultFilter;
use serde::{Deserialize, Serialize};

/// Filters as they appear in the query string.
///
/// Unknown category or gender labels are ignored rather than rejected, so a
/// stale bookmark still shows results.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResultQuery {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub gender: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ResultQuery {
    /// The store filter, with `default_limit` when none was given.
    pub fn filter(&self, default_limit: usize) -> ResultFilter {
        ResultFilter {
            category: self.category.parse::<Category>().ok(),
            gender: self.gender.parse::<Gender>().ok(),
            team: Some(self.team.trim().to_string()).filter(|t| !t.is_empty()),
            limit: self.limit.unwrap_or(default_limit),
            offset: self.offset.unwrap_or(0),
        }
    }

    /// The filters only, without paging, as `?a=b&...` (empty when unset).
    pub fn filters_query(&self) -> String {
        Self {
            offset: None,
            limit: None,
            ..self.clone()
        }
        .to_query()
    }

    /// This query moved to `offset`.
    pub fn at_offset(&self, offset: usize) -> String {
        Self {
            offset: Some(offset).filter(|&o| o > 0),
            ..self.clone()
        }
        .to_query()
    }

    fn to_query(&self) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("?{query}"),
            _ => String::new(),
        }
    }

    /// Short description used in export file names, e.g. `U14_Male`.
    pub fn label(&self) -> String {
        let filter = self.filter(0);
        let parts: Vec<&str> = [
            filter.category.map(Category::label),
            filter.gender.map(Gender::label),
            filter.team.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            "all".to_string()
        } else {
            parts.join("_")
        }
    }
}
