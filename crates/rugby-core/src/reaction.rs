//! Reactions on published results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reaction button shown under every published summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    ThumbsUp,
    Fire,
    Clap,
    Trophy,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 4] = [
        ReactionKind::ThumbsUp,
        ReactionKind::Fire,
        ReactionKind::Clap,
        ReactionKind::Trophy,
    ];

    pub const fn emoji(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "👍",
            ReactionKind::Fire => "🔥",
            ReactionKind::Clap => "👏",
            ReactionKind::Trophy => "🏆",
        }
    }

    /// Stable key used in button callback data.
    pub const fn key(self) -> &'static str {
        match self {
            ReactionKind::ThumbsUp => "thumbs_up",
            ReactionKind::Fire => "fire",
            ReactionKind::Clap => "clap",
            ReactionKind::Trophy => "trophy",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }
}

/// Users who reacted to one channel message, per reaction kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionTally {
    reactors: BTreeMap<ReactionKind, Vec<i64>>,
}

impl ReactionTally {
    /// Adds `user` to `kind` if absent, removes it otherwise.
    ///
    /// Returns `true` when the reaction is set after the call.
    pub fn toggle(&mut self, kind: ReactionKind, user: i64) -> bool {
        let users = self.reactors.entry(kind).or_default();
        if let Some(pos) = users.iter().position(|&u| u == user) {
            users.remove(pos);
            false
        } else {
            users.push(user);
            true
        }
    }

    pub fn count(&self, kind: ReactionKind) -> usize {
        self.reactors.get(&kind).map_or(0, Vec::len)
    }

    pub fn has_reacted(&self, kind: ReactionKind, user: i64) -> bool {
        self.reactors
            .get(&kind)
            .is_some_and(|users| users.contains(&user))
    }

    pub fn total(&self) -> usize {
        self.reactors.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut tally = ReactionTally::default();
        assert!(tally.toggle(ReactionKind::Fire, 10));
        assert_eq!(tally.count(ReactionKind::Fire), 1);
        assert!(!tally.toggle(ReactionKind::Fire, 10));
        assert_eq!(tally.count(ReactionKind::Fire), 0);
    }

    #[test]
    fn kinds_are_independent() {
        let mut tally = ReactionTally::default();
        tally.toggle(ReactionKind::Fire, 10);
        tally.toggle(ReactionKind::Clap, 10);
        tally.toggle(ReactionKind::Clap, 11);
        assert_eq!(tally.count(ReactionKind::Fire), 1);
        assert_eq!(tally.count(ReactionKind::Clap), 2);
        assert_eq!(tally.count(ReactionKind::Trophy), 0);
        assert_eq!(tally.total(), 3);
        assert!(tally.has_reacted(ReactionKind::Clap, 11));
        assert!(!tally.has_reacted(ReactionKind::Fire, 11));
    }

    #[test]
    fn key_lookup() {
        for kind in ReactionKind::ALL {
            assert_eq!(ReactionKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ReactionKind::from_key("heart"), None);
    }

    #[test]
    fn serializes_as_kind_keyed_map() {
        let mut tally = ReactionTally::default();
        tally.toggle(ReactionKind::ThumbsUp, 5);
        let json = serde_json::to_string(&tally).unwrap();
        assert_eq!(json, r#"{"thumbs_up":[5]}"#);
    }
}
