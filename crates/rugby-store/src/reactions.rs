//! Reaction tallies for published channel messages.

use crate::collection::JsonCollection;
use crate::error::StoreError;
use rugby_core::{ReactionKind, ReactionTally};
use std::collections::BTreeMap;

/// Tallies keyed by channel message id.
pub(crate) type ReactionsDoc = BTreeMap<String, ReactionTally>;

pub struct ReactionRepo<'a> {
    docs: &'a JsonCollection<ReactionsDoc>,
}

impl<'a> ReactionRepo<'a> {
    pub(crate) fn new(docs: &'a JsonCollection<ReactionsDoc>) -> Self {
        Self { docs }
    }

    /// Creates an empty tally for a freshly published message.
    pub fn init(&self, message_id: i64) -> Result<(), StoreError> {
        self.docs.update(|tallies| {
            tallies.entry(message_id.to_string()).or_default();
            Ok(())
        })
    }

    /// Toggles `user`'s `kind` reaction on a message and returns the new tally.
    ///
    /// Messages without a tally get one on first reaction.
    pub fn toggle(
        &self,
        message_id: i64,
        kind: ReactionKind,
        user: i64,
    ) -> Result<ReactionTally, StoreError> {
        self.docs.update(|tallies| {
            let tally = tallies.entry(message_id.to_string()).or_default();
            let set = tally.toggle(kind, user);
            tracing::debug!(message_id, user, kind = kind.key(), set, "reaction toggled");
            Ok(tally.clone())
        })
    }

    pub fn get(&self, message_id: i64) -> Result<ReactionTally, StoreError> {
        Ok(self
            .docs
            .read()?
            .remove(&message_id.to_string())
            .unwrap_or_default())
    }
}
