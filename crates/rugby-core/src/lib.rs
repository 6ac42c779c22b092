//! Core types for rugby match results.
//!
//! This crate provides the types shared by the bot and the admin panel:
//! - [`Category`], [`Gender`] and [`MatchType`] for competition brackets
//! - [`MatchResult`] and [`MatchDraft`] for result records
//! - [`UserRecord`] and [`ReactionTally`] for users and channel reactions
//! - input validation, scoring plausibility checks and summary formatting
//! - [`RugbyConfig`] loading

mod category;
pub mod config;
mod reaction;
mod record;
pub mod scoring;
pub mod summary;
mod user;
pub mod validate;

pub use category::{Category, Gender, MatchType, UnknownLabel};
pub use config::{ConfigError, RugbyConfig};
pub use reaction::{ReactionKind, ReactionTally};
pub use record::{MatchDraft, MatchResult, SubMatch, Submitter, Team, TeamLine};
pub use user::{Role, UserRecord, UserStatus};
pub use validate::ValidationError;
