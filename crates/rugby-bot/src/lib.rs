//! Chat bot that walks club members through entering rugby match results
//! and publishes confirmed results to a broadcast channel.
//!
//! - [`telegram`]: Bot API client and wire types
//! - [`messenger`]: the outbound transport seam used by the dispatcher
//! - [`dialogue`]: the step-by-step result entry state machine
//! - [`keyboards`]: inline keyboards and callback data
//! - [`bot`]: update dispatch

pub mod bot;
pub mod dialogue;
pub mod keyboards;
pub mod messenger;
pub mod telegram;

pub use bot::{Bot, BotError, BotOptions, COMMANDS};
pub use messenger::Messenger;
pub use telegram::{ChatTarget, TelegramClient, TelegramError};
