//! The outbound side of the chat transport.

use async_trait::async_trait;

use crate::telegram::{ChatTarget, InlineKeyboard, TelegramError};

/// Sends and edits chat messages.
///
/// The dispatcher only talks to the transport through this trait.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends an HTML-formatted message and returns its message id.
    async fn send_message(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<i64, TelegramError>;

    async fn edit_message_text(
        &self,
        chat: &ChatTarget,
        message_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TelegramError>;

    async fn edit_message_keyboard(
        &self,
        chat: &ChatTarget,
        message_id: i64,
        keyboard: &InlineKeyboard,
    ) -> Result<(), TelegramError>;

    /// Acknowledges a button press, optionally with a toast.
    async fn answer_callback(&self, callback_id: &str, text: Option<&str>) -> Result<(), TelegramError>;
}
