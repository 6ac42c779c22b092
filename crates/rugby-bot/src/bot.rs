//! Update dispatch: commands, button callbacks and result publishing.

use std::collections::HashMap;

use rugby_core::summary::{format_list_line, format_summary};
use rugby_core::{MatchDraft, MatchResult, ReactionKind, ReactionTally, Submitter, UserRecord, UserStatus};
use rugby_store::{ResultFilter, Store, StoreError};
use thiserror::Error;
use tokio::sync::Mutex;

use crate::dialogue::{Dialogue, Input, Outcome, Prompt};
use crate::keyboards;
use crate::messenger::Messenger;
use crate::telegram::{
    BotCommand, CallbackQuery, ChatTarget, InlineKeyboard, Message, TelegramError, Update, User,
};

#[derive(Error, Debug)]
pub enum BotError {
    #[error(transparent)]
    Telegram(#[from] TelegramError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Commands registered with the chat client's command menu.
pub const COMMANDS: &[BotCommand] = &[
    BotCommand {
        command: "start",
        description: "Register with the bot",
    },
    BotCommand {
        command: "menu",
        description: "Show the main menu",
    },
    BotCommand {
        command: "new",
        description: "Enter a new match result",
    },
    BotCommand {
        command: "results",
        description: "List the latest results",
    },
    BotCommand {
        command: "cancel",
        description: "Cancel the current entry",
    },
    BotCommand {
        command: "pending",
        description: "Users waiting for approval (admins)",
    },
    BotCommand {
        command: "help",
        description: "How to use the bot",
    },
];

const HELP: &str = "🏉 <b>Rugby results bot</b>\n\n\
/new - enter a match result step by step\n\
/results - latest results\n\
/menu - main menu\n\
/cancel - discard the entry in progress\n\n\
Dates use DD/MM/YYYY. Scores and tries are whole numbers.";

/// Static options for the dispatcher.
#[derive(Debug, Clone)]
pub struct BotOptions {
    /// Where confirmed results are published. `None` disables publishing.
    pub channel: Option<ChatTarget>,
    /// Users registered as approved admins on `/start`.
    pub admin_ids: Vec<i64>,
    /// Number of results shown by `/results`.
    pub results_page: usize,
}

/// Handles updates for one bot.
pub struct Bot<M> {
    messenger: M,
    store: Store,
    options: BotOptions,
    /// Result entries in progress, keyed by user id.
    sessions: Mutex<HashMap<i64, Dialogue>>,
}

impl<M: Messenger> Bot<M> {
    pub fn new(messenger: M, store: Store, options: BotOptions) -> Self {
        Self {
            messenger,
            store,
            options,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    /// Dispatches one update.
    pub async fn handle_update(&self, update: Update) -> Result<(), BotError> {
        if let Some(message) = update.message {
            self.handle_message(message).await
        } else if let Some(callback) = update.callback_query {
            self.handle_callback(callback).await
        } else {
            Ok(())
        }
    }

    async fn handle_message(&self, message: Message) -> Result<(), BotError> {
        let (Some(from), Some(text)) = (message.from.as_ref(), message.text.as_deref()) else {
            return Ok(());
        };
        let chat = ChatTarget::Id(message.chat.id);

        if let Some(command) = parse_command(text) {
            tracing::debug!(user_id = from.id, command, "command received");
            return self.handle_command(&chat, from, command).await;
        }

        if self.sessions.lock().await.contains_key(&from.id) {
            return self.continue_dialogue(&chat, from.id, Input::Text(text)).await;
        }

        self.reply(&chat, "Use /new to enter a result or /menu for options.", None)
            .await
    }

    async fn handle_command(&self, chat: &ChatTarget, from: &User, command: &str) -> Result<(), BotError> {
        match command {
            "start" => self.cmd_start(chat, from).await,
            "help" => self.reply(chat, HELP, None).await,
            "menu" => self.reply(chat, "What would you like to do?", Some(&keyboards::menu())).await,
            "new" => self.cmd_new(chat, from).await,
            "results" => self.cmd_results(chat).await,
            "cancel" => self.cmd_cancel(chat, from.id).await,
            "pending" => self.cmd_pending(chat, from.id).await,
            _ => self.reply(chat, "Unknown command. See /help.", None).await,
        }
    }

    async fn cmd_start(&self, chat: &ChatTarget, from: &User) -> Result<(), BotError> {
        let is_admin = self.options.admin_ids.contains(&from.id);
        let (user, created) = self.store.users().register(
            from.id,
            &from.display_name(),
            from.username.as_deref(),
            is_admin,
        )?;

        if user.can_submit() {
            let text = format!("Welcome, {}! What would you like to do?", escape(&user.name));
            return self.reply(chat, &text, Some(&keyboards::menu())).await;
        }

        if user.status == UserStatus::Rejected {
            return self
                .reply(chat, "Your access request was not approved.", None)
                .await;
        }
        self.reply(
            chat,
            "Thanks! Your access request is waiting for an administrator's approval.",
            None,
        )
        .await?;
        if created {
            self.notify_admins_of(&user).await;
        }
        Ok(())
    }

    /// Best effort: a failed notice is logged and otherwise ignored.
    async fn notify_admins_of(&self, user: &UserRecord) {
        let admins = match self.store.users().admins() {
            Ok(admins) => admins,
            Err(e) => {
                tracing::warn!(error = %e, "could not load admins for approval notice");
                return;
            }
        };
        let text = approval_text(user);
        for admin in admins {
            let keyboard = keyboards::approval(user.id);
            if let Err(e) = self
                .messenger
                .send_message(&ChatTarget::Id(admin.id), &text, Some(&keyboard))
                .await
            {
                tracing::warn!(admin_id = admin.id, error = %e, "approval notice failed");
            }
        }
    }

    async fn cmd_new(&self, chat: &ChatTarget, from: &User) -> Result<(), BotError> {
        let Some(user) = self.store.users().get(from.id)? else {
            return self.reply(chat, "Please send /start first.", None).await;
        };
        if !user.can_submit() {
            return self
                .reply(chat, "You are not allowed to enter results yet.", None)
                .await;
        }

        let submitter = Submitter {
            user_id: user.id,
            name: user.name.clone(),
        };
        let known_teams = self.store.teams().names()?;
        let today = chrono::Local::now().date_naive();
        let (dialogue, prompt) = Dialogue::start(submitter, known_teams, today);
        self.sessions.lock().await.insert(from.id, dialogue);
        tracing::info!(user_id = from.id, "result entry started");
        self.send_prompt(chat, &prompt).await
    }

    async fn cmd_results(&self, chat: &ChatTarget) -> Result<(), BotError> {
        let results = self.store.results().list(&ResultFilter {
            limit: self.options.results_page,
            ..ResultFilter::default()
        })?;
        if results.is_empty() {
            return self.reply(chat, "No results recorded yet.", None).await;
        }
        let lines: Vec<String> = results.iter().map(format_list_line).collect();
        let text = format!("📋 <b>Latest results</b>\n\n{}", lines.join("\n"));
        self.reply(chat, &text, None).await
    }

    async fn cmd_cancel(&self, chat: &ChatTarget, user_id: i64) -> Result<(), BotError> {
        let removed = self.sessions.lock().await.remove(&user_id).is_some();
        let text = if removed {
            "Entry cancelled."
        } else {
            "There is nothing to cancel."
        };
        self.reply(chat, text, None).await
    }

    async fn cmd_pending(&self, chat: &ChatTarget, user_id: i64) -> Result<(), BotError> {
        if !self.is_admin(user_id)? {
            return self.reply(chat, "Only administrators can do that.", None).await;
        }
        let pending = self.store.users().pending()?;
        if pending.is_empty() {
            return self.reply(chat, "No users are waiting for approval.", None).await;
        }
        for user in &pending {
            self.reply(chat, &approval_text(user), Some(&keyboards::approval(user.id)))
                .await?;
        }
        Ok(())
    }

    async fn handle_callback(&self, callback: CallbackQuery) -> Result<(), BotError> {
        let data = callback.data.clone().unwrap_or_default();
        let (namespace, payload) = data.split_once(':').unwrap_or((data.as_str(), ""));
        let chat = callback
            .message
            .as_ref()
            .map(|m| ChatTarget::Id(m.chat.id))
            .unwrap_or(ChatTarget::Id(callback.from.id));

        let toast = match namespace {
            keyboards::MENU => {
                self.answer(&callback.id, None).await;
                match payload {
                    "new" => self.cmd_new(&chat, &callback.from).await?,
                    "results" => self.cmd_results(&chat).await?,
                    _ => self.reply(&chat, HELP, None).await?,
                }
                return Ok(());
            }
            keyboards::DIALOGUE => {
                self.answer(&callback.id, None).await;
                if self.sessions.lock().await.contains_key(&callback.from.id) {
                    return self
                        .continue_dialogue(&chat, callback.from.id, Input::Button(payload))
                        .await;
                }
                return self
                    .reply(&chat, "This entry has expired. Use /new to start again.", None)
                    .await;
            }
            keyboards::REACT => self.on_reaction(&callback, payload).await?,
            keyboards::USER => self.on_user_decision(&callback, payload).await?,
            _ => None,
        };
        self.answer(&callback.id, toast.as_deref()).await;
        Ok(())
    }

    async fn continue_dialogue(&self, chat: &ChatTarget, user_id: i64, input: Input<'_>) -> Result<(), BotError> {
        let mut sessions = self.sessions.lock().await;
        let Some(dialogue) = sessions.get_mut(&user_id) else {
            return Ok(());
        };

        match dialogue.handle(input) {
            Outcome::Ask(prompt) => {
                drop(sessions);
                self.send_prompt(chat, &prompt).await
            }
            Outcome::Retry { error, prompt } => {
                drop(sessions);
                let text = format!("❌ {}\n\n{}", escape(&error), prompt.text);
                self.reply(chat, &text, Some(&prompt.keyboard)).await
            }
            Outcome::Cancelled => {
                sessions.remove(&user_id);
                drop(sessions);
                tracing::info!(user_id, "result entry cancelled");
                self.reply(chat, "Entry cancelled.", None).await
            }
            Outcome::Done(draft) => {
                // Keep the session on a failed save so Confirm can be pressed again.
                match self.save(draft) {
                    Ok(result) => {
                        sessions.remove(&user_id);
                        drop(sessions);
                        self.announce(chat, &result).await
                    }
                    Err(e) => {
                        drop(sessions);
                        tracing::error!(user_id, error = %e, "saving result failed");
                        self.reply(
                            chat,
                            "❌ The result could not be saved. Press Confirm to try again.",
                            Some(&keyboards::confirm()),
                        )
                        .await
                    }
                }
            }
        }
    }

    /// Persists a confirmed draft and remembers its team names.
    fn save(&self, draft: MatchDraft) -> Result<MatchResult, StoreError> {
        let result = self.store.results().insert(draft)?;
        if let Err(e) = self
            .store
            .teams()
            .ensure(result.teams.iter().map(|t| t.name.as_str()))
        {
            tracing::warn!(error = %e, "could not update team list");
        }
        Ok(result)
    }

    /// Publishes a saved result and reports the outcome to the submitter.
    ///
    /// The result stays saved whatever happens here.
    async fn announce(&self, chat: &ChatTarget, result: &MatchResult) -> Result<(), BotError> {
        let text = match self.publish(result).await {
            Ok(Some(_)) => format!("✅ Result #{} saved and published.", result.id),
            Ok(None) => format!("✅ Result #{} saved.", result.id),
            Err(e) => {
                tracing::warn!(result_id = result.id, error = %e, "publishing result failed");
                format!(
                    "✅ Result #{} saved.\n⚠️ Publishing to the channel failed: {}",
                    result.id,
                    escape(&e.to_string())
                )
            }
        };
        self.reply(chat, &text, Some(&keyboards::menu())).await
    }

    /// Sends the summary to the channel. Returns the channel message id.
    pub async fn publish(&self, result: &MatchResult) -> Result<Option<i64>, BotError> {
        let Some(channel) = &self.options.channel else {
            return Ok(None);
        };
        let keyboard = keyboards::reactions(&ReactionTally::default());
        let message_id = self
            .messenger
            .send_message(channel, &format_summary(result), Some(&keyboard))
            .await?;
        // The summary is live from here on; bookkeeping failures are only logged.
        if let Err(e) = self.store.results().set_channel_message(result.id, message_id) {
            tracing::error!(result_id = result.id, message_id, error = %e, "recording channel message failed");
        }
        if let Err(e) = self.store.reactions().init(message_id) {
            tracing::error!(message_id, error = %e, "creating reaction tally failed");
        }
        tracing::info!(result_id = result.id, message_id, %channel, "result published");
        Ok(Some(message_id))
    }

    async fn on_reaction(&self, callback: &CallbackQuery, payload: &str) -> Result<Option<String>, BotError> {
        let (Some(kind), Some(message)) = (ReactionKind::from_key(payload), callback.message.as_ref()) else {
            return Ok(None);
        };
        let tally = self
            .store
            .reactions()
            .toggle(message.message_id, kind, callback.from.id)?;
        let chat = ChatTarget::Id(message.chat.id);
        if let Err(e) = self
            .messenger
            .edit_message_keyboard(&chat, message.message_id, &keyboards::reactions(&tally))
            .await
        {
            tracing::warn!(message_id = message.message_id, error = %e, "reaction keyboard update failed");
        }
        let toast = if tally.has_reacted(kind, callback.from.id) {
            format!("{} added", kind.emoji())
        } else {
            format!("{} removed", kind.emoji())
        };
        Ok(Some(toast))
    }

    async fn on_user_decision(&self, callback: &CallbackQuery, payload: &str) -> Result<Option<String>, BotError> {
        if !self.is_admin(callback.from.id)? {
            return Ok(Some("Only administrators can do that.".to_string()));
        }
        let Some((action, id)) = payload.split_once(':') else {
            return Ok(None);
        };
        let Ok(user_id) = id.parse::<i64>() else {
            return Ok(None);
        };
        let status = match action {
            "approve" => UserStatus::Approved,
            "reject" => UserStatus::Rejected,
            _ => return Ok(None),
        };

        let user = match self.store.users().set_status(user_id, status) {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => return Ok(Some("Unknown user.".to_string())),
            Err(e) => return Err(e.into()),
        };

        if let Some(message) = &callback.message {
            let text = format!("{} is now <b>{}</b>.", escape(&user.name), user.status);
            if let Err(e) = self
                .messenger
                .edit_message_text(&ChatTarget::Id(message.chat.id), message.message_id, &text, None)
                .await
            {
                tracing::warn!(error = %e, "approval message update failed");
            }
        }

        let notice = match status {
            UserStatus::Approved => "✅ You can now enter results. Send /new to start.",
            _ => "Your access request was not approved.",
        };
        if let Err(e) = self
            .messenger
            .send_message(&ChatTarget::Id(user_id), notice, None)
            .await
        {
            tracing::warn!(user_id, error = %e, "could not notify user of decision");
        }
        Ok(Some(format!("{} {}", user.name, user.status)))
    }

    fn is_admin(&self, user_id: i64) -> Result<bool, BotError> {
        Ok(self
            .store
            .users()
            .get(user_id)?
            .is_some_and(|u| u.is_admin()))
    }

    async fn send_prompt(&self, chat: &ChatTarget, prompt: &Prompt) -> Result<(), BotError> {
        self.reply(chat, &prompt.text, Some(&prompt.keyboard)).await
    }

    async fn reply(
        &self,
        chat: &ChatTarget,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), BotError> {
        self.messenger.send_message(chat, text, keyboard).await?;
        Ok(())
    }

    /// Every callback must be answered; a failure only leaves a spinner.
    async fn answer(&self, callback_id: &str, text: Option<&str>) {
        if let Err(e) = self.messenger.answer_callback(callback_id, text).await {
            tracing::debug!(error = %e, "answering callback failed");
        }
    }
}

fn approval_text(user: &UserRecord) -> String {
    let handle = user
        .username
        .as_deref()
        .map(|u| format!(" (@{})", escape(u)))
        .unwrap_or_default();
    format!(
        "👤 <b>{}</b>{} asks for access.\nUser id: {}",
        escape(&user.name),
        handle,
        user.id
    )
}

fn escape(text: &str) -> String {
    rugby_core::summary::escape_html(text)
}

/// Extracts the command name from `/name@botname args`.
fn parse_command(text: &str) -> Option<&str> {
    let word = text.split_whitespace().next()?;
    let name = word.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    (!name.is_empty()).then_some(name)
}
