//! Inline keyboards and their callback data.
//!
//! Callback data is namespaced as `<namespace>:<payload>`; the payload must
//! keep the whole string within the API's 64-byte limit, so team buttons
//! carry an index instead of the name.

use rugby_core::validate::same_team_name;
use rugby_core::{Category, Gender, MatchType, ReactionKind, ReactionTally};

use crate::telegram::{InlineButton, InlineKeyboard};

pub const MENU: &str = "menu";
pub const DIALOGUE: &str = "dlg";
pub const REACT: &str = "react";
pub const USER: &str = "user";

pub const CANCEL: &str = "cancel";
pub const CONFIRM: &str = "confirm";
pub const TODAY: &str = "today";
pub const NO_REFEREE: &str = "none";
pub const TEAM: &str = "team";

/// Most team buttons shown at once.
const MAX_TEAM_BUTTONS: usize = 24;

fn dlg(payload: &str) -> String {
    format!("{DIALOGUE}:{payload}")
}

fn cancel_row() -> Vec<InlineButton> {
    vec![InlineButton::new("✖️ Cancel", dlg(CANCEL))]
}

pub fn menu() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![InlineButton::new("🏉 New match", format!("{MENU}:new"))])
        .row(vec![
            InlineButton::new("📋 Results", format!("{MENU}:results")),
            InlineButton::new("❓ Help", format!("{MENU}:help")),
        ])
}

pub fn categories() -> InlineKeyboard {
    let buttons = Category::ALL
        .into_iter()
        .map(|c| InlineButton::new(c.label(), dlg(c.label())))
        .collect();
    InlineKeyboard::new().grid(buttons, 4).row(cancel_row())
}

pub fn genders() -> InlineKeyboard {
    let buttons = Gender::ALL
        .into_iter()
        .map(|g| InlineButton::new(g.label(), dlg(g.label())))
        .collect();
    InlineKeyboard::new().row(buttons).row(cancel_row())
}

pub fn match_types() -> InlineKeyboard {
    let buttons = MatchType::ALL
        .into_iter()
        .map(|m| InlineButton::new(m.label(), dlg(m.label())))
        .collect();
    InlineKeyboard::new().row(buttons).row(cancel_row())
}

/// Buttons for known teams not yet picked for this match.
pub fn teams(known: &[String], chosen: &[String]) -> InlineKeyboard {
    let buttons = known
        .iter()
        .enumerate()
        .filter(|(_, name)| !chosen.iter().any(|c| same_team_name(c, name)))
        .take(MAX_TEAM_BUTTONS)
        .map(|(i, name)| InlineButton::new(name.clone(), dlg(&format!("{TEAM}:{i}"))))
        .collect();
    InlineKeyboard::new().grid(buttons, 2).row(cancel_row())
}

pub fn date() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![InlineButton::new("📅 Today", dlg(TODAY))])
        .row(cancel_row())
}

pub fn referee() -> InlineKeyboard {
    InlineKeyboard::new()
        .row(vec![InlineButton::new("No referee", dlg(NO_REFEREE))])
        .row(cancel_row())
}

pub fn cancel_only() -> InlineKeyboard {
    InlineKeyboard::new().row(cancel_row())
}

pub fn confirm() -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        InlineButton::new("✅ Confirm", dlg(CONFIRM)),
        InlineButton::new("✖️ Cancel", dlg(CANCEL)),
    ])
}

/// Reaction buttons with current counts, e.g. `🔥 3`.
pub fn reactions(tally: &ReactionTally) -> InlineKeyboard {
    let buttons = ReactionKind::ALL
        .into_iter()
        .map(|kind| {
            let count = tally.count(kind);
            let label = if count == 0 {
                kind.emoji().to_string()
            } else {
                format!("{} {}", kind.emoji(), count)
            };
            InlineButton::new(label, format!("{REACT}:{}", kind.key()))
        })
        .collect();
    InlineKeyboard::new().row(buttons)
}

pub fn approval(user_id: i64) -> InlineKeyboard {
    InlineKeyboard::new().row(vec![
        InlineButton::new("✅ Approve", format!("{USER}:approve:{user_id}")),
        InlineButton::new("⛔ Reject", format!("{USER}:reject:{user_id}")),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_data_fits_api_limit() {
        let known: Vec<String> = (0..30).map(|i| format!("{} {}", "x".repeat(60), i)).collect();
        let keyboards = [
            menu(),
            categories(),
            genders(),
            match_types(),
            teams(&known, &[]),
            date(),
            referee(),
            confirm(),
            reactions(&ReactionTally::default()),
            approval(i64::MIN),
        ];
        for kb in &keyboards {
            for button in kb.buttons() {
                assert!(button.callback_data.len() <= 64, "{}", button.callback_data);
            }
        }
    }

    #[test]
    fn team_buttons_skip_chosen_and_keep_indexes() {
        let known = vec!["Bears".to_string(), "Lions".to_string(), "Tigers".to_string()];
        let kb = teams(&known, &["lions".to_string()]);
        let data: Vec<&str> = kb.buttons().map(|b| b.callback_data.as_str()).collect();
        assert_eq!(data, vec!["dlg:team:0", "dlg:team:2", "dlg:cancel"]);
    }

    #[test]
    fn team_buttons_skip_chosen_ignoring_accented_case() {
        let known = vec!["École".to_string(), "Lions".to_string()];
        let kb = teams(&known, &["école".to_string()]);
        let data: Vec<&str> = kb.buttons().map(|b| b.callback_data.as_str()).collect();
        assert_eq!(data, vec!["dlg:team:1", "dlg:cancel"]);
    }

    #[test]
    fn team_buttons_are_capped() {
        let known: Vec<String> = (0..40).map(|i| format!("T{i}")).collect();
        let kb = teams(&known, &[]);
        assert_eq!(kb.buttons().count(), MAX_TEAM_BUTTONS + 1);
    }

    #[test]
    fn reaction_labels_show_counts() {
        let mut tally = ReactionTally::default();
        tally.toggle(ReactionKind::Fire, 1);
        tally.toggle(ReactionKind::Fire, 2);
        let kb = reactions(&tally);
        let labels: Vec<&str> = kb.buttons().map(|b| b.text.as_str()).collect();
        assert_eq!(labels, vec!["👍", "🔥 2", "👏", "🏆"]);
    }
}
