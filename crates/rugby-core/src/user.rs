//! Bot users and their access level.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Approval state of a user who has contacted the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    pub const fn label(self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A chat user known to the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Chat platform user id.
    pub id: i64,
    pub name: String,
    pub username: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default)]
    pub role: Role,
    pub registered_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this user may enter match results.
    pub fn can_submit(&self) -> bool {
        self.is_admin() || self.status == UserStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(status: UserStatus, role: Role) -> UserRecord {
        UserRecord {
            id: 1,
            name: "Robin".to_string(),
            username: None,
            status,
            role,
            registered_at: Utc::now(),
        }
    }

    #[test]
    fn pending_member_cannot_submit() {
        assert!(!user(UserStatus::Pending, Role::Member).can_submit());
        assert!(!user(UserStatus::Rejected, Role::Member).can_submit());
    }

    #[test]
    fn approved_member_can_submit() {
        assert!(user(UserStatus::Approved, Role::Member).can_submit());
    }

    #[test]
    fn admin_can_submit_regardless_of_status() {
        assert!(user(UserStatus::Pending, Role::Admin).can_submit());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&UserStatus::Approved).unwrap();
        assert_eq!(json, "\"approved\"");
    }
}
