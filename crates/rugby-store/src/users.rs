//! Bot user repository.

use crate::collection::JsonCollection;
use crate::error::StoreError;
use rugby_core::{Role, UserRecord, UserStatus};

pub(crate) type UsersDoc = Vec<UserRecord>;

/// Repository for users known to the bot.
pub struct UserRepo<'a> {
    docs: &'a JsonCollection<UsersDoc>,
}

impl<'a> UserRepo<'a> {
    pub(crate) fn new(docs: &'a JsonCollection<UsersDoc>) -> Self {
        Self { docs }
    }

    /// Registers a user if unknown and returns the stored record.
    ///
    /// Known users keep their status and role; their display name and
    /// username are refreshed. `admin` registers new users as approved
    /// admins and promotes existing ones.
    pub fn register(
        &self,
        id: i64,
        name: &str,
        username: Option<&str>,
        admin: bool,
    ) -> Result<(UserRecord, bool), StoreError> {
        self.docs.update(|users| {
            if let Some(user) = users.iter_mut().find(|u| u.id == id) {
                user.name = name.to_string();
                user.username = username.map(str::to_string);
                if admin {
                    user.role = Role::Admin;
                    user.status = UserStatus::Approved;
                }
                return Ok((user.clone(), false));
            }
            let user = UserRecord {
                id,
                name: name.to_string(),
                username: username.map(str::to_string),
                status: if admin {
                    UserStatus::Approved
                } else {
                    UserStatus::Pending
                },
                role: if admin { Role::Admin } else { Role::Member },
                registered_at: chrono::Utc::now(),
            };
            users.push(user.clone());
            tracing::info!(user_id = id, name, status = %user.status, "user registered");
            Ok((user, true))
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.docs.read()?.into_iter().find(|u| u.id == id))
    }

    /// All users, oldest registration first.
    pub fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let mut users = self.docs.read()?;
        users.sort_by_key(|u| u.registered_at);
        Ok(users)
    }

    pub fn pending(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|u| u.status == UserStatus::Pending)
            .collect())
    }

    /// Admin users, used for new-registration notices.
    pub fn admins(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.list()?.into_iter().filter(|u| u.is_admin()).collect())
    }

    pub fn set_status(&self, id: i64, status: UserStatus) -> Result<UserRecord, StoreError> {
        self.modify(id, |u| u.status = status)
    }

    pub fn set_role(&self, id: i64, role: Role) -> Result<UserRecord, StoreError> {
        self.modify(id, |u| u.role = role)
    }

    fn modify(&self, id: i64, change: impl FnOnce(&mut UserRecord)) -> Result<UserRecord, StoreError> {
        self.docs.update(|users| {
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
            change(user);
            tracing::info!(user_id = id, status = %user.status, role = %user.role, "user updated");
            Ok(user.clone())
        })
    }
}
