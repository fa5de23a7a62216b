use crate::domain::value_objects::UserId;
use crate::ports::user_directory::{Result, User, UserDirectory as UserDirectoryTrait};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of UserDirectory
///
/// Supports stateful testing by storing registered users.
/// Also backs the standalone server until a real user service is wired in.
pub struct UserDirectory {
    users: Mutex<HashMap<UserId, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Register a user
    pub fn add_user(&self, user_id: UserId, name: impl Into<String>) {
        let user = User {
            user_id,
            name: name.into(),
        };
        self.users.lock().unwrap().insert(user_id, user);
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDirectoryTrait for UserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool> {
        Ok(self.users.lock().unwrap().contains_key(&user_id))
    }

    async fn get(&self, user_id: UserId) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_user_lookup() {
        let directory = UserDirectory::new();
        let user_id = UserId::new();
        directory.add_user(user_id, "alice");

        assert!(directory.exists(user_id).await.unwrap());
        let user = directory.get(user_id).await.unwrap().unwrap();
        assert_eq!(user.name, "alice");

        let stranger = UserId::new();
        assert!(!directory.exists(stranger).await.unwrap());
        assert!(directory.get(stranger).await.unwrap().is_none());
    }
}
