//! In-memory user store for tests and single-process setups.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use courtbook_core::error::AppError;
use courtbook_core::result::AppResult;
use courtbook_core::traits::UserStore;
use courtbook_entity::user::{NewUser, User};

/// In-memory [`UserStore`] keyed by user ID.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.lock().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        // Check-and-insert under one lock hold, like the database's
        // unique index: concurrent duplicates lose deterministically.
        let mut users = self.users.lock().await;

        let collision = users.values().any(|u| {
            u.username.eq_ignore_ascii_case(&user.username)
                || u.email.eq_ignore_ascii_case(&user.email)
        });
        if collision {
            return Err(AppError::conflict("User already exists"));
        }

        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            display_name: user.display_name,
            phone: user.phone,
            created_at: now,
            updated_at: now,
        };

        users.insert(record.id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtbook_core::error::ErrorKind;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            display_name: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = MemoryUserStore::new();
        let created = store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        let by_name = store.find_by_username("ALICE").await.unwrap().unwrap();
        assert_eq!(by_name.id, created.id);

        let by_email = store.find_by_email("Alice@Example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .create(new_user("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }
}
