//! In-Memory Repository Implementation
//!
//! Backs tests and `DATABASE_URL=memory` development runs.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// Users keyed by canonical user name
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        let key = user.user_name.canonical().to_string();
        if users.contains_key(&key) {
            return Err(AuthError::UserNameTaken);
        }
        users.insert(key, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.user_id == user_id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_name.canonical()).cloned())
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        Ok(self.users.read().await.contains_key(user_name.canonical()))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let users = self.users.read().await;
        let mut list: Vec<User> = users.values().cloned().collect();
        list.sort_by(|a, b| a.user_name.canonical().cmp(b.user_name.canonical()));
        Ok(list)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        users.retain(|_, u| u.user_id != user.user_id);
        users.insert(user.user_name.canonical().to_string(), user.clone());
        Ok(())
    }

    async fn delete_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>> {
        Ok(self.users.write().await.remove(user_name.canonical()))
    }
}
