use crate::domain::error::DomainError;
use crate::domain::repository::{LoadUserByEmailRepository, UpdateAccessTokenRepository};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// The `users` collection, keyed by document id.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    pub async fn save_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        storage.insert(user.id.clone(), user);
        debug!("User saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LoadUserByEmailRepository for InMemoryUserRepository {
    #[instrument(skip(self), fields(email = email))]
    async fn load(&self, email: &str) -> Result<Option<User>> {
        if email.is_empty() {
            return Err(DomainError::missing_param("email").into());
        }

        trace!("Acquiring read lock for user storage");
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found in storage"),
            None => trace!("User not found in storage"),
        }
        Ok(user)
    }
}

#[async_trait]
impl UpdateAccessTokenRepository for InMemoryUserRepository {
    #[instrument(skip(self, access_token), fields(user_id = user_id))]
    async fn update(&self, user_id: &str, access_token: &str) -> Result<()> {
        if user_id.is_empty() {
            return Err(DomainError::missing_param("userId").into());
        }
        if access_token.is_empty() {
            return Err(DomainError::missing_param("accessToken").into());
        }

        let mut storage = self.storage.write().await;
        match storage.get_mut(user_id) {
            Some(user) => {
                user.access_token = Some(access_token.to_string());
                debug!("Access token stored on user");
            }
            // Matches an update with no matching document: nothing is written.
            None => debug!("No user with this id; access token not stored"),
        }
        Ok(())
    }
}
