use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait LoadUserByEmailRepository: Send + Sync {
    async fn load(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait UpdateAccessTokenRepository: Send + Sync {
    /// Sets `access_token` on the user document, leaving other fields untouched.
    async fn update(&self, user_id: &str, access_token: &str) -> Result<()>;
}
