use anyhow::Result;
use async_trait::async_trait;

pub trait EmailValidator: Send + Sync {
    fn is_valid(&self, email: &str) -> Result<bool>;
}

#[async_trait]
pub trait Encrypter: Send + Sync {
    /// Checks a plain password against a stored hash.
    async fn compare(&self, plain: &str, hash: &str) -> Result<bool>;
}

#[async_trait]
pub trait TokenGenerator: Send + Sync {
    /// `Ok(None)` when the signer produced no token.
    async fn generate(&self, user_id: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns `Ok(None)` for an unknown user and for a wrong password alike.
    async fn auth(&self, email: &str, password: &str) -> Result<Option<String>>;
}
