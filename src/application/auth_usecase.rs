use crate::domain::error::DomainError;
use crate::domain::ports::{Authenticator, Encrypter, TokenGenerator};
use crate::domain::repository::{LoadUserByEmailRepository, UpdateAccessTokenRepository};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};

/// Collaborators of [`AuthUseCase`]. Any of them may be left out; the gap
/// is reported when `auth` is called, not at construction.
#[derive(Clone, Default)]
pub struct AuthDependencies {
    pub load_user_by_email_repository: Option<Arc<dyn LoadUserByEmailRepository>>,
    pub update_access_token_repository: Option<Arc<dyn UpdateAccessTokenRepository>>,
    pub encrypter: Option<Arc<dyn Encrypter>>,
    pub token_generator: Option<Arc<dyn TokenGenerator>>,
}

pub struct AuthUseCase {
    deps: AuthDependencies,
}

fn require<T: ?Sized>(dep: &Option<Arc<T>>, name: &'static str) -> Result<Arc<T>> {
    dep.clone().ok_or_else(|| {
        warn!(dependency = name, "Auth use case is missing a collaborator");
        DomainError::MissingDependency(name).into()
    })
}

impl AuthUseCase {
    pub fn new(deps: AuthDependencies) -> Self {
        Self { deps }
    }
}

#[async_trait]
impl Authenticator for AuthUseCase {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn auth(&self, email: &str, password: &str) -> Result<Option<String>> {
        trace!("Starting authentication");

        if email.is_empty() {
            return Err(DomainError::missing_param("email").into());
        }
        if password.is_empty() {
            return Err(DomainError::missing_param("password").into());
        }

        let load_user = require(
            &self.deps.load_user_by_email_repository,
            "load_user_by_email_repository",
        )?;
        let encrypter = require(&self.deps.encrypter, "encrypter")?;
        let token_generator = require(&self.deps.token_generator, "token_generator")?;
        let update_access_token = require(
            &self.deps.update_access_token_repository,
            "update_access_token_repository",
        )?;

        // Unknown users skip the hash comparison, so this path answers faster
        // than a wrong password even though both return the same result.
        let Some(user) = load_user.load(email).await? else {
            debug!("No user registered under this email");
            return Ok(None);
        };

        if !encrypter.compare(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "Password does not match");
            return Ok(None);
        }

        let access_token = token_generator.generate(&user.id).await?;
        let Some(access_token) = access_token else {
            warn!(user_id = %user.id, "Token generator returned no token");
            return Ok(None);
        };

        update_access_token.update(&user.id, &access_token).await?;

        info!(user_id = %user.id, "User authenticated");
        Ok(Some(access_token))
    }
}
