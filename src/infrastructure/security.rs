use crate::domain::error::DomainError;
use crate::domain::ports::{Encrypter, TokenGenerator};
use anyhow::Result;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

// Argon2 parameters for 50-150ms target latency
const ARGON2_M_COST: u32 = 19456; // 19 MB
const ARGON2_T_COST: u32 = 2; // 2 iterations
const ARGON2_P_COST: u32 = 1; // 1 parallelism

pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    exp: i64,
    iat: i64,
}

fn argon2() -> Result<Argon2<'static>, argon2::password_hash::Error> {
    let params = argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, None)
        .map_err(argon2::password_hash::Error::from)?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2()?.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `Ok(false)` on mismatch; `Err` only when `hash` is not a PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match argon2()?.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Password comparator backed by argon2 PHC hashes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Encrypter;

#[async_trait]
impl Encrypter for Argon2Encrypter {
    #[instrument(skip_all)]
    async fn compare(&self, plain: &str, hash: &str) -> Result<bool> {
        if plain.is_empty() {
            return Err(DomainError::missing_param("password").into());
        }
        if hash.is_empty() {
            return Err(DomainError::missing_param("hash").into());
        }
        trace!("Verifying password hash");

        // argon2 is CPU-bound; keep it off the async workers.
        let plain = plain.to_string();
        let hash = hash.to_string();
        let current_span = tracing::Span::current();
        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| verify_password(&plain, &hash))
        })
        .await
        .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))?
        .map_err(|e| anyhow::anyhow!("Failed to verify password: {}", e))
    }
}

/// Signs HS256 JWTs whose subject is the user id.
#[derive(Debug, Clone)]
pub struct JwtTokenGenerator {
    secret: Option<String>,
    ttl: Duration,
}

impl JwtTokenGenerator {
    pub fn new(secret: Option<String>) -> Self {
        Self::with_ttl(secret, Duration::seconds(DEFAULT_TOKEN_TTL_SECS))
    }

    pub fn with_ttl(secret: Option<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            ttl,
        }
    }
}

#[async_trait]
impl TokenGenerator for JwtTokenGenerator {
    #[instrument(skip(self))]
    async fn generate(&self, user_id: &str) -> Result<Option<String>> {
        let Some(secret) = self.secret.as_deref() else {
            return Err(DomainError::missing_param("secret").into());
        };
        if user_id.is_empty() {
            return Err(DomainError::missing_param("id").into());
        }

        let token = generate_token(user_id, secret, self.ttl)?;
        Ok(Some(token))
    }
}

pub fn generate_token(
    user_id: &str,
    secret: &str,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + ttl).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
}

pub fn validate_token(token: &str, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 60; // 60 seconds leeway

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    Ok(token_data.claims.sub)
}
