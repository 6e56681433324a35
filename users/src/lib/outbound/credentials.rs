use auth::Claims;
use auth::HashingCost;
use auth::JwtError;
use auth::JwtHandler;

use crate::config::JwtConfig;
use crate::config::PasswordConfig;
use crate::domain::user::errors::PasswordError;
use crate::domain::user::errors::TokenError;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::PasswordHasher;
use crate::domain::user::ports::Tokenizer;

/// Argon2id-backed [`PasswordHasher`].
#[derive(Clone, Default)]
pub struct Argon2PasswordHasher {
    inner: auth::PasswordHasher,
}

impl Argon2PasswordHasher {
    pub fn new(config: &PasswordConfig) -> Result<Self, auth::PasswordError> {
        let inner = auth::PasswordHasher::with_cost(HashingCost {
            memory_kib: config.memory_kib,
            iterations: config.iterations,
            parallelism: config.parallelism,
        })?;

        Ok(Self { inner })
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        self.inner
            .hash(password)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn verify(&self, hashed_password: &str, password: &str) -> bool {
        match self.inner.verify(password, hashed_password) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is unreadable");
                false
            }
        }
    }
}

/// JWT-backed [`Tokenizer`].
///
/// Tokens carry the user id as `sub` and the login email as `email`.
pub struct JwtTokenizer {
    handler: JwtHandler,
    expiration_hours: i64,
}

impl JwtTokenizer {
    pub fn new(config: &JwtConfig) -> Self {
        let handler = JwtHandler::new(config.secret.as_bytes());
        let handler = match &config.issuer {
            Some(issuer) => handler.with_issuer(issuer),
            None => handler,
        };

        Self {
            handler,
            expiration_hours: config.expiration_hours,
        }
    }
}

impl Tokenizer for JwtTokenizer {
    fn generate_token(&self, email: &str, user_id: &UserId) -> Result<String, TokenError> {
        let mut claims = Claims::for_user(user_id, email, self.expiration_hours);
        if let Some(issuer) = self.handler.issuer() {
            claims = claims.with_issuer(issuer);
        }

        self.handler
            .encode(&claims)
            .map_err(|e| TokenError::GenerationFailed(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<UserId, TokenError> {
        let claims: Claims = self.handler.decode(token).map_err(|e| match e {
            JwtError::TokenExpired => TokenError::Expired,
            other => TokenError::Invalid(other.to_string()),
        })?;

        claims
            .subject()
            .map(UserId::from)
            .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
