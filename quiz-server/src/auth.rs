use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quiz_types::{AuthError, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub is_admin: bool,
    pub iat: u64,
    pub exp: u64,
}

/// Authenticated caller extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    pub is_admin: bool,
}

pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp() as u64,
            exp: (now + self.token_ttl).timestamp() as u64,
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::warn!("Failed to encode token: {:?}", e);
            AuthError::InvalidToken
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthContext, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::warn!("Token validation failed: {:?}", e);
                    AuthError::InvalidToken
                }
            })?;

        let claims = token_data.claims;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthContext {
            user_id,
            username: claims.username,
            is_admin: claims.is_admin,
        })
    }

    /// Placeholder credential check: any non-empty secret passes.
    /// Not a credential store; swap out before any real deployment.
    pub fn check_password(password: &str) -> Result<(), AuthError> {
        if password.trim().is_empty() {
            Err(AuthError::MissingCredentials)
        } else {
            Ok(())
        }
    }
}
