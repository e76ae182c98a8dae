//! Signed bearer tokens carrying the user id and email.

use crate::app_config::AuthConfig;
use crate::error::{ApiError, ApiResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(i64::from(config.token_ttl_hours)),
        )
    }

    pub fn issue(&self, user_id: i32, email: &str) -> ApiResult<String> {
        self.issue_at(user_id, email, Utc::now())
    }

    /// Issues a token as if it were `issued_at`.
    pub fn issue_at(&self, user_id: i32, email: &str, issued_at: DateTime<Utc>) -> ApiResult<String> {
        let claims = Claims {
            id: user_id,
            email: email.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::internal(format!("token signing failed: {}", e)))
    }

    pub fn verify(&self, token: &str) -> ApiResult<Claims> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("Token rejected: {}", e);
                ApiError::unauthorized("Invalid or expired token")
            })
    }
}
