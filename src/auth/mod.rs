//! Registration and login.

pub mod password;
pub mod token;

pub use token::{Claims, TokenService};

use crate::error::{ApiError, ApiResult};
use crate::orm::users;
use crate::store;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterInput {
    #[serde(default)]
    #[validate(length(max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(email, length(max = 255))]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public part of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: i32,
    pub name: String,
    pub email: String,
}

impl From<&users::Model> for UserView {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserView,
}

/// Emails are compared trimmed and lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct AuthService {
    db: DatabaseConnection,
    tokens: TokenService,
    min_password_length: usize,
}

impl AuthService {
    pub fn new(db: DatabaseConnection, tokens: TokenService, min_password_length: usize) -> Self {
        Self {
            db,
            tokens,
            min_password_length,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> ApiResult<AuthPayload> {
        let input = RegisterInput {
            name: input.name.trim().to_owned(),
            email: normalize_email(&input.email),
            password: input.password,
        };

        if input.name.is_empty() || input.email.is_empty() || input.password.is_empty() {
            return Err(ApiError::bad_request("All fields are required"));
        }

        if input.password.chars().count() < self.min_password_length {
            return Err(ApiError::bad_request(format!(
                "Password must be at least {} characters long",
                self.min_password_length
            )));
        }

        input.validate().map_err(|e| {
            log::debug!("Registration validation failed: {}", e);
            ApiError::bad_request("Invalid registration data")
        })?;

        if store::users::find_by_email(&self.db, &input.email)
            .await?
            .is_some()
        {
            return Err(ApiError::bad_request("Email is already registered"));
        }

        let password_hash = password::hash_password(&input.password)?;
        let user = store::users::insert(&self.db, &input.name, &input.email, &password_hash).await?;
        log::info!("User registered: user_id={}", user.id);

        self.payload_for(&user)
    }

    pub async fn login(&self, input: LoginInput) -> ApiResult<AuthPayload> {
        let email = normalize_email(&input.email);
        if email.is_empty() || input.password.is_empty() {
            return Err(ApiError::bad_request("Email and password are required"));
        }

        let user = match store::users::find_by_email(&self.db, &email).await? {
            Some(user) => user,
            None => return Err(ApiError::unauthorized("Invalid credentials")),
        };

        if !password::verify_password(&input.password, &user.password) {
            log::debug!("login failure: bad password for user_id={}", user.id);
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        if !user.is_active {
            log::warn!("Login attempt on deactivated account: user_id={}", user.id);
            return Err(ApiError::unauthorized("Account is deactivated"));
        }

        self.payload_for(&user)
    }

    fn payload_for(&self, user: &users::Model) -> ApiResult<AuthPayload> {
        Ok(AuthPayload {
            token: self.tokens.issue(user.id, &user.email)?,
            user: UserView::from(user),
        })
    }
}
