//! Error kinds raised by the services and their HTTP rendering.
//!
//! Business-rule violations are raised as one of the typed variants and travel
//! unmodified to the boundary. Anything unexpected ends up as `Internal`, which
//! is logged and rendered with a generic message.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;

pub type ApiResult<T> = Result<T, ApiError>;

/// Message sent to clients in place of internal error details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Validation failure (400)
    BadRequest(String),
    /// Missing or invalid credentials, or a non-owner acting on a response (401)
    Unauthorized(String),
    /// Missing entity, or one not owned by the caller (404)
    NotFound(String),
    /// Survey past its expiration date (410)
    Gone(String),
    /// Anything unexpected (500). The message is only ever logged.
    Internal(String),
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn unauthorized<S: Into<String>>(msg: S) -> Self {
        ApiError::Unauthorized(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        ApiError::NotFound(msg.into())
    }

    pub fn gone<S: Into<String>>(msg: S) -> Self {
        ApiError::Gone(msg.into())
    }

    pub fn internal<S: Into<String>>(msg: S) -> Self {
        ApiError::Internal(msg.into())
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg)
            | ApiError::Gone(msg) => msg,
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Gone(msg) => write!(f, "Gone: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        ApiError::Internal(format!("database error: {}", e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("serialization error: {}", e))
    }
}

/// Uniform error body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Gone(_) => StatusCode::GONE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(detail) = self {
            log::error!("Unhandled error: {}", detail);
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            status: "error",
            message: self.public_message(),
        })
    }
}
