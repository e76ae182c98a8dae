//! Bearer token authentication for protected routes.

use crate::auth::TokenService;
use crate::error::{ApiError, ApiResult};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web::Data, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

/// Identity of the caller, taken from a verified bearer token.
///
/// Adding this extractor to a handler makes the route require authentication.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i32,
    pub email: String,
}

impl AuthUser {
    pub fn from_request_headers(req: &HttpRequest) -> ApiResult<Self> {
        let tokens = req
            .app_data::<Data<TokenService>>()
            .ok_or_else(|| ApiError::internal("TokenService is not registered as app data"))?;

        let value = req
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| ApiError::unauthorized("Token not provided"))?;
        let value = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("Invalid token format"))?;

        let claims = tokens.verify(parse_bearer(value)?)?;
        Ok(Self {
            id: claims.id,
            email: claims.email,
        })
    }
}

/// Accepts exactly `Bearer <token>`.
pub fn parse_bearer(value: &str) -> ApiResult<&str> {
    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        ["Bearer", token] if !token.is_empty() => Ok(*token),
        _ => Err(ApiError::unauthorized("Invalid token format")),
    }
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Self::from_request_headers(req))
    }
}
