//! Registration and login endpoints.

use crate::auth::{AuthService, LoginInput, RegisterInput};
use crate::error::ApiError;
use actix_web::{post, web, HttpResponse};
use serde::Serialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(register).service(login);
}

/// Success envelope of the auth endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub message: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    fn success(message: &'static str, data: T) -> Self {
        Self {
            status: "success",
            message,
            data,
        }
    }
}

#[post("/api/auth/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    form: web::Json<RegisterInput>,
) -> Result<HttpResponse, ApiError> {
    let payload = auth.register(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(Envelope::success("User registered successfully", payload)))
}

#[post("/api/auth/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    form: web::Json<LoginInput>,
) -> Result<HttpResponse, ApiError> {
    let payload = auth.login(form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(Envelope::success("Login successful", payload)))
}
