//! Response submission (public) and response management (survey owner).

use crate::error::ApiError;
use crate::ip::extract_client_ip;
use crate::middleware::AuthUser;
use crate::responses::{ResponseService, SubmitInput};
use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(submit_response)
        .service(list_survey_responses)
        .service(view_survey_analytics)
        .service(view_response)
        .service(delete_response);
}

#[post("/api/responses/submit")]
pub async fn submit_response(
    req: HttpRequest,
    responses: web::Data<ResponseService>,
    form: web::Json<SubmitInput>,
) -> Result<HttpResponse, ApiError> {
    let ip_address = extract_client_ip(&req);
    let response = responses.submit(form.into_inner(), ip_address).await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/responses/survey/{survey_id}")]
pub async fn list_survey_responses(
    user: AuthUser,
    responses: web::Data<ResponseService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let list = responses.list_for_survey(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(list))
}

#[get("/api/responses/survey/{survey_id}/analytics")]
pub async fn view_survey_analytics(
    user: AuthUser,
    responses: web::Data<ResponseService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let analytics = responses.analytics(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(analytics))
}

#[get("/api/responses/{id}")]
pub async fn view_response(
    _user: AuthUser,
    responses: web::Data<ResponseService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let response = responses.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/api/responses/{id}")]
pub async fn delete_response(
    user: AuthUser,
    responses: web::Data<ResponseService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    responses.delete(path.into_inner(), user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
