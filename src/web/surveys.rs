//! Survey management for owners, plus the public read of a published survey.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::surveys::{CreateSurveyInput, SurveyService, UpdateSurveyInput};
use actix_web::{delete, get, patch, post, put, web, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Public route before the `{id}` routes.
    conf.service(view_public_survey)
        .service(list_surveys)
        .service(create_survey)
        .service(view_survey)
        .service(update_survey)
        .service(delete_survey)
        .service(publish_survey)
        .service(close_survey)
        .service(view_survey_stats);
}

#[get("/api/surveys/public/{id}")]
pub async fn view_public_survey(
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let survey = surveys.get_public(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(survey))
}

#[get("/api/surveys")]
pub async fn list_surveys(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(surveys.list_owned(user.id).await?))
}

#[post("/api/surveys")]
pub async fn create_survey(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    form: web::Json<CreateSurveyInput>,
) -> Result<HttpResponse, ApiError> {
    let survey = surveys.create(form.into_inner(), user.id).await?;
    Ok(HttpResponse::Created().json(survey))
}

#[get("/api/surveys/{id}")]
pub async fn view_survey(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let survey = surveys.get_owned(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(survey))
}

#[put("/api/surveys/{id}")]
pub async fn update_survey(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
    form: web::Json<UpdateSurveyInput>,
) -> Result<HttpResponse, ApiError> {
    let survey = surveys
        .update(path.into_inner(), form.into_inner(), user.id)
        .await?;
    Ok(HttpResponse::Ok().json(survey))
}

#[delete("/api/surveys/{id}")]
pub async fn delete_survey(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    surveys.delete(path.into_inner(), user.id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[patch("/api/surveys/{id}/publish")]
pub async fn publish_survey(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let survey = surveys.publish(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(survey))
}

#[patch("/api/surveys/{id}/close")]
pub async fn close_survey(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let survey = surveys.close(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(survey))
}

#[get("/api/surveys/{id}/stats")]
pub async fn view_survey_stats(
    user: AuthUser,
    surveys: web::Data<SurveyService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let stats = surveys.stats(path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(stats))
}
