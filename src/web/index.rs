use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index);
}

#[get("/")]
pub async fn view_index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Surveyor API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth",
            "surveys": "/api/surveys",
            "responses": "/api/responses"
        }
    }))
}
