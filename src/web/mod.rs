pub mod auth;
pub mod index;
pub mod responses;
pub mod surveys;

use crate::app_config::AuthConfig;
use crate::auth::{AuthService, TokenService};
use crate::error::ApiError;
use crate::responses::ResponseService;
use crate::surveys::SurveyService;
use actix_cors::Cors;
use actix_web::web::{Data, JsonConfig, PathConfig, ServiceConfig};
use actix_web::HttpResponse;
use sea_orm::DatabaseConnection;

/// Services shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct Services {
    pub tokens: Data<TokenService>,
    pub auth: Data<AuthService>,
    pub surveys: Data<SurveyService>,
    pub responses: Data<ResponseService>,
}

impl Services {
    pub fn new(db: DatabaseConnection, config: &AuthConfig) -> Self {
        let tokens = TokenService::from_config(config);
        let surveys = SurveyService::new(db.clone());

        Self {
            auth: Data::new(AuthService::new(
                db.clone(),
                tokens.clone(),
                config.min_password_length,
            )),
            responses: Data::new(ResponseService::new(db, surveys.clone())),
            surveys: Data::new(surveys),
            tokens: Data::new(tokens),
        }
    }

    pub fn register(&self, conf: &mut ServiceConfig) {
        conf.app_data(self.tokens.clone())
            .app_data(self.auth.clone())
            .app_data(self.surveys.clone())
            .app_data(self.responses.clone());
    }
}

/// Configures the web app by adding services from each web file.
pub fn configure(conf: &mut ServiceConfig) {
    conf.app_data(json_config()).app_data(path_config());

    // Route resolution will stop at the first match.
    index::configure(conf);
    auth::configure(conf);
    responses::configure(conf);
    surveys::configure(conf);
}

/// Any origin may call the API, including preflighted requests with the
/// `Authorization` header.
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Malformed or mistyped JSON bodies become a 400 with the uniform body.
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected JSON body: {}", err);
        ApiError::bad_request(format!("Invalid request body: {}", err)).into()
    })
}

/// Path ids that are not integers cannot name an entity.
pub fn path_config() -> PathConfig {
    PathConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected path: {}", err);
        ApiError::not_found("Resource not found").into()
    })
}

pub async fn route_not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::not_found("Route not found"))
}
