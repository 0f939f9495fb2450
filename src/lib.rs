#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "Authentication (token issuance, the bearer gate and the role gate), task"]
#![doc = "handlers, storage setup and error translation for the taskvault service."]
#![doc = "`main.rs` builds a [`Config`], opens the pool and serves [`app`]."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App,
};
use sqlx::SqlitePool;

pub use crate::auth::TokenService;
pub use crate::config::Config;
pub use crate::error::AppError;

/// Everything the request handlers share. Cheap to clone: the pool and the
/// signing keys are reference counted or small.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: TokenService,
    pub config: Config,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        Self {
            pool,
            tokens: TokenService::new(&config.jwt_secret),
            config,
        }
    }
}

/// Builds the application. Used by `main` for every worker and by the
/// integration tests.
pub fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into());
    // Ids that do not parse can not name an existing task.
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        log::debug!("unparseable path: {}", err);
        AppError::NotFound(error::TASK_NOT_FOUND.into()).into()
    });

    App::new()
        .app_data(web::Data::new(state.pool))
        .app_data(web::Data::new(state.tokens))
        .app_data(web::Data::new(state.config))
        .app_data(json_config)
        .app_data(path_config)
        .wrap(
            Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
        )
        .wrap(Logger::default())
        .configure(routes::config)
}
