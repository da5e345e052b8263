use actix_files::Files;
use actix_web::body::BoxBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use sqlx::PgPool;

pub mod config;
pub mod databases;
pub mod error;
pub mod routes;
pub mod services;

use config::Config;

/// The full application: API routes, page routes, then every other file under
/// the static directory.
pub fn app(
    pool: PgPool,
    config: Config,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let static_dir = config.static_dir.clone();

    App::new()
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(config))
        .configure(routes::init)
        .service(Files::new("/", static_dir))
}
