#[macro_use]
extern crate diesel;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;
use log::info;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seed;

/// Initializes `env_logger`, honouring `RUST_LOG` when set.
pub fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config::DEFAULT_LOG_FILTER),
    )
    .init();
}

pub async fn run() -> Result<()> {
    let settings = config::Settings::from_env()?;
    init_logging();
    let pool = db::create_connection_pool(&settings)?;
    for version in db::run_migrations(&pool)? {
        info!("applied migration {}", version);
    }
    let pool = web::Data::new(pool);
    info!("listening on {}", settings.bind_address);
    let server_pool = pool.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(server_pool.clone())
            .configure(routes::configure)
    })
    .bind(&settings.bind_address)?
    .run()
    .await?;
    info!("shutting down, releasing database pool");
    drop(pool);
    Ok(())
}
