use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::HttpServer;
use anyhow::Context;

use medishare::config::Config;
use medishare::databases::setup_backend;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let pool = setup_backend(&config).await?;
    log::info!("✅ Database ready");

    let bind_addr = (config.host.clone(), config.port);
    log::info!("🚀 Listening on http://{}:{}", bind_addr.0, bind_addr.1);

    let app_pool = pool.clone();
    HttpServer::new(move || {
        medishare::app(app_pool.clone(), config.clone())
            .wrap(Logger::default())
            .wrap(Cors::permissive())
    })
    .bind(bind_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server failed")?;

    pool.close().await;
    log::info!("Database pool closed, shutting down");
    Ok(())
}
