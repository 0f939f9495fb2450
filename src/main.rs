use actix_web::HttpServer;
use std::io;
use taskvault::{app, db, AppState, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        log::error!("invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let pool = db::connect(&config.database_url).await.map_err(|e| {
        log::error!("failed to open database {}: {}", config.database_url, e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    let state = AppState::new(pool, config.clone());

    log::info!("Starting taskvault server at {}", config.server_url());
    HttpServer::new(move || app(state.clone()))
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await
}
