use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use taskboard::{
    auth::{AuthMiddleware, IdentityBroker, SessionCookie},
    config::Config,
    routes::{self, health},
    store::{BoardStore, MemoryStore, PgStore},
    AppError, BoardService,
};

/// `DATABASE_URL` value that selects the process-local store.
const MEMORY_DATABASE_URL: &str = "memory://";

async fn open_store(config: &Config) -> Result<Arc<dyn BoardStore>, AppError> {
    if config.database_url == MEMORY_DATABASE_URL {
        log::warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let store = PgStore::connect(config).await?;
    store.migrate().await?;
    Ok(Arc::new(store))
}

fn to_io(error: AppError) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, error.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(to_io)?;
    let store = open_store(&config).await.map_err(to_io)?;

    let identity = Arc::new(IdentityBroker::from_config(&config).map_err(to_io)?);
    let service = web::Data::new(BoardService::new(store, identity.clone()));
    let identity = web::Data::from(identity);
    let session = web::Data::new(SessionCookie::new(config.cookie_secure));
    let cors_origin = config.cors_origin.clone();

    log::info!("Starting task board server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(identity.clone())
            .app_data(session.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&cors_origin)
                    .allow_any_method()
                    .allow_any_header()
                    .supports_credentials()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
