use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use localfreelance_backend::ai::AiEngine;
use localfreelance_backend::ai::tags::ImageTagger;
use localfreelance_backend::auth::jwt::TokenIssuer;
use localfreelance_backend::cache::{CacheConfig, RedisCache};
use localfreelance_backend::config::AppConfig;
use localfreelance_backend::error::ApiError;
use localfreelance_backend::handlers;
use localfreelance_backend::notify::{LogNotifier, Notifier};
use localfreelance_backend::create_pool;
use migration::{Migrator, MigratorTrait};
use std::io;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(|e| io::Error::other(e.to_string()))?;

    let db = create_pool(&config.database_url)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to database: {e}")))?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .map_err(|e| io::Error::other(format!("Failed to run migrations: {e}")))?;
        tracing::info!("Migrations applied");
    }
    let db_data = web::Data::new(db);

    // Initialize Redis cache
    let redis_cache = RedisCache::new(&config.redis_url)
        .await
        .map_err(|e| io::Error::other(format!("Failed to connect to Redis: {e}")))?;
    let redis_data = web::Data::new(Arc::new(redis_cache));
    let cache_config = web::Data::new(CacheConfig::from_app_config(&config));
    tracing::info!("Connected to Redis");

    let ai = AiEngine::from_config(&config.ai).unwrap_or_else(|e| {
        tracing::warn!("AI backend unavailable, using local fallbacks: {e}");
        AiEngine::disabled()
    });
    let ai_data = web::Data::new(ai);
    let tagger = ImageTagger::new(config.ai.timeout)
        .map_err(|e| io::Error::other(format!("Failed to build image tagger: {e}")))?;
    let tagger_data = web::Data::new(tagger);

    let issuer_data = web::Data::new(TokenIssuer::new(&config.jwt));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let notifier_data = web::Data::new(notifier);

    let cors_origin = config.cors_allowed_origin.clone();
    let bind_addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => Cors::default().allowed_origin(origin),
            None => Cors::default().allow_any_origin(),
        }
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::ACCEPT,
        ])
        .max_age(3600);

        let json_config = web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());
        let query_config = web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(json_config)
            .app_data(query_config)
            .app_data(db_data.clone())
            .app_data(redis_data.clone())
            .app_data(cache_config.clone())
            .app_data(issuer_data.clone())
            .app_data(ai_data.clone())
            .app_data(tagger_data.clone())
            .app_data(notifier_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
