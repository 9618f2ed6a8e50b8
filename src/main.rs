use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use arcana::config::AppConfig;
use arcana::db;
use arcana::handlers;
use arcana::models::Vocabulary;
use arcana::services::assistant::{ChatEngine, Collaborators};
use arcana::services::clock::{Clock, SystemClock};
use arcana::services::directory::DirectoryCache;
use arcana::services::scripture::bible_api::BibleApiProvider;
use arcana::services::sqlite::SqliteStore;
use arcana::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env()?;

    let vocabulary = Vocabulary::load(config.vocabulary_path.as_deref())?;
    tracing::info!(
        version = vocabulary.version,
        triggers = vocabulary.triggers.len(),
        intents = vocabulary.intents.len(),
        "vocabulary loaded"
    );

    let conn = db::init_db(&config.database_url)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(SqliteStore::new(
        Arc::new(Mutex::new(conn)),
        clock.clone(),
        config.timezone,
    ));

    let directory = Arc::new(DirectoryCache::new(
        store.clone(),
        clock.clone(),
        chrono::Duration::seconds(config.directory_ttl_secs),
    ));
    let scripture = Arc::new(BibleApiProvider::new(
        config.scripture_api_url.clone(),
        config.scripture_translation.clone(),
        vocabulary.scripture_topics.clone(),
        clock.clone(),
        config.timezone,
    ));
    tracing::info!(
        url = %config.scripture_api_url,
        translation = %config.scripture_translation,
        "using scripture provider"
    );

    let engine = ChatEngine::new(
        &vocabulary,
        Collaborators {
            directory,
            schedule: store.clone(),
            catalog: store.clone(),
            scripture,
            store,
        },
        clock,
        config.timezone,
    )?;

    let state = Arc::new(AppState {
        config: config.clone(),
        engine: Arc::new(engine),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/chat/message", post(handlers::chat::post_message))
        .route(
            "/api/admin/directory/invalidate",
            post(handlers::admin::invalidate_directory),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
