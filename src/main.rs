use std::sync::{Arc, Mutex};

use anyhow::Context;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use trailbook::config::AppConfig;
use trailbook::db;
use trailbook::services::catalog::Catalog;
use trailbook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    anyhow::ensure!(!config.api_key.is_empty(), "API_KEY must not be empty");
    if config.api_key == "changeme" {
        tracing::warn!("API_KEY is the default value, set it before exposing the server");
    }

    let conn = db::init_db(&config.database_url)?;

    let today = chrono::Utc::now().date_naive();
    let catalog = Catalog::demo(today, config.catalog_days, &mut rand::thread_rng());
    tracing::info!(
        services = catalog.all().len(),
        days = config.catalog_days,
        "generated demo catalog"
    );

    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .context("CORS_ORIGIN is not a valid header value")?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        catalog,
    });

    let app = trailbook::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr} (prefix {:?})", config.api_prefix);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
