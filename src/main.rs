//! HeartCheck Prediction Server
//!
//! Serves a pre-trained heart disease classifier over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    HEARTCHECK SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  POST /predict                                              │
//! │     │                                                       │
//! │     ▼                                                       │
//! │  ┌───────────┐   ┌───────────┐   ┌─────────────────────┐   │
//! │  │  Record   │──▶│  Encoder  │──▶│  Classifier         │   │
//! │  │  decode   │   │  + scaler │   │  (random forest)    │   │
//! │  └───────────┘   └───────────┘   └─────────────────────┘   │
//! │                        ▲                  ▲                 │
//! │                        └──── Artifacts ───┘                 │
//! │                      (loaded once at startup)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod features;
mod handlers;
mod model;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

use crate::features::layout::{layout_hash, FEATURE_VERSION};
use crate::model::ArtifactStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let json_logs = config.json_logs();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "heartcheck_server=debug,tower_http=debug".into()))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("HeartCheck Server starting...");
    tracing::info!(
        "Feature layout v{} (hash: {:08x})",
        FEATURE_VERSION,
        layout_hash()
    );

    // Load model artifacts (not fatal: /predict reports the failure)
    let artifacts = match ArtifactStore::load(&config.model_path, &config.scaler_path) {
        Ok(store) => {
            tracing::info!("Model and Scaler loaded successfully!");
            Some(Arc::new(store))
        }
        Err(e) => {
            tracing::error!("Error loading files: {}", e);
            None
        }
    };

    // Build application state
    let state = AppState {
        config: config.clone(),
        artifacts,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    /// `None` when loading failed at startup
    pub artifacts: Option<Arc<ArtifactStore>>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/", get(handlers::home::index))
        .route("/predict", post(handlers::predict::predict))
        .route("/health", get(handlers::health::check))
        .route("/api/model", get(handlers::model::info))
        .nest_service("/static", static_files)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
