//! Assistant Console
//!
//! Admin console for assistant records, backed by a SQLite document collection.

mod api;
mod config;
mod console;
mod db;
mod errors;
mod gateway;
mod models;

use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use console::Console;
use db::Repository;
use gateway::{RecordStore, TimeoutStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub console: Arc<Console>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Assistant Console");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Store timeout: {:?}", config.store_timeout);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let store: Arc<dyn RecordStore> = Arc::new(TimeoutStore::new(
        Repository::new(pool),
        config.store_timeout,
    ));
    let console = Arc::new(Console::new(store));

    // Initial load; a failure is shown in the console banner, not fatal.
    match console.refresh().await {
        Ok(()) => tracing::info!(
            "Loaded {} assistants",
            console.view().await.assistants.len()
        ),
        Err(e) => tracing::warn!("Initial load failed: {}", e),
    }

    // Build router
    let app = create_router(AppState { console });

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // JSON API routes
    let api_routes = Router::new()
        .route("/console", get(api::get_console))
        .route("/console/refresh", post(api::refresh_console))
        .route("/console/create-form", put(api::put_create_form))
        .route("/console/create", post(api::create_assistant))
        .route("/console/submit-create", post(api::submit_create))
        .route("/console/select/{id}", post(api::select_assistant))
        .route("/console/edit-form", put(api::put_edit_form))
        .route("/console/save", post(api::save_selected))
        .route("/console/cancel", post(api::cancel_edit))
        .route(
            "/assistants/{id}",
            patch(api::patch_assistant).delete(api::delete_assistant),
        );

    // HTML console
    let page_routes = Router::new()
        .route("/", get(api::console_page))
        .route("/console/create", post(api::create_form_post))
        .route("/console/select/{id}", post(api::select_post))
        .route("/console/save", post(api::save_post))
        .route("/console/cancel", post(api::cancel_post))
        .route("/console/delete/{id}", post(api::delete_post));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
