//! TeamOrg Backend
//!
//! Team organization service: users, roles and an event feed kept in one
//! persisted document, with server-side table shaping and modal forms.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod render;
mod state;
mod ticker;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::DocumentStore;
use state::SharedState;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,
    pub config: Arc<Config>,
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

    tracing::info!("Starting TeamOrg Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Storage key: {}", config.storage_key);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database and load the document
    let pool = db::init_database(&config.db_path).await?;
    let store = DocumentStore::new(pool, config.storage_key.clone());
    let document = store.initialize_if_absent().await?;
    tracing::info!(
        "Loaded document at revision {} ({} users, {} roles, {} events)",
        document.revision_id,
        document.users.data.len(),
        document.roles.data.len(),
        document.events.data.len()
    );

    let shared = Arc::new(SharedState::new(document, store));

    match config.tick_interval {
        Some(period) => {
            tracing::info!("Read-by ticker every {:?}", period);
            ticker::spawn(shared.clone(), period);
        }
        None => tracing::warn!("Read-by ticker disabled (TEAMORG_TICK_SECS=0)"),
    }

    // Create application state
    let state = AppState {
        shared,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

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

    // API routes
    let api_routes = Router::new()
        // Document
        .route("/document", get(api::get_document))
        .route("/document", delete(api::clear_document))
        .route("/document/revision", get(api::get_revision))
        .route("/document/import", post(api::import_document))
        // Session
        .route("/state", get(api::get_state))
        .route("/navigate", post(api::navigate))
        .route("/select", post(api::select))
        // Tables
        .route("/tables/{collection}", get(api::get_table))
        .route("/tables/{collection}/sort", post(api::sort_table))
        .route("/tables/{collection}/columns", get(api::column_menu))
        .route("/tables/{collection}/columns/reset", post(api::reset_columns))
        .route("/tables/{collection}/columns/{index}", put(api::set_column_visibility))
        // Feed
        .route("/feed", get(api::get_feed))
        .route("/feed/sort", put(api::set_feed_sort))
        // Modal
        .route("/modal/open", post(api::open_modal))
        .route("/modal/apply", post(api::apply_modal))
        .route("/modal/cancel", post(api::cancel_modal))
        .route("/entries/delete", post(api::delete_selected))
        // Icons
        .route("/icons", get(api::list_icons));

    let view_routes = Router::new().route("/views/{collection}", get(api::get_view));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(view_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
