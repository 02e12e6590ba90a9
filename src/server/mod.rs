use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::graphql::{build_schema, GameGraphSchema};
use crate::storage::SqliteStore;

pub mod routes;

/// Server state
pub struct AppState {
    pub schema: GameGraphSchema,
}

/// Build the HTTP router: playground on `/`, GraphQL on `/query`
pub fn router(schema: GameGraphSchema) -> Router {
    let state = Arc::new(AppState { schema });

    Router::new()
        .route("/", get(routes::playground))
        .route("/query", get(routes::playground).post(routes::graphql))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(settings: &Settings, store: SqliteStore) -> anyhow::Result<()> {
    let schema = build_schema(store, settings.page_size);
    let app = router(schema);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Starting server on {}", addr);
    println!("🌍 GraphQL playground at http://localhost:{}/", settings.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
