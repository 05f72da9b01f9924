use axum::{routing::post, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/suggest-topics", post(handlers::suggest_topics))
        .route("/api/suggest-themes", post(handlers::suggest_themes))
        .route("/api/deep-research", post(handlers::deep_research))
        .route("/api/generate-article", post(handlers::generate_article))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Binds `addr` and serves until ctrl-c.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Server listening at http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;
    Ok(())
}

/// Resolves when `signal` fires. If the handler could not be installed it never
/// resolves, so the server keeps running instead of stopping at once.
async fn shutdown_on<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => tracing::info!("Shutting down"),
        Err(e) => {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

pub mod prelude {
    pub use bp_core::{Topic, Theme, Source, Result, Error};
    pub use crate::{create_app, serve, AppState};
}
