//! Read API server module
//!
//! Serves the locally synchronised catalogue over HTTP. The API never talks to
//! the upstream service; it only reads what the sync process has written.

use crate::Result;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Characters
/// - `GET /characters` - List stored character IDs, ascending
/// - `GET /characters/:id` - Get one character
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Characters
        .route("/characters", get(routes::list_characters))
        .route("/characters/:id", get(routes::get_character))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the API server on `bind_address`
///
/// Runs until `shutdown` is cancelled, then finishes in-flight requests and
/// returns.
///
/// # Example
///
/// ```no_run
/// use marvel_forwarder::api::{AppState, start_api_server};
/// use marvel_forwarder::db::Database;
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::connect("sqlite://data/marvel.db").await?;
/// let state = AppState::new(Arc::new(db));
///
/// // Serve until the token is cancelled
/// start_api_server(state, "127.0.0.1:8080".parse()?, CancellationToken::new()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    state: AppState,
    bind_address: SocketAddr,
    shutdown: CancellationToken,
) -> Result<()> {
    tracing::info!(
        address = %bind_address,
        "Starting API server"
    );

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    serve(listener, state, shutdown).await
}

/// Serve the API on an already bound listener until `shutdown` is cancelled
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    if let Ok(address) = listener.local_addr() {
        tracing::info!(
            address = %address,
            "API server listening"
        );
    }

    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
