use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::{
    auth,
    services::{analyze, health, method_not_allowed},
    state::AppState,
};
use crate::clients::{AnalyzerClient, BuilderClient};
use crate::config::Config;
use crate::workflow::WorkflowIdSource;

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Assemble the application router.
///
/// The analyze route is gated by the shared-token auth middleware; auth
/// runs before the method check, so a non-POST request still needs a
/// valid token to learn it used the wrong method. Health is open.
pub fn router(state: AppState) -> Router {
    let analyze_route = post(analyze)
        .fallback(method_not_allowed)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/api/analyze", analyze_route)
        .route("/api/health", get(health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // The funnel form calls this API straight from the browser
        .layer(CorsLayer::permissive())
}

pub async fn run(address: Option<SocketAddr>) -> Result<(), AnyError> {
    // Load config
    info!("Loading configuration");
    let config = Config::load().map_err(|e| format!("Failed to load config: {}", e))?;

    // CLI override wins over configuration
    let address = address.unwrap_or(config.server.bind_addr);

    let token = config.auth.service_token.clone();
    let analyzer = AnalyzerClient::new(&config.services, &config.timeouts, token.clone())
        .map_err(|e| format!("Failed to build analyzer client: {}", e))?;
    let builder = BuilderClient::new(&config.services, &config.timeouts, token)
        .map_err(|e| format!("Failed to build builder client: {}", e))?;

    let state = AppState::new(config, analyzer, builder, Arc::new(WorkflowIdSource));
    let app = router(state);

    let listener = TcpListener::bind(address).await?;
    info!(%address, "siteboost API listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate())
            .expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
