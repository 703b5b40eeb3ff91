use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use wq_core::Result;

pub mod cors;
pub mod handlers;
pub mod state;

pub use cors::CorsConfig;
pub use state::AppState;

pub fn create_app(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/generate_quiz", post(handlers::generate_quiz))
        .route("/history", get(handlers::history))
        .route("/quiz/:id", get(handlers::get_quiz))
        .layer(cors.layer())
        .with_state(Arc::new(state))
}

/// Serves `app` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌐 Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;
    tracing::info!("👋 Server stopped");
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState, CorsConfig};
    pub use wq_core::Result;
}
