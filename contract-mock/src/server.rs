//! Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::state::SharedRegistry;

pub fn create_router(registry: SharedRegistry) -> Router {
    // Front-end runs on another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Contract views
        .route("/listings", get(get_all_listings))
        .route("/owners/:account/listings", get(get_owner_listings))
        // Contract write
        .route("/purchases", post(submit_purchase))
        // Dev helper endpoints
        .route("/dev/listings", post(seed_listing))
        .route("/dev/confirm", post(confirm_pending))
        // Shared state
        .with_state(registry)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Serve on an already bound listener
pub async fn serve(listener: TcpListener, registry: SharedRegistry) -> anyhow::Result<()> {
    axum::serve(listener, create_router(registry)).await?;
    Ok(())
}

pub async fn run_server(registry: SharedRegistry, host: String, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    log::info!("Contract gateway mock listening on http://{}", addr);
    log::info!("Confirm pending purchases with: POST /dev/confirm");

    serve(listener, registry).await
}
