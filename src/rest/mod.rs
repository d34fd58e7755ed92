//! REST API for the Listed business directory.
//!
//! Exposes the onboarding wizard, the public listing surface and the admin
//! review endpoints over HTTP, with Swagger UI for exploration.

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod dto;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod session;
pub mod state;

pub use openapi::ApiDoc;
pub use session::SessionId;
pub use state::ApiState;

/// Default port for the REST API server
pub const DEFAULT_PORT: u16 = 8680;

/// Build the API router with all routes
pub fn build_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/api/v1/health", get(routes::health::health))
        .route("/api/v1/status", get(routes::health::status))
        // Onboarding wizard endpoints
        .route(
            "/api/v1/onboarding/step/:n",
            get(routes::onboarding::enter_step),
        )
        .route(
            "/api/v1/onboarding/step/:n",
            post(routes::onboarding::submit_step),
        )
        .route("/api/v1/onboarding/review", get(routes::onboarding::review))
        .route(
            "/api/v1/onboarding/submit",
            post(routes::onboarding::submit_final),
        )
        .route(
            "/api/v1/onboarding/abandon",
            post(routes::onboarding::abandon),
        )
        .route(
            "/api/v1/onboarding/confirmation/:slug",
            get(routes::onboarding::confirmation),
        )
        // Public listing endpoints
        .route("/api/v1/listings", get(routes::listings::list))
        .route("/api/v1/listings/:slug", get(routes::listings::detail))
        // Admin endpoints
        .route("/api/v1/admin/listings", get(routes::admin::list))
        .route(
            "/api/v1/admin/listings/:slug/approve",
            post(routes::admin::approve),
        )
        .route(
            "/api/v1/admin/listings/:slug/reject",
            post(routes::admin::reject),
        )
        .route(
            "/api/v1/admin/listings/:slug/feature",
            post(routes::admin::feature),
        )
        .route(
            "/api/v1/admin/listings/:slug/unfeature",
            post(routes::admin::unfeature),
        )
        .route(
            "/api/v1/admin/listings/:slug/verify",
            post(routes::admin::verify),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server, shutting down cleanly on ctrl-c.
pub async fn serve(state: ApiState, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!("REST API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutting down");
        })
        .await?;

    Ok(())
}
