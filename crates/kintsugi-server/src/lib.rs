pub mod error;
pub mod limit;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    build_router_with_state(state::AppState::new(root))
}

pub fn build_router_with_state(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Profiles
        .route("/api/profiles", post(routes::profiles::create_profile))
        .route("/api/profiles/{id}", get(routes::profiles::get_profile))
        // Progression engine operations
        .route("/api/profiles/{id}/checkin", post(routes::checkin::checkin))
        .route(
            "/api/profiles/{id}/anxiety",
            post(routes::anxiety::record_anxiety),
        )
        .route(
            "/api/profiles/{id}/activities",
            post(routes::activities::record_activity),
        )
        // Derived vessel state
        .route("/api/profiles/{id}/vessel", get(routes::vessel::get_vessel))
        // Cross-device sync
        .route("/api/profiles/{id}/sync", post(routes::sync::sync_profile))
        // Daily koan (static guidance fallback)
        .route("/api/koan", get(routes::koan::get_koan))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the API server.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener).await
}

/// Start the API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(root: PathBuf, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("kintsugi API server listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
