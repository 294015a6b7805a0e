//! Route configuration and middleware.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn build_router(state: Arc<AppState>) -> Result<Router> {
    let cors = setup_cors(&state)?;

    // Multipart bodies carry the file plus form fields; leave headroom above
    // the largest accepted file.
    let body_limit = state
        .config
        .max_upload_size_bytes
        .max(state.config.max_audio_size_bytes)
        + 1024 * 1024;

    let router = Router::new()
        .route("/", get(handlers::pages::index))
        .route("/live", get(handlers::pages::live))
        .route("/health", get(handlers::health::health))
        .route("/upload", post(handlers::upload::upload))
        .route(
            "/create_conversation",
            post(handlers::conversation::create_conversation),
        )
        .route("/record", post(handlers::record::record))
        .route("/uploads", get(handlers::history::list_uploads))
        .route(
            "/conversations",
            get(handlers::history::list_conversations),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn setup_cors(state: &Arc<AppState>) -> Result<CorsLayer> {
    let origins = &state.config.cors_origins;

    if origins.iter().any(|o| o == "*") {
        // Refused in production by Config::validate.
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<_>>()?;

    Ok(CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(Any)
        .allow_headers(Any))
}
