//! HTTP route definitions

use crate::api::handlers;
use crate::error::Result;
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::post,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Result<Router> {
    let origins = state.settings.cors_origins()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .route("/chat", post(handlers::chat))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
