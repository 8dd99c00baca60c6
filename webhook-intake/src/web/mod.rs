//! Web server module for handling inbound Contentful webhooks.
//!
//! This module provides a single route that:
//! - Accepts POSTed deliveries and verifies their HMAC signature
//! - Normalizes the payload and logs it
//! - Answers GET with a liveness payload

pub mod handlers;
pub mod signature;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{
    contentful_webhook, handle_delivery, health, AppState, HealthResponse, WebhookResponse,
};
pub use signature::{
    check_signature, constant_time_compare, is_signature_verification_enabled,
    verify_contentful_signature, SignatureCheck, SIGNATURE_HEADER,
};

/// Build the router serving the webhook route.
pub fn app_router(state: AppState) -> Router {
    let path = state.config.webhook_path.clone();
    let body_limit = match state.config.max_body_bytes {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route(&path, get(health).post(contentful_webhook))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
