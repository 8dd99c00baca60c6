//! Webhook endpoint handlers.
//!
//! The intake handler runs the whole delivery lifecycle synchronously:
//! 1. Verify the signature (per the configured policy)
//! 2. Parse and normalize the envelope
//! 3. Log the event and acknowledge with a reduced projection
//!
//! Nothing is retained between requests.

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::error::WebhookError;
use crate::event::normalize::parse_envelope;
use crate::event::{ProcessedSummary, WebhookEvent};
use crate::util::now_iso8601;
use crate::web::signature::{check_signature, signature_from_headers};
use crate::Config;

/// Endpoint name reported by the health probe.
pub const ENDPOINT_NAME: &str = "contentful-webhook";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub endpoint: &'static str,
    pub timestamp: String,
}

/// Health check endpoint, served as GET on the webhook route.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        endpoint: ENDPOINT_NAME,
        timestamp: now_iso8601(),
    })
}

// =============================================================================
// Contentful Webhook
// =============================================================================

/// Acknowledgment for a processed delivery.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub processed: ProcessedSummary,
}

/// Contentful webhook endpoint.
///
/// Takes the raw body so the signature is computed over the exact bytes
/// that were sent. A body that cannot be read is answered in the same JSON
/// shape as any other processing failure.
pub async fn contentful_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = body
        .map_err(|rejection| WebhookError::UnreadableBody(rejection.body_text()))
        .and_then(|body| handle_delivery(&state.config, &headers, &body));

    match result {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) => {
            error!(
                status = e.status_code().as_u16(),
                error = %e,
                timestamp = %now_iso8601(),
                "webhook_processing_failed"
            );
            e.into_response()
        }
    }
}

/// Run one delivery through verification, parsing and normalization.
pub fn handle_delivery(
    config: &Config,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookResponse, WebhookError> {
    info!(
        timestamp = %now_iso8601(),
        has_signature = signature_from_headers(headers).is_some(),
        payload_size = body.len(),
        "webhook_received"
    );
    debug!(headers = ?headers, "webhook_headers");

    let check = check_signature(config, headers, body)?;
    debug!(signature_check = ?check, "webhook_signature_checked");

    let envelope = parse_envelope(body)?;
    debug!(payload = %envelope, "webhook_payload");

    let event = WebhookEvent::from_envelope(&envelope);

    info!(
        event = %log_field(&event.event),
        title = %log_field(&event.entry.title),
        slug = %log_field(&event.entry.slug),
        published = event.status.published,
        author = %log_field(&event.author.name),
        "webhook_parsed"
    );

    if event.is_post() {
        info!(
            event = %log_field(&event.event),
            title = %log_field(&event.entry.title),
            slug = %log_field(&event.entry.slug),
            author = %log_field(&event.author.name),
            published = event.status.published,
            version = %log_field(&event.entry.version),
            "post_webhook_received"
        );
    }

    Ok(WebhookResponse {
        status: "success",
        timestamp: now_iso8601(),
        processed: event.summary(),
    })
}

/// Render a pass-through field for log lines. Strings are shown bare.
fn log_field(value: &Option<Value>) -> Cow<'_, str> {
    match value {
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(other) => Cow::Owned(other.to_string()),
        None => Cow::Borrowed(""),
    }
}
