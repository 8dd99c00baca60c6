//! Error taxonomy for webhook intake.
//!
//! Every failure is converted into a JSON response at the handler boundary.
//! Missing envelope fields are not errors; see [`crate::event::normalize`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::util::now_iso8601;

/// Failures that terminate processing of a delivery.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A signature was supplied (or required) and did not match.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The body could not be parsed into an envelope.
    #[error("{0}")]
    MalformedPayload(String),

    /// The body could not be read, e.g. it exceeded the configured cap.
    #[error("{0}")]
    UnreadableBody(String),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::InvalidSignature => StatusCode::UNAUTHORIZED,
            WebhookError::MalformedPayload(_) | WebhookError::UnreadableBody(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// 401 body.
#[derive(Debug, Serialize)]
pub struct UnauthorizedResponse {
    pub error: &'static str,
}

/// 500 body.
#[derive(Debug, Serialize)]
pub struct FailureResponse {
    pub error: &'static str,
    pub message: String,
    pub timestamp: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            WebhookError::InvalidSignature => (
                status,
                Json(UnauthorizedResponse {
                    error: "Invalid signature",
                }),
            )
                .into_response(),
            WebhookError::MalformedPayload(message) | WebhookError::UnreadableBody(message) => (
                status,
                Json(FailureResponse {
                    error: "Webhook processing failed",
                    message,
                    timestamp: now_iso8601(),
                }),
            )
                .into_response(),
        }
    }
}
