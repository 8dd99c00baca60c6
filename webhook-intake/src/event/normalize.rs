//! Envelope normalization.
//!
//! Turns the raw delivery body into a [`WebhookEvent`]. Field access tolerates
//! a missing or non-object parent at every level; only the top level being
//! unparseable (or `null`) is an error. Field values are copied as sent.

use serde_json::Value;

use crate::error::WebhookError;
use crate::event::types::{AuthorInfo, EntryInfo, StatusInfo, WebhookEvent};

/// Parse the raw request body as JSON.
pub fn parse_envelope(body: &[u8]) -> Result<Value, WebhookError> {
    let envelope: Value =
        serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

    if envelope.is_null() {
        return Err(WebhookError::MalformedPayload(
            "payload must not be null".to_string(),
        ));
    }

    Ok(envelope)
}

impl WebhookEvent {
    /// Build the normalized record from a parsed envelope.
    pub fn from_envelope(envelope: &Value) -> Self {
        let webhook = envelope.get("webhook");
        let post = envelope.get("post");
        let author = envelope.get("author");
        let status = envelope.get("status");

        WebhookEvent {
            event: field(webhook, "event"),
            environment: field(webhook, "environment"),
            space: field(webhook, "space"),
            triggered_at: field(webhook, "triggeredAt"),
            entry: EntryInfo {
                id: field(post, "id"),
                content_type: field(post, "contentType"),
                slug: field(post, "slug"),
                title: field(post, "title"),
                summary: field(post, "summary"),
                excerpt: field(post, "excerpt"),
                published_at: field(post, "publishedAt"),
                version: field(post, "version"),
            },
            author: AuthorInfo {
                id: field(author, "id"),
                name: field(author, "name"),
            },
            status: StatusInfo {
                published: flag(status, "published"),
                archived: flag(status, "archived"),
            },
        }
    }
}

/// Read a field from an optional section, keeping its JSON value as sent.
fn field(section: Option<&Value>, key: &str) -> Option<Value> {
    section.and_then(|s| s.get(key)).cloned()
}

/// String-typed boolean: only the exact string "true" counts.
fn flag(section: Option<&Value>, key: &str) -> bool {
    matches!(section.and_then(|s| s.get(key)), Some(Value::String(s)) if s == "true")
}
