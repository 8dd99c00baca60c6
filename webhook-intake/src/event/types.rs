//! Normalized webhook event types.
//!
//! Every field sourced from the envelope is optional. A missing section or
//! field is carried as `None` and never replaced with a default. Present
//! values are kept as the raw JSON the sender rendered, whatever its type,
//! and serialized back unchanged.

use serde::Serialize;
use serde_json::Value;

/// Content type whose deliveries get the extra post diagnostic.
pub const POST_CONTENT_TYPE: &str = "post";

/// Normalized record of a single webhook delivery.
///
/// Built fresh per request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// CMS action, e.g. `publish` or `unpublish`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub space: Option<Value>,
    /// Producer-supplied ISO-8601 timestamp, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<Value>,
    pub entry: EntryInfo,
    pub author: AuthorInfo,
    pub status: StatusInfo,
}

/// The `post` section of the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
}

/// The `author` section of the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
}

/// Publication flags.
///
/// Contentful renders these through its payload template as strings, so a
/// flag is only set when the raw value is exactly `"true"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusInfo {
    pub published: bool,
    pub archived: bool,
}

/// Reduced projection of a [`WebhookEvent`] returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub published: bool,
}

impl WebhookEvent {
    /// True when the delivery concerns a blog post entry.
    pub fn is_post(&self) -> bool {
        self.entry.content_type.as_ref().and_then(Value::as_str) == Some(POST_CONTENT_TYPE)
    }

    /// Project the fields echoed back in the acknowledgment.
    pub fn summary(&self) -> ProcessedSummary {
        ProcessedSummary {
            event: self.event.clone(),
            post_id: self.entry.id.clone(),
            slug: self.entry.slug.clone(),
            title: self.entry.title.clone(),
            published: self.status.published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_serialization_omits_absent_fields() {
        let summary = WebhookEvent::default().summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json, json!({ "published": false }));
    }

    #[test]
    fn test_summary_uses_camel_case() {
        let event = WebhookEvent {
            event: Some(json!("publish")),
            entry: EntryInfo {
                id: Some(json!("abc123")),
                slug: Some(json!("hello-world")),
                title: Some(json!("Hello World")),
                ..Default::default()
            },
            status: StatusInfo {
                published: true,
                archived: false,
            },
            ..Default::default()
        };

        let json = serde_json::to_string(&event.summary()).unwrap();
        assert!(json.contains("\"postId\":\"abc123\""));
        assert!(json.contains("\"published\":true"));
    }

    #[test]
    fn test_summary_echoes_non_string_values() {
        let event = WebhookEvent {
            entry: EntryInfo {
                id: Some(json!(42)),
                title: Some(Value::Null),
                ..Default::default()
            },
            ..Default::default()
        };

        let json = serde_json::to_value(event.summary()).unwrap();
        assert_eq!(json, json!({ "postId": 42, "title": null, "published": false }));
    }

    #[test]
    fn test_is_post() {
        let mut event = WebhookEvent::default();
        assert!(!event.is_post());

        event.entry.content_type = Some(json!("author"));
        assert!(!event.is_post());

        event.entry.content_type = Some(json!(["post"]));
        assert!(!event.is_post());

        event.entry.content_type = Some(json!("post"));
        assert!(event.is_post());
    }
}
