//! Webhook event module.
//!
//! This module provides:
//! - The normalized event record built for every delivery
//! - Parsing of the Contentful custom payload envelope into that record
//!
//! ## Envelope
//!
//! ```text
//! {webhook:{event,environment,space,triggeredAt}, post:{...}, author:{...}, status:{...}}
//! ```

pub mod normalize;
pub mod types;

pub use types::{AuthorInfo, EntryInfo, ProcessedSummary, StatusInfo, WebhookEvent};
