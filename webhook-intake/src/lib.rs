//! Contentful webhook intake for the blog front-end.
//!
//! The CMS posts a custom JSON envelope whenever an entry changes. This crate
//! authenticates the delivery, normalizes it into a [`WebhookEvent`] and
//! acknowledges it.
//!
//! ## Flow
//!
//! ```text
//! POST → signature check → parse → normalize → log → 200 {processed}
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod util;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::WebhookError;
pub use event::{ProcessedSummary, WebhookEvent};
pub use web::{app_router, AppState};
