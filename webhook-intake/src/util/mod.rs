//! Small shared helpers.

pub mod time;

pub use time::now_iso8601;
