//! Configuration module for environment variable parsing.
//!
//! Everything the intake server needs is read once at startup from the
//! process environment.

use std::env;
use tracing::warn;

/// Default route the CMS is configured to deliver to.
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/contentful-webhook";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Route serving both the POST intake and the GET health probe
    pub webhook_path: String,

    /// Shared secret for HMAC-SHA256 signature verification.
    /// Verification is skipped entirely when unset.
    pub webhook_secret: Option<String>,

    /// Reject deliveries that carry no signature while a secret is configured.
    /// Off by default: unsigned deliveries are logged and processed.
    pub reject_unsigned: bool,

    /// Optional request body cap. Bodies of any size are accepted when unset.
    pub max_body_bytes: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
            webhook_secret: None,
            reject_unsigned: false,
            max_body_bytes: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_number("PORT", defaults.port),

            webhook_path: env::var("CONTENTFUL_WEBHOOK_PATH")
                .ok()
                .map(|p| p.trim().to_string())
                .filter(|p| p.starts_with('/'))
                .unwrap_or(defaults.webhook_path),

            webhook_secret: env::var("CONTENTFUL_WEBHOOK_SECRET").ok(),

            reject_unsigned: parse_bool("CONTENTFUL_WEBHOOK_REJECT_UNSIGNED", defaults.reject_unsigned),

            max_body_bytes: parse_optional_limit("MAX_BODY_BYTES").or(defaults.max_body_bytes),
        }
    }
}

/// Parse a numeric variable, warning and falling back on garbage.
fn parse_number<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(v) => v,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid number, using default");
            default
        }
    }
}

/// Parse an optional positive limit. Unset, zero or garbage means no limit.
fn parse_optional_limit(name: &str) -> Option<usize> {
    let raw = env::var(name).ok()?;

    match raw.trim().parse::<usize>() {
        Ok(0) => None,
        Ok(v) => Some(v),
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid limit, leaving unlimited");
            None
        }
    }
}

/// Parse a boolean flag such as "true", "1", "yes" or "on".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => true,
        "false" | "0" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean, using default");
            default
        }
    }
}
