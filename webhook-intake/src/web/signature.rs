//! Contentful webhook signature verification.
//!
//! Deliveries are signed with HMAC-SHA256 over the raw request body, keyed
//! with the shared webhook secret. The lowercase hex digest is sent in the
//! `x-contentful-webhook-signature` header.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::error::WebhookError;
use crate::Config;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded signature.
pub const SIGNATURE_HEADER: &str = "x-contentful-webhook-signature";

/// Outcome of the verification policy for a delivery that may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    /// Secret configured and the signature matched.
    Verified,
    /// Secret configured but the delivery carried no signature.
    Unsigned,
    /// No secret configured; verification skipped.
    Skipped,
}

/// Compute the expected hex signature for `body`.
pub fn compute_signature(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(_) => {
            warn!("contentful_signature_invalid_key");
            return None;
        }
    };

    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify a Contentful webhook signature.
///
/// The received signature is compared as-is against the lowercase hex
/// digest, so any other encoding of the right digest is rejected.
pub fn verify_contentful_signature(secret: &str, body: &[u8], signature: &[u8]) -> bool {
    let expected = match compute_signature(secret, body) {
        Some(s) => s,
        None => return false,
    };

    let valid = constant_time_compare(expected.as_bytes(), signature);

    if !valid {
        warn!(
            expected_length = expected.len(),
            actual_length = signature.len(),
            "contentful_signature_mismatch"
        );
    }

    valid
}

/// Constant-time byte comparison. Buffers of different length are unequal.
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Check if signature verification is enabled.
///
/// Only an empty secret disables it; a whitespace-only secret counts as configured.
pub fn is_signature_verification_enabled(secret: &Option<String>) -> bool {
    secret.as_ref().map(|s| !s.is_empty()).unwrap_or(false)
}

/// Read the signature header. An empty value counts as absent.
pub fn signature_from_headers(headers: &HeaderMap) -> Option<&[u8]> {
    headers
        .get(SIGNATURE_HEADER)
        .map(|v| v.as_bytes())
        .filter(|v| !v.is_empty())
}

/// Apply the verification policy to a delivery.
///
/// A configured secret with a missing signature is let through with a
/// warning unless `reject_unsigned` is set.
pub fn check_signature(
    config: &Config,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<SignatureCheck, WebhookError> {
    let secret = match config.webhook_secret.as_deref() {
        Some(s) if is_signature_verification_enabled(&config.webhook_secret) => s,
        _ => return Ok(SignatureCheck::Skipped),
    };

    match signature_from_headers(headers) {
        Some(signature) => {
            if !verify_contentful_signature(secret, body, signature) {
                warn!(payload_size = body.len(), "contentful_signature_invalid");
                return Err(WebhookError::InvalidSignature);
            }
            info!("contentful_signature_verified");
            Ok(SignatureCheck::Verified)
        }
        None if config.reject_unsigned => {
            warn!("contentful_signature_missing_rejected");
            Err(WebhookError::InvalidSignature)
        }
        None => {
            warn!("contentful_signature_missing");
            Ok(SignatureCheck::Unsigned)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "test-webhook-secret";
    const BODY: &[u8] = br#"{"webhook":{"event":"publish"}}"#;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    fn config_with_secret(secret: Option<&str>, reject_unsigned: bool) -> Config {
        Config {
            webhook_secret: secret.map(str::to_string),
            reject_unsigned,
            ..Config::default()
        }
    }

    fn headers_with_signature(signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(signature).unwrap());
        headers
    }

    #[test]
    fn test_verify_signature_valid() {
        let signature = sign(SECRET, BODY);
        assert!(verify_contentful_signature(SECRET, BODY, signature.as_bytes()));
    }

    #[test]
    fn test_verify_signature_wrong_secret() {
        let signature = sign("other-secret", BODY);
        assert!(!verify_contentful_signature(SECRET, BODY, signature.as_bytes()));
    }

    #[test]
    fn test_verify_signature_tampered_body() {
        let signature = sign(SECRET, BODY);
        assert!(!verify_contentful_signature(
            SECRET,
            br#"{"webhook":{"event":"unpublish"}}"#,
            signature.as_bytes()
        ));
    }

    #[test]
    fn test_verify_signature_truncated_and_uppercase() {
        let signature = sign(SECRET, BODY);
        assert!(!verify_contentful_signature(SECRET, BODY, signature[..10].as_bytes()));
        assert!(!verify_contentful_signature(
            SECRET,
            BODY,
            signature.to_uppercase().as_bytes()
        ));
        assert!(!verify_contentful_signature(SECRET, BODY, b""));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abd"));
        assert!(!constant_time_compare(b"abc", b"abcd"));
        assert!(constant_time_compare(b"", b""));
    }

    #[test]
    fn test_is_signature_verification_enabled() {
        assert!(!is_signature_verification_enabled(&None));
        assert!(!is_signature_verification_enabled(&Some("".to_string())));
        assert!(is_signature_verification_enabled(&Some("   ".to_string())));
        assert!(is_signature_verification_enabled(&Some("key123".to_string())));
    }

    #[test]
    fn test_signature_header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Contentful-Webhook-Signature",
            HeaderValue::from_static("abc"),
        );
        assert_eq!(signature_from_headers(&headers), Some(&b"abc"[..]));

        let mut empty = HeaderMap::new();
        empty.insert(SIGNATURE_HEADER, HeaderValue::from_static(""));
        assert_eq!(signature_from_headers(&empty), None);
    }

    #[test]
    fn test_check_signature_policy() {
        let valid = headers_with_signature(&sign(SECRET, BODY));
        let invalid = headers_with_signature("deadbeef");
        let none = HeaderMap::new();

        let permissive = config_with_secret(Some(SECRET), false);
        assert_eq!(
            check_signature(&permissive, &valid, BODY).unwrap(),
            SignatureCheck::Verified
        );
        assert!(matches!(
            check_signature(&permissive, &invalid, BODY),
            Err(WebhookError::InvalidSignature)
        ));
        assert_eq!(
            check_signature(&permissive, &none, BODY).unwrap(),
            SignatureCheck::Unsigned
        );

        let strict = config_with_secret(Some(SECRET), true);
        assert!(matches!(
            check_signature(&strict, &none, BODY),
            Err(WebhookError::InvalidSignature)
        ));

        let open = config_with_secret(None, true);
        assert_eq!(
            check_signature(&open, &invalid, BODY).unwrap(),
            SignatureCheck::Skipped
        );

        let empty_secret = config_with_secret(Some(""), false);
        assert_eq!(
            check_signature(&empty_secret, &invalid, BODY).unwrap(),
            SignatureCheck::Skipped
        );
    }
}
