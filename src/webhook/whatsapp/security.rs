//! Security utilities for WhatsApp webhook verification
//!
//! This module provides signature verification for incoming WhatsApp webhook requests
//! using the X-Hub-Signature-256 header. This ensures that requests actually originate
//! from Meta/Facebook and haven't been tampered with.
//!
//! # Security Background
//!
//! Meta signs all webhook payloads with HMAC-SHA256 using your app's secret key.
//! The signature is included in the `X-Hub-Signature-256` header with the format:
//! `sha256=<hex_signature>`
//!
//! To verify authenticity:
//! 1. Extract the signature from the X-Hub-Signature-256 header
//! 2. Compute HMAC-SHA256 of the raw request body using your app secret
//! 3. Decode both digests and compare them in constant time
//! 4. Only process the request if signatures match
//!
//! # Important Notes
//!
//! - The signature MUST be computed on the raw request body bytes, not parsed JSON
//! - The comparison must be constant-time to prevent timing attacks
//! - The header format is `sha256=<signature>` (lowercase)

use crate::{consts, errors::SignatureError};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 of `payload` keyed with `app_secret`.
fn hmac_hex(payload: &[u8], app_secret: &str) -> Result<String, SignatureError> {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes()).map_err(|e| {
        logfire::error!(
            "Failed to create HMAC instance: {error}",
            error = e.to_string()
        );
        SignatureError::MalformedSignature
    })?;

    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Builds the `X-Hub-Signature-256` header value Meta would send for `payload`.
pub fn sign(payload: &[u8], app_secret: &str) -> Result<String, SignatureError> {
    Ok(format!(
        "{}{}",
        consts::SIGNATURE_PREFIX,
        hmac_hex(payload, app_secret)?
    ))
}

/// Constant-time equality of two digests of the same length.
///
/// Callers must reject length mismatches before calling this.
fn digests_match(received: &[u8], computed: &[u8]) -> bool {
    received.ct_eq(computed).into()
}

/// Verifies the X-Hub-Signature-256 header against the request payload
///
/// # Arguments
///
/// * `signature_header` - The value of the X-Hub-Signature-256 header, if sent
/// * `payload` - The raw request body bytes
/// * `app_secret` - Your WhatsApp/Facebook app secret
///
/// # Returns
///
/// * `Ok(())` if the signature is valid
/// * `Err(SignatureError)` naming why it is not
///
/// # Security
///
/// This function uses constant-time comparison to prevent timing attacks.
/// It must run before the body is parsed.
pub fn verify_signature(
    signature_header: Option<&str>,
    payload: &[u8],
    app_secret: &str,
) -> Result<(), SignatureError> {
    let signature_header = signature_header.ok_or_else(|| {
        logfire::warn!("Missing X-Hub-Signature-256 header");
        SignatureError::MissingHeader
    })?;

    let received_hex = signature_header
        .strip_prefix(consts::SIGNATURE_PREFIX)
        .ok_or_else(|| {
            logfire::warn!("Invalid signature header format: expected 'sha256=' prefix");
            SignatureError::MalformedHeader
        })?;

    let computed_hex = hmac_hex(payload, app_secret)?;

    let (received, computed) = match (hex::decode(received_hex), hex::decode(&computed_hex)) {
        (Ok(received), Ok(computed)) if received.len() == computed.len() => (received, computed),
        (Err(e), _) | (_, Err(e)) => {
            logfire::warn!(
                "Failed to decode signature hex: {error}",
                error = e.to_string()
            );
            return Err(SignatureError::MalformedSignature);
        }
        (Ok(received), Ok(_)) => {
            logfire::warn!(
                "Signature has unexpected length: {length} bytes",
                length = i64::try_from(received.len()).unwrap_or(i64::MAX)
            );
            return Err(SignatureError::MalformedSignature);
        }
    };

    if !digests_match(&received, &computed) {
        logfire::warn!("Webhook signature verification failed: signatures do not match");
        return Err(SignatureError::Mismatch);
    }

    Ok(())
}
