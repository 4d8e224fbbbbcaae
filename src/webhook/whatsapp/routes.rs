//! WhatsApp webhook endpoint handlers
//!
//! This module handles incoming webhook requests from WhatsApp Business API.
//! It implements both the verification endpoint (GET) and the webhook receiver (POST).
//!
//! # Security
//!
//! The POST endpoint verifies the `X-Hub-Signature-256` HMAC over the raw body
//! before anything is parsed, so only deliveries signed with the app secret
//! are processed.

use super::{handler, schemas, security};
use crate::{consts, errors::WebhookError, metric, webhook::AppState};
use ntex::{util::Bytes, web};

/// Webhook verification endpoint (GET)
///
/// WhatsApp sends a GET request to verify the webhook URL.
/// This endpoint validates the verify token and returns the challenge.
///
/// # Query Parameters
/// - `hub.mode` - Should be "subscribe"
/// - `hub.verify_token` - Token configured in WhatsApp dashboard
/// - `hub.challenge` - Challenge string to echo back
///
/// # Returns
/// - 200 with challenge string if verification succeeds
/// - 403 if verification fails
#[web::get("")]
pub async fn verify(
    query: web::types::Query<schemas::VerifyQuery>,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let challenge = handler::verify_subscription(&query, app_state.config.verify_token())?;

    logfire::info!("Webhook verification successful");

    Ok(web::HttpResponse::Ok()
        .content_type("text/plain")
        .body(challenge))
}

/// Webhook receiver endpoint (POST)
///
/// Receives webhook events from WhatsApp Business API.
///
/// # Processing
///
/// The signature is checked against the raw body, then the body is parsed
/// and one reply task is spawned per message. The 200 is returned without
/// waiting for any reply to be sent.
///
/// # Returns
/// - 200 with an empty body once the delivery is authenticated
/// - 401 if the signature is missing or invalid
/// - 500 if `APP_SECRET` is not configured
#[web::post("")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let _span = logfire::span!("whatsapp_webhook").entered();

    let Some(app_secret) = app_state.config.app_secret() else {
        metric::incr_webhook_statds("misconfigured");
        return Err(WebhookError::ConfigurationMissing("APP_SECRET").into());
    };

    // non UTF-8 header values cannot carry the expected prefix
    let signature_header = req
        .headers()
        .get(consts::SIGNATURE_HEADER)
        .map(|value| value.to_str().unwrap_or_default());

    if let Err(e) = security::verify_signature(signature_header, &body, app_secret) {
        metric::incr_webhook_statds("rejected");
        return Err(WebhookError::from(e).into());
    }

    let scheduled = handler::process_delivery(&body, &app_state.sender, &app_state.reply_config);

    logfire::info!(
        "Webhook acknowledged with {count} replies scheduled",
        count = i64::try_from(scheduled).unwrap_or(i64::MAX)
    );
    metric::incr_webhook_statds("acknowledged");

    Ok(web::HttpResponse::Ok().finish())
}
