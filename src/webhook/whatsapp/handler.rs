//! # WhatsApp Webhook Handler
//!
//! This module handles the business side of WhatsApp webhook deliveries:
//! the subscription handshake, pulling user messages out of an envelope and
//! scheduling one reply per message.

use super::{
    client::MessageSender,
    outgoing_schemas::{OutboundReply, ReplyConfig},
    schemas::{InboundMessage, VerifyQuery},
};
use crate::{
    consts,
    errors::{OutboundError, WebhookError},
    metric,
};
use serde_json::Value;
use std::sync::Arc;

/// Checks a subscription handshake and returns the challenge to echo back
///
/// # Arguments
///
/// * `query` - The `hub.*` query parameters sent by Meta
/// * `expected_token` - The configured verify token, if any
pub fn verify_subscription(
    query: &VerifyQuery,
    expected_token: Option<&str>,
) -> Result<String, WebhookError> {
    if query.mode.as_deref() != Some(consts::SUBSCRIBE_MODE) {
        logfire::warn!(
            "Invalid mode: expected 'subscribe', got '{mode}'",
            mode = query.mode.clone().unwrap_or_default()
        );
        return Err(WebhookError::VerificationFailed);
    }

    let Some(expected_token) = expected_token else {
        logfire::error!("WEBHOOK_VERIFY_TOKEN is not configured, refusing verification");
        return Err(WebhookError::VerificationFailed);
    };

    if query.verify_token.as_deref() != Some(expected_token) {
        logfire::warn!("Invalid verify token");
        return Err(WebhookError::VerificationFailed);
    }

    Ok(query.challenge.clone().unwrap_or_default())
}

/// Changes of the "messages" field, or nothing if this is not a WhatsApp envelope
fn message_changes(payload: &Value) -> impl Iterator<Item = &Value> {
    let is_whatsapp =
        payload.get("object").and_then(Value::as_str) == Some(consts::WHATSAPP_OBJECT);

    payload
        .get("entry")
        .and_then(Value::as_array)
        .filter(|_| is_whatsapp)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get("changes").and_then(Value::as_array))
        .flatten()
        .filter(|change| {
            change.get("field").and_then(Value::as_str) == Some(consts::MESSAGES_FIELD)
        })
        .filter_map(|change| change.get("value"))
}

/// Extracts the user messages of a webhook delivery
///
/// Only `whatsapp_business_account` envelopes are read. Missing or mistyped
/// fields at any level skip the affected part and never fail the delivery.
///
/// # Arguments
///
/// * `payload` - The parsed webhook body
///
/// # Returns
///
/// A lazy iterator over the messages in delivery order
pub fn extract_messages(payload: &Value) -> impl Iterator<Item = InboundMessage> + '_ {
    message_changes(payload)
        .filter_map(|value| value.get("messages").and_then(Value::as_array))
        .flatten()
        .filter_map(InboundMessage::from_value)
}

/// Counts status updates for sent messages
///
/// Statuses are only recognized, nothing is done with them.
pub fn count_statuses(payload: &Value) -> usize {
    message_changes(payload)
        .filter_map(|value| value.get("statuses").and_then(Value::as_array))
        .map(Vec::len)
        .sum()
}

/// Sends one reply in its own task
///
/// The task is detached: the caller never waits for it and its outcome is only logged.
fn spawn_reply(sender: Arc<dyn MessageSender>, reply: OutboundReply) {
    ntex::rt::spawn(async move {
        let to = reply.to.clone();
        match sender.send_text(reply).await {
            Ok(()) => {
                metric::incr_reply_statds("sent");
                logfire::info!("Reply sent to {to}", to = to);
            }
            Err(OutboundError::ConfigurationMissing(setting)) => {
                metric::incr_reply_statds("skipped");
                logfire::error!(
                    "Reply not sent, {setting} is not configured",
                    setting = setting.to_string()
                );
            }
            Err(e) => {
                metric::incr_reply_statds("failed");
                logfire::error!("Failed to send reply: {error}", error = e.to_string());
            }
        }
    });
}

/// Schedules a reply for every message of the delivery
///
/// # Returns
///
/// The number of replies scheduled
pub fn dispatch_replies(
    messages: impl Iterator<Item = InboundMessage>,
    sender: &Arc<dyn MessageSender>,
    reply_config: &ReplyConfig,
) -> usize {
    let mut scheduled = 0;
    for message in messages {
        logfire::info!(
            "Message received from {from}: {message_id}",
            from = message.from.clone(),
            message_id = message.id.clone().unwrap_or_default()
        );
        spawn_reply(
            Arc::clone(sender),
            OutboundReply::for_message(&message, reply_config),
        );
        scheduled += 1;
    }

    scheduled
}

/// Main webhook processor
///
/// Parses an authenticated body and schedules the replies. Never fails: a
/// malformed body is logged and treated as a delivery without messages.
///
/// # Arguments
///
/// * `body` - The raw request body, already verified
/// * `sender` - Client used by the reply tasks
/// * `reply_config` - Reply text settings
///
/// # Returns
///
/// The number of replies scheduled
pub fn process_delivery(
    body: &[u8],
    sender: &Arc<dyn MessageSender>,
    reply_config: &ReplyConfig,
) -> usize {
    let payload: Value = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            logfire::error!("Malformed webhook payload: {error}", error = e.to_string());
            return 0;
        }
    };

    let object = payload
        .get("object")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if object != consts::WHATSAPP_OBJECT {
        logfire::info!("Ignoring webhook for object '{object}'", object = object.to_string());
        return 0;
    }

    let statuses = count_statuses(&payload);
    if statuses > 0 {
        logfire::debug!(
            "Ignoring {count} status updates",
            count = i64::try_from(statuses).unwrap_or(i64::MAX)
        );
    }

    dispatch_replies(extract_messages(&payload), sender, reply_config)
}
