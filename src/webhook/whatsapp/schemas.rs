//! # WhatsApp Webhook Schemas
//!
//! Data structures read out of WhatsApp Business API webhook deliveries.
//!
//! The envelope itself is kept as a [`serde_json::Value`] so that an unexpected
//! shape at any nesting level only drops the affected message instead of
//! failing the whole delivery. See [`super::handler::extract_messages`].

use serde::Deserialize;
use serde_json::Value;

/// Query parameters for webhook verification
///
/// Every field is optional so that incomplete requests are refused with 403
/// instead of failing query extraction.
#[derive(Debug, Default, Deserialize)]
pub struct VerifyQuery {
    /// The mode parameter, should be "subscribe"
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// The verification token from WhatsApp
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// The challenge string to echo back
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// A user message pulled out of a webhook delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Message ID, used to correlate logs
    pub id: Option<String>,
    /// Sender's WhatsApp ID (phone number)
    pub from: String,
    /// `text.body` when the message is a text message
    pub text: Option<String>,
}

impl InboundMessage {
    /// Reads one element of `value.messages`.
    ///
    /// Returns `None` when the sender is missing, since nothing can be replied to.
    pub fn from_value(message: &Value) -> Option<Self> {
        let from = message.get("from")?.as_str()?;

        Some(Self {
            id: message.get("id").and_then(Value::as_str).map(String::from),
            from: from.to_string(),
            text: message
                .get("text")
                .and_then(|text| text.get("body"))
                .and_then(Value::as_str)
                .map(String::from),
        })
    }
}
