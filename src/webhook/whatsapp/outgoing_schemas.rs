//! # WhatsApp Outgoing Message Schemas
//!
//! This module contains data structures for sending messages to WhatsApp Business API.
//! These schemas define the JSON payload structure for the text replies this service sends.

use super::schemas::InboundMessage;
use crate::consts;
use serde::{Deserialize, Serialize};

/// Reply text settings, taken from [`crate::config::AppConfig`]
#[derive(Debug, Clone)]
pub struct ReplyConfig {
    /// Prepended to the echoed body
    pub prefix: String,
    /// Sent when the inbound message carries no text
    pub fallback: String,
}

/// A reply owed to one inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    /// Recipient's WhatsApp ID, the sender of the inbound message
    pub to: String,
    /// Reply text
    pub text: String,
}

impl OutboundReply {
    /// Builds the automated reply for an inbound message
    pub fn for_message(message: &InboundMessage, reply_config: &ReplyConfig) -> Self {
        let text = match &message.text {
            Some(body) => format!("{}{}", reply_config.prefix, body),
            None => reply_config.fallback.clone(),
        };

        Self {
            to: message.from.clone(),
            text,
        }
    }
}

/// Text message to send to WhatsApp
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextMessage {
    /// Messaging product, always "whatsapp"
    pub messaging_product: String,
    /// Recipient type, always "individual"
    pub recipient_type: String,
    /// Recipient's WhatsApp ID (phone number)
    pub to: String,
    /// Message type
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Text content
    pub text: OutgoingTextContent,
}

impl OutgoingTextMessage {
    /// Creates a new text message
    pub fn new(to: String, body: String) -> Self {
        Self {
            messaging_product: consts::MESSAGING_PRODUCT.to_string(),
            recipient_type: consts::RECIPIENT_TYPE_INDIVIDUAL.to_string(),
            to,
            msg_type: consts::TEXT_MESSAGE_TYPE.to_string(),
            text: OutgoingTextContent { body },
        }
    }
}

impl From<OutboundReply> for OutgoingTextMessage {
    fn from(reply: OutboundReply) -> Self {
        Self::new(reply.to, reply.text)
    }
}

/// Text content for outgoing messages
#[derive(Debug, Serialize, Deserialize)]
pub struct OutgoingTextContent {
    /// Message body text
    pub body: String,
}

/// Response from WhatsApp API when sending a message
///
/// Only used for logging, so every field tolerates absence.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WhatsAppMessageResponse {
    /// Messaging product
    #[serde(default)]
    pub messaging_product: Option<String>,
    /// Array of contacts (recipients)
    #[serde(default)]
    pub contacts: Vec<WhatsAppContact>,
    /// Array of messages sent
    #[serde(default)]
    pub messages: Vec<WhatsAppMessageStatus>,
}

impl WhatsAppMessageResponse {
    /// ID of the first accepted message, if the API returned one
    pub fn message_id(&self) -> Option<&str> {
        self.messages.first().map(|m| m.id.as_str())
    }
}

/// Contact information in response
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsAppContact {
    /// WhatsApp ID of the contact
    pub wa_id: String,
    /// Input phone number
    pub input: String,
}

/// Message status in response
#[derive(Debug, Serialize, Deserialize)]
pub struct WhatsAppMessageStatus {
    /// Message ID
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reply_config() -> ReplyConfig {
        ReplyConfig {
            prefix: "Echo: ".to_string(),
            fallback: "text only".to_string(),
        }
    }

    #[test]
    fn test_reply_echoes_text() {
        let message = InboundMessage {
            id: None,
            from: "1555".to_string(),
            text: Some("hi".to_string()),
        };

        assert_eq!(
            OutboundReply::for_message(&message, &reply_config()),
            OutboundReply {
                to: "1555".to_string(),
                text: "Echo: hi".to_string(),
            }
        );
    }

    #[test]
    fn test_reply_fallback_without_text() {
        let message = InboundMessage {
            id: Some("wamid.1".to_string()),
            from: "1555".to_string(),
            text: None,
        };

        let reply = OutboundReply::for_message(&message, &reply_config());
        assert_eq!(reply.to, "1555");
        assert_eq!(reply.text, "text only");
    }

    #[test]
    fn test_outgoing_text_message_wire_format() {
        let message = OutgoingTextMessage::from(OutboundReply {
            to: "1555".to_string(),
            text: "Echo: hi".to_string(),
        });

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "1555",
                "type": "text",
                "text": { "body": "Echo: hi" }
            })
        );
    }

    #[test]
    fn test_message_response_is_lenient() {
        let response: WhatsAppMessageResponse = serde_json::from_value(json!({
            "messaging_product": "whatsapp",
            "contacts": [{ "input": "1555", "wa_id": "1555" }],
            "messages": [{ "id": "wamid.OUT" }]
        }))
        .unwrap();
        assert_eq!(response.message_id(), Some("wamid.OUT"));

        let empty: WhatsAppMessageResponse = serde_json::from_value(json!({})).unwrap();
        assert!(empty.message_id().is_none());
    }
}
