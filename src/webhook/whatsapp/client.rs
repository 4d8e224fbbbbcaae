//! # WhatsApp API Client
//!
//! This module provides a client for sending replies to WhatsApp Business API.
//! It handles bearer authentication and posting text messages to the Graph API.

use super::outgoing_schemas::{OutboundReply, OutgoingTextMessage, WhatsAppMessageResponse};
use crate::{config::AppConfig, errors::OutboundError};
use async_trait::async_trait;

/// Sends replies to WhatsApp users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Attempts to deliver one text message. No retries.
    async fn send_text(&self, reply: OutboundReply) -> Result<(), OutboundError>;
}

/// WhatsApp API client for sending messages
pub struct WhatsAppClient {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// WhatsApp Business API endpoint for sending messages
    endpoint: Option<String>,
    /// Authentication token
    auth_token: Option<String>,
}

impl WhatsAppClient {
    /// Creates a new WhatsApp client
    ///
    /// Missing credentials do not fail here; every send is skipped instead so
    /// the webhook keeps acknowledging deliveries.
    pub fn new(app_config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(app_config.graph_api_timeout())
            .build()?;

        Ok(Self {
            client,
            endpoint: app_config.whatsapp_send_msg_endpoint(),
            auth_token: app_config.graph_api_token().map(String::from),
        })
    }

    /// Sends a text message
    ///
    /// # Arguments
    /// * `reply` - Recipient's WhatsApp ID and the message text
    ///
    /// # Returns
    /// * `Result<WhatsAppMessageResponse, OutboundError>` - Response from WhatsApp API
    pub async fn send_text_message(
        &self,
        reply: OutboundReply,
    ) -> Result<WhatsAppMessageResponse, OutboundError> {
        let message = OutgoingTextMessage::from(reply);
        self.send_message(&message).await
    }

    /// Internal method to send any message type to WhatsApp API
    async fn send_message<T: serde::Serialize>(
        &self,
        message: &T,
    ) -> Result<WhatsAppMessageResponse, OutboundError> {
        let auth_token = self
            .auth_token
            .as_deref()
            .ok_or(OutboundError::ConfigurationMissing("GRAPH_API_TOKEN"))?;
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or(OutboundError::ConfigurationMissing("BUSINESS_PHONE_NUMBER_ID"))?;

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(auth_token)
            .header("Content-Type", "application/json")
            .json(message)
            .send()
            .await
            .map_err(|e| {
                OutboundError::DeliveryFailed(format!(
                    "Failed to send request to WhatsApp API: {e}"
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            return Err(OutboundError::DeliveryFailed(format!(
                "WhatsApp API returned error status {status}: {body}"
            )));
        }

        // the message was accepted, an unreadable body only costs the log line
        Ok(response
            .json::<WhatsAppMessageResponse>()
            .await
            .unwrap_or_default())
    }
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    #[tracing::instrument(skip_all)]
    async fn send_text(&self, reply: OutboundReply) -> Result<(), OutboundError> {
        let response = self.send_text_message(reply).await?;

        logfire::debug!(
            "Reply accepted by WhatsApp API: {message_id}",
            message_id = response.message_id().unwrap_or("unknown").to_string()
        );

        Ok(())
    }
}
