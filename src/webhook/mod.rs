//! Webhook handlers for external integrations
//!
//! This module contains the webhook endpoint handlers and the state they share.
//!
//! ## Modules
//!
//! - [`whatsapp`] - WhatsApp Business API webhook handlers

pub mod routes;
pub mod whatsapp;

use crate::config::AppConfig;
use std::sync::Arc;
use whatsapp::{client::MessageSender, outgoing_schemas::ReplyConfig};

/// State shared by every worker, read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sender: Arc<dyn MessageSender>,
    pub reply_config: ReplyConfig,
}

impl AppState {
    pub fn new(config: AppConfig, sender: Arc<dyn MessageSender>) -> Self {
        let reply_config = ReplyConfig {
            prefix: config.reply_prefix.clone(),
            fallback: config.reply_fallback.clone(),
        };

        Self {
            config: Arc::new(config),
            sender,
            reply_config,
        }
    }
}
