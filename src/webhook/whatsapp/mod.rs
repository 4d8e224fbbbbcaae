//! WhatsApp webhook integration module
//!
//! This module provides webhook handling for WhatsApp Business API integration.
//! It includes both the HTTP route handlers and the logic for authenticating
//! deliveries and replying to incoming messages.
//!
//! ## Submodules
//!
//! - [`security`] - `X-Hub-Signature-256` verification
//! - [`handler`] - Handshake check, message extraction and reply dispatch
//! - [`routes`] - HTTP endpoint handlers for WhatsApp webhooks
//! - [`schemas`] - Data structures read from webhook payloads
//! - [`outgoing_schemas`] - Data structures sent to the Graph API
//! - [`client`] - WhatsApp API client for sending messages

pub mod client;
pub mod handler;
pub mod outgoing_schemas;
pub mod routes;
pub mod schemas;
pub mod security;

// Re-export commonly used items for convenience
pub use routes::{receive, verify};
