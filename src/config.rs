//! Application configuration management with security considerations.
//!
//! All values are read once from the environment at startup and then shared
//! read-only with the request handlers and the outbound client.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - Empty sensitive values are treated as absent

use envconfig::Envconfig;
use std::time::Duration;

/// Application configuration with security-aware field management.
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(from = "ENV", default = "local")]
    pub env: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(from = "PORT", default = "3000")]
    pub port: u16,

    /// 🔒 SENSITIVE: Token configured in the Meta dashboard for the subscription handshake
    #[envconfig(from = "WEBHOOK_VERIFY_TOKEN")]
    pub verify_token: Option<String>,

    /// 🔒 SENSITIVE: App secret used as the HMAC key for `X-Hub-Signature-256`
    #[envconfig(from = "APP_SECRET")]
    pub app_secret: Option<String>,

    /// 🔒 SENSITIVE: Bearer token for the Graph API
    #[envconfig(from = "GRAPH_API_TOKEN")]
    pub graph_api_token: Option<String>,

    /// WhatsApp Business phone number ID replies are sent from (SEMI-SENSITIVE)
    #[envconfig(from = "BUSINESS_PHONE_NUMBER_ID")]
    pub business_phone_number_id: Option<String>,

    /// Graph API host (NON-SENSITIVE)
    #[envconfig(from = "GRAPH_API_BASE_URL", default = "https://graph.facebook.com")]
    pub graph_api_base_url: String,

    /// Graph API version segment (NON-SENSITIVE)
    #[envconfig(from = "GRAPH_API_VERSION", default = "v19.0")]
    pub graph_api_version: String,

    /// Request timeout for outbound sends, in seconds (NON-SENSITIVE)
    #[envconfig(from = "GRAPH_API_TIMEOUT_SECS", default = "30")]
    pub graph_api_timeout_secs: u64,

    /// Text prepended to the echoed message body
    #[envconfig(from = "REPLY_PREFIX", default = "Echo: ")]
    pub reply_prefix: String,

    /// Reply used when the inbound message has no text body
    #[envconfig(
        from = "REPLY_FALLBACK",
        default = "Sorry, I can only reply to text messages."
    )]
    pub reply_fallback: String,

    /// 🔒 SENSITIVE: Logfire write token, logs stay local when absent
    #[envconfig(from = "LOGFIRE_TOKEN")]
    pub logfire_token: Option<String>,
}

/// Returns the value untouched when it is set and not blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn verify_token(&self) -> Option<&str> {
        non_empty(&self.verify_token)
    }

    pub fn app_secret(&self) -> Option<&str> {
        non_empty(&self.app_secret)
    }

    pub fn graph_api_token(&self) -> Option<&str> {
        non_empty(&self.graph_api_token)
    }

    pub fn business_phone_number_id(&self) -> Option<&str> {
        non_empty(&self.business_phone_number_id)
    }

    pub fn logfire_token(&self) -> Option<&str> {
        non_empty(&self.logfire_token)
    }

    pub fn graph_api_timeout(&self) -> Duration {
        Duration::from_secs(self.graph_api_timeout_secs)
    }

    /// Constructs the WhatsApp Business API endpoint for sending messages
    ///
    /// Returns `None` when no phone number id is configured.
    pub fn whatsapp_send_msg_endpoint(&self) -> Option<String> {
        self.business_phone_number_id().map(|id| {
            format!(
                "{base}/{version}/{id}/messages",
                base = self.graph_api_base_url.trim_end_matches('/'),
                version = self.graph_api_version,
            )
        })
    }

    /// Names of the settings that are absent, so startup can warn about them.
    pub fn missing_settings(&self) -> Vec<&'static str> {
        [
            ("WEBHOOK_VERIFY_TOKEN", self.verify_token().is_none()),
            ("APP_SECRET", self.app_secret().is_none()),
            ("GRAPH_API_TOKEN", self.graph_api_token().is_none()),
            (
                "BUSINESS_PHONE_NUMBER_ID",
                self.business_phone_number_id().is_none(),
            ),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}
