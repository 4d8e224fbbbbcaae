//! # WhatsApp Auto-Reply Webhook
//!
//! Main entry point for the WhatsApp Cloud API webhook receiver.
//! Loads configuration, sets up logging and serves the webhook routes.

pub mod config;
pub mod consts;
pub mod errors;
pub mod metric;
pub mod webhook;

use envconfig::Envconfig;
use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use std::sync::Arc;
use webhook::whatsapp::client::{MessageSender, WhatsAppClient};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Local runs may keep settings in a .env file
    dotenvy::dotenv().ok();

    // Initialize configuration
    let app_config = config::AppConfig::init_from_env()?;

    // Initialize logging and metrics
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = app_config.logfire_token() {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    for setting in app_config.missing_settings() {
        logfire::warn!("{setting} is not configured", setting = setting.to_string());
    }

    let sender: Arc<dyn MessageSender> = Arc::new(WhatsAppClient::new(&app_config)?);
    let app_state = webhook::AppState::new(app_config, sender);

    configure_and_run_server(app_state).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures and starts the web server
async fn configure_and_run_server(app_state: webhook::AppState) -> anyhow::Result<()> {
    let server_addr = ("0.0.0.0", app_state.config.port);

    logfire::info!(
        "Starting webhook server ({env}) on port {port}",
        env = app_state.config.env.clone(),
        port = i64::from(server_addr.1)
    );

    web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .state(app_state.clone())
            .configure(webhook::routes::whatsapp)
            .default_service(web::route().to(errors::serve_not_found))
    })
    .bind(server_addr)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
