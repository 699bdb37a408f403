//! CLI command implementations.

pub mod replay;
pub mod resolve;

use std::path::Path;

use kit_return_core::DeliveryEvent;
use kit_return_webhook::{
    config::{ConfigError, WebhookConfig},
    services::KitReturnService,
    shopify::{AdminClient, AdminShopifyError},
};
use thiserror::Error;

/// Errors shared by the payload commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Payload file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that was requested.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Payload is not a valid webhook body.
    #[error("Invalid payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Environment configuration is incomplete.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A Shopify request failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),
}

/// Read and parse a stored webhook payload.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid JSON.
pub fn load_event(path: &Path) -> Result<DeliveryEvent, CommandError> {
    let body = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let body: serde_json::Value = serde_json::from_str(&body)?;
    Ok(DeliveryEvent::from_json(body))
}

/// Build the kit return service from the process environment.
fn service_from_env() -> Result<KitReturnService, CommandError> {
    let config = WebhookConfig::from_env()?;
    tracing::info!(store = %config.shopify.store, "Using Shopify store");
    let client = AdminClient::new(&config.shopify);
    Ok(KitReturnService::from_config(&config, client))
}
