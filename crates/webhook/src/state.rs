//! Application state shared across handlers.

use std::sync::Arc;

use crate::{config::WebhookConfig, services::KitReturnService, shopify::AdminClient};

/// Application state shared across all handlers.
///
/// Read-only after startup; cloning is an `Arc` bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: WebhookConfig,
    kit_returns: KitReturnService,
}

impl AppState {
    /// Build state from configuration, creating the Shopify client.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        let shopify = AdminClient::new(&config.shopify);
        Self::with_client(config, shopify)
    }

    /// Build state around an existing Shopify client.
    #[must_use]
    pub fn with_client(config: WebhookConfig, shopify: AdminClient) -> Self {
        let kit_returns = KitReturnService::from_config(&config, shopify);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                kit_returns,
            }),
        }
    }

    /// Loaded configuration.
    #[must_use]
    pub fn config(&self) -> &WebhookConfig {
        &self.inner.config
    }

    /// Kit return orchestration service.
    #[must_use]
    pub fn kit_returns(&self) -> &KitReturnService {
        &self.inner.kit_returns
    }
}
