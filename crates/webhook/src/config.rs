//! Webhook configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_TOKEN` - Shopify Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3000)
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-07)
//! - `SHOPIFY_ADMIN_ENDPOINT` - Full GraphQL endpoint URL, overrides store/version
//! - `FALLBACK_ORDER_GID` - Order used when webhook metadata names none
//! - `FALLBACK_FULFILLMENT_ID` - Fulfillment used when webhook metadata names none
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `LOG_FORMAT` - `json` for structured logs, `text` otherwise (default: text)
//!
//! ## Optional (kit return behavior)
//! - `KIT_RETURN_TAG` - Tag added to the order (default: `kit_return_received`)
//! - `KIT_RETURN_CARRIER` - Tracking company label (default: `Kit Return`)
//! - `KIT_RETURN_PLACEHOLDER_TRACKING` - Number used when Shippo sends none (default: `KIT-RETURN`)
//! - `KIT_RETURN_EVENT_MESSAGE` - Timeline event message (default: `Impression kit returned`)
//! - `KIT_RETURN_NOTIFY_CUSTOMER` - Send the Shopify shipping email (default: true)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use kit_return_core::{FulfillmentId, OrderGid};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const DEFAULT_API_VERSION: &str = "2025-07";

/// Tag added to the order once the kit is back.
pub const DEFAULT_KIT_RETURN_TAG: &str = "kit_return_received";
/// Tracking company label; notification templates branch on it.
pub const DEFAULT_CARRIER_NAME: &str = "Kit Return";
/// Tracking number used when the webhook carries none.
pub const DEFAULT_PLACEHOLDER_TRACKING: &str = "KIT-RETURN";
/// Message on the fulfillment timeline event.
pub const DEFAULT_EVENT_MESSAGE: &str = "Impression kit returned";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Webhook application configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify Admin API configuration
    pub shopify: ShopifyAdminConfig,
    /// Identifiers used when webhook metadata names none
    pub fallback: FallbackIdentifiers,
    /// Values written to Shopify for a returned kit
    pub kit_return: KitReturnSettings,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
    /// Log output format
    pub log_format: LogFormat,
}

/// Shopify Admin API configuration.
///
/// Implements `Debug` manually to redact the HIGH PRIVILEGE access token.
#[derive(Clone)]
pub struct ShopifyAdminConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2025-07)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - full store access)
    pub access_token: SecretString,
    /// Explicit GraphQL endpoint, used instead of the store URL
    pub endpoint_override: Option<Url>,
}

impl std::fmt::Debug for ShopifyAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyAdminConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field(
                "endpoint_override",
                &self.endpoint_override.as_ref().map(Url::as_str),
            )
            .finish()
    }
}

impl ShopifyAdminConfig {
    /// GraphQL endpoint for Admin API calls.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        self.endpoint_override.as_ref().map_or_else(
            || {
                format!(
                    "https://{}/admin/api/{}/graphql.json",
                    self.store, self.api_version
                )
            },
            |url| url.as_str().to_string(),
        )
    }
}

/// Identifiers used when webhook metadata does not name the order or
/// fulfillment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackIdentifiers {
    /// Value of `FALLBACK_ORDER_GID`
    pub order_gid: Option<OrderGid>,
    /// Value of `FALLBACK_FULFILLMENT_ID`
    pub fulfillment_id: Option<FulfillmentId>,
}

/// Values written to Shopify when a kit return is delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitReturnSettings {
    /// Tag added to the order
    pub tag: String,
    /// Tracking company label
    pub carrier_name: String,
    /// Tracking number used when the webhook has none
    pub placeholder_tracking_number: String,
    /// Fulfillment timeline event message
    pub event_message: String,
    /// Whether Shopify should email the customer on tracking update
    pub notify_customer: bool,
}

impl Default for KitReturnSettings {
    fn default() -> Self {
        Self {
            tag: DEFAULT_KIT_RETURN_TAG.to_string(),
            carrier_name: DEFAULT_CARRIER_NAME.to_string(),
            placeholder_tracking_number: DEFAULT_PLACEHOLDER_TRACKING.to_string(),
            event_message: DEFAULT_EVENT_MESSAGE.to_string(),
            notify_customer: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event, for log aggregation
    Json,
}

impl WebhookConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    ///
    /// # Errors
    ///
    /// Same as [`WebhookConfig::from_env`].
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let host = env
            .or_default("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("HOST".to_string(), e.to_string()))?;
        let port = env
            .or_default("PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;

        let shopify = ShopifyAdminConfig::from_env(&env)?;
        let fallback = FallbackIdentifiers::from_env(&env)?;
        let kit_return = KitReturnSettings::from_env(&env)?;

        let log_format = match env.optional("LOG_FORMAT").as_deref() {
            None | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'json' or 'text', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            shopify,
            fallback,
            kit_return,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env
                .optional("SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            sentry_traces_sample_rate: env
                .optional("SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1.0),
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyAdminConfig {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let store = env.required("SHOPIFY_STORE")?;
        if store.contains("://") || store.contains('/') {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPIFY_STORE".to_string(),
                "must be a bare domain such as your-store.myshopify.com".to_string(),
            ));
        }

        let endpoint_override = env
            .optional("SHOPIFY_ADMIN_ENDPOINT")
            .map(|raw| {
                Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("SHOPIFY_ADMIN_ENDPOINT".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            store,
            api_version: env.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            access_token: env.validated_secret("SHOPIFY_TOKEN")?,
            endpoint_override,
        })
    }
}

impl FallbackIdentifiers {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let order_gid = env
            .optional("FALLBACK_ORDER_GID")
            .map(|raw| {
                OrderGid::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("FALLBACK_ORDER_GID".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let fulfillment_id = env
            .optional("FALLBACK_FULFILLMENT_ID")
            .map(|raw| {
                FulfillmentId::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("FALLBACK_FULFILLMENT_ID".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            order_gid,
            fulfillment_id,
        })
    }
}

impl KitReturnSettings {
    fn from_env<F: Fn(&str) -> Option<String>>(env: &Env<F>) -> Result<Self, ConfigError> {
        let notify_customer = match env.optional("KIT_RETURN_NOTIFY_CUSTOMER") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "KIT_RETURN_NOTIFY_CUSTOMER".to_string(),
                    format!("expected true/false, got '{raw}'"),
                )
            })?,
        };

        Ok(Self {
            tag: env.or_default("KIT_RETURN_TAG", DEFAULT_KIT_RETURN_TAG),
            carrier_name: env.or_default("KIT_RETURN_CARRIER", DEFAULT_CARRIER_NAME),
            placeholder_tracking_number: env
                .or_default("KIT_RETURN_PLACEHOLDER_TRACKING", DEFAULT_PLACEHOLDER_TRACKING),
            event_message: env.or_default("KIT_RETURN_EVENT_MESSAGE", DEFAULT_EVENT_MESSAGE),
            notify_customer,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with blank values treated as unset.
struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real access tokens are random hex)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token Shopify issued."
            ),
        ));
    }

    Ok(())
}
