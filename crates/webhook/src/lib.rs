//! Kit Return Webhook library.
//!
//! Receives Shippo tracking webhooks and, when an impression kit return is
//! delivered, tags the Shopify order, updates fulfillment tracking (which
//! emails the customer) and records a delivered timeline event.
//!
//! The binary in `main.rs` wires these modules into an axum server; the
//! library form lets the CLI and integration tests reuse them.
//!
//! # Security
//!
//! This crate holds the Shopify Admin API token. Inbound webhooks are not
//! signature-verified; deploy behind infrastructure that restricts callers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod resolve;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;

pub use config::WebhookConfig;
pub use routes::build_router;
pub use state::AppState;
