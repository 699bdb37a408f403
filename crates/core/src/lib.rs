//! Kit Return Core - Shared types library.
//!
//! This crate provides the types used across the kit return components:
//! - `webhook` - Shippo webhook receiver that updates Shopify
//! - `cli` - Operator tools for replaying stored payloads
//!
//! # Architecture
//!
//! The core crate contains only types and pure parsing - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Shippo payloads, webhook metadata, Shopify GIDs and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
