//! Core types for the kit return webhook.
//!
//! This module provides type-safe wrappers for the domain concepts shared
//! between the webhook service and the CLI.

pub mod id;
pub mod metadata;
pub mod shippo;
pub mod status;

pub use id::{FulfillmentId, GidError, OrderGid};
pub use metadata::Metadata;
pub use shippo::{DeliveryEvent, ShippoEvent, TrackingData, TrackingStatus, TrackingStatusInfo};
pub use status::FulfillmentEventStatus;
