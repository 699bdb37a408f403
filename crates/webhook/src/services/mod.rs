//! Business logic services.
//!
//! # Services
//!
//! - `kit_return` - Delivered-kit orchestration (cascade + Shopify mutations)

pub mod kit_return;

pub use kit_return::{KitReturnOutcome, KitReturnService};
