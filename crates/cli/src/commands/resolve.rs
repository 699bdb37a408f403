//! Dry-run identifier resolution.
//!
//! # Usage
//!
//! ```bash
//! kr-cli resolve payloads/delivered.json
//! ```
//!
//! Read-only lookups (order by name, fulfillment parent) are sent to
//! Shopify; no mutation is.

use std::path::Path;

use kit_return_webhook::resolve::Identifiers;

use super::{CommandError, load_event, service_from_env};

/// Resolve the identifiers for the payload at `path`.
///
/// Returns `None` when the payload is not a delivered tracking update.
///
/// # Errors
///
/// Returns an error if the payload or configuration is invalid, or if a
/// lookup request fails.
pub async fn run(path: &Path) -> Result<Option<Identifiers>, CommandError> {
    let event = load_event(path)?;
    let service = service_from_env()?;

    let resolved = service.resolve_only(&event).await?;

    #[allow(clippy::print_stdout)]
    {
        match &resolved {
            None => println!("ignored: not a delivered tracking update"),
            Some(ids) => {
                println!("metadata:       {}", event.metadata().kind());
                println!("order_gid:      {}", display_or_missing(ids.order_gid.as_ref()));
                println!(
                    "fulfillment_id: {}",
                    display_or_missing(ids.fulfillment_id.as_ref())
                );
                if !ids.is_complete() {
                    println!("would skip: missing {}", ids.missing().join(", "));
                }
            }
        }
    }

    Ok(resolved)
}

fn display_or_missing<T: std::fmt::Display>(value: Option<&T>) -> String {
    value.map_or_else(|| "<missing>".to_string(), ToString::to_string)
}
