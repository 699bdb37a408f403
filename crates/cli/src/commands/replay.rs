//! Replay a stored webhook payload.
//!
//! # Usage
//!
//! ```bash
//! kr-cli replay payloads/delivered.json
//! ```
//!
//! Runs the same filter, cascade and mutations as `POST /shippo/webhook`.
//! Mutations are real: the order is tagged and the customer is notified.

use std::path::Path;

use kit_return_webhook::services::KitReturnOutcome;

use super::{CommandError, load_event, service_from_env};

/// Replay the payload at `path` against the configured store.
///
/// # Errors
///
/// Returns an error if the payload or configuration is invalid, or if a
/// Shopify request fails.
pub async fn run(path: &Path) -> Result<KitReturnOutcome, CommandError> {
    let event = load_event(path)?;
    let service = service_from_env()?;

    tracing::info!(payload = %path.display(), "Replaying webhook payload");
    let outcome = service.handle(&event).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("{outcome}");
    }

    Ok(outcome)
}
