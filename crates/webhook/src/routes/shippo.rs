//! Shippo webhook route.

use axum::{Json, extract::State};
use kit_return_core::DeliveryEvent;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{error::AppError, state::AppState};

/// Receive a Shippo tracking webhook.
///
/// Answers 200 for ignored, skipped and processed events alike; Shippo only
/// needs to know whether to redeliver. A failed Shopify call answers 500.
/// Any well-formed JSON body is accepted; one that is not a delivered
/// tracking update is ignored.
#[instrument(skip_all)]
pub async fn webhook(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<&'static str, AppError> {
    let event = DeliveryEvent::from_json(body);
    let outcome = state.kit_returns().handle(&event).await?;
    debug!(%outcome, "Webhook handled");
    Ok("OK")
}
