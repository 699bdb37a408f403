//! Kit return orchestration.
//!
//! Turns a Shippo "delivered" webhook into three Shopify mutations, in this
//! order:
//!
//! 1. `tagsAdd` on the order
//! 2. `fulfillmentTrackingInfoUpdate` with `notifyCustomer` (this is what
//!    sends the customer email)
//! 3. `fulfillmentEventCreate` with status `DELIVERED`
//!
//! User errors from any mutation are logged and the sequence continues. A
//! transport or GraphQL failure stops the sequence and propagates. Nothing
//! already applied is rolled back.

use chrono::{DateTime, SecondsFormat, Utc};
use kit_return_core::{DeliveryEvent, FulfillmentEventStatus, FulfillmentId, OrderGid};
use tracing::{info, instrument, warn};

use crate::config::{FallbackIdentifiers, KitReturnSettings, WebhookConfig};
use crate::resolve::{Identifiers, ResolutionContext, ResolvedIdentifiers, resolve_identifiers};
use crate::shopify::{
    AdminClient, AdminShopifyError, FulfillmentEventInput, TrackingInfoInput, UserError,
    format_user_errors,
};

/// What happened to a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitReturnOutcome {
    /// Not a `track_updated` / `DELIVERED` event; nothing was called.
    Ignored,
    /// Identifiers could not be resolved; no mutation was attempted.
    Skipped {
        /// Names of the identifiers that stayed empty.
        missing: Vec<&'static str>,
    },
    /// All three mutations were sent.
    Completed {
        /// Order that was tagged.
        order_gid: OrderGid,
        /// Fulfillment that was updated.
        fulfillment_id: FulfillmentId,
        /// User errors reported along the way.
        user_errors: Vec<UserError>,
    },
}

impl std::fmt::Display for KitReturnOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignored => write!(f, "ignored (not a delivered tracking update)"),
            Self::Skipped { missing } => write!(f, "skipped (missing {})", missing.join(", ")),
            Self::Completed {
                order_gid,
                fulfillment_id,
                user_errors,
            } if user_errors.is_empty() => {
                write!(f, "completed for {order_gid} / {fulfillment_id}")
            }
            Self::Completed {
                order_gid,
                fulfillment_id,
                user_errors,
            } => write!(
                f,
                "completed for {order_gid} / {fulfillment_id} with {} user error(s): {}",
                user_errors.len(),
                format_user_errors(user_errors)
            ),
        }
    }
}

/// Handles kit return deliveries against one Shopify store.
#[derive(Debug, Clone)]
pub struct KitReturnService {
    shopify: AdminClient,
    settings: KitReturnSettings,
    fallback: FallbackIdentifiers,
}

impl KitReturnService {
    /// Create a new service.
    #[must_use]
    pub const fn new(
        shopify: AdminClient,
        settings: KitReturnSettings,
        fallback: FallbackIdentifiers,
    ) -> Self {
        Self {
            shopify,
            settings,
            fallback,
        }
    }

    /// Create a service from loaded configuration.
    #[must_use]
    pub fn from_config(config: &WebhookConfig, shopify: AdminClient) -> Self {
        Self::new(shopify, config.kit_return.clone(), config.fallback.clone())
    }

    /// Process one webhook delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if any Shopify request fails. Mutations sent before
    /// the failure stay applied.
    #[instrument(skip(self, event), fields(tracking_number = event.tracking_number()))]
    pub async fn handle(&self, event: &DeliveryEvent) -> Result<KitReturnOutcome, AdminShopifyError> {
        let Some(identifiers) = self.resolve_only(event).await? else {
            return Ok(KitReturnOutcome::Ignored);
        };

        let resolved = match identifiers.into_resolved() {
            Ok(resolved) => resolved,
            Err(partial) => {
                let missing = partial.missing();
                warn!(
                    missing = ?missing,
                    metadata = event.metadata().kind(),
                    "Could not resolve kit return identifiers, skipping"
                );
                return Ok(KitReturnOutcome::Skipped { missing });
            }
        };

        let user_errors = self.apply(event, &resolved).await?;

        info!(
            order_gid = %resolved.order_gid,
            fulfillment_id = %resolved.fulfillment_id,
            user_errors = user_errors.len(),
            "Kit return processed"
        );

        Ok(KitReturnOutcome::Completed {
            order_gid: resolved.order_gid,
            fulfillment_id: resolved.fulfillment_id,
            user_errors,
        })
    }

    /// Filter the event and run the identifier cascade without mutating.
    ///
    /// Returns `None` for events that are not delivered tracking updates.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup request fails.
    pub async fn resolve_only(
        &self,
        event: &DeliveryEvent,
    ) -> Result<Option<Identifiers>, AdminShopifyError> {
        if !event.is_delivered_update() {
            info!(
                event = ?event.event,
                status = ?event.status(),
                "Ignoring non-delivered tracking event"
            );
            return Ok(None);
        }

        let metadata = event.metadata();
        let identifiers = resolve_identifiers(ResolutionContext {
            metadata: &metadata,
            fallback: &self.fallback,
            shopify: &self.shopify,
        })
        .await?;

        Ok(Some(identifiers))
    }

    async fn apply(
        &self,
        event: &DeliveryEvent,
        ids: &ResolvedIdentifiers,
    ) -> Result<Vec<UserError>, AdminShopifyError> {
        let mut user_errors = Vec::new();

        let errors = self
            .shopify
            .add_order_tags(&ids.order_gid, std::slice::from_ref(&self.settings.tag))
            .await?;
        log_user_errors("tagsAdd", &errors);
        user_errors.extend(errors);

        let tracking = self.tracking_input(event);
        let errors = self
            .shopify
            .update_fulfillment_tracking(&ids.fulfillment_id, &tracking, self.settings.notify_customer)
            .await?;
        log_user_errors("fulfillmentTrackingInfoUpdate", &errors);
        user_errors.extend(errors);

        let timeline_event = FulfillmentEventInput {
            fulfillment_id: ids.fulfillment_id.clone(),
            status: FulfillmentEventStatus::Delivered,
            happened_at: happened_at(event.status_date(), Utc::now()),
            message: self.settings.event_message.clone(),
        };
        let errors = self.shopify.create_fulfillment_event(&timeline_event).await?;
        log_user_errors("fulfillmentEventCreate", &errors);
        user_errors.extend(errors);

        Ok(user_errors)
    }

    fn tracking_input(&self, event: &DeliveryEvent) -> TrackingInfoInput {
        TrackingInfoInput {
            number: event
                .tracking_number()
                .unwrap_or(self.settings.placeholder_tracking_number.as_str())
                .to_string(),
            company: self.settings.carrier_name.clone(),
            url: event.tracking_url().map(String::from),
        }
    }
}

fn log_user_errors(operation: &'static str, errors: &[UserError]) {
    if !errors.is_empty() {
        warn!(
            operation,
            errors = %format_user_errors(errors),
            "Shopify reported user errors, continuing"
        );
    }
}

/// Timeline timestamp for the event.
///
/// Uses the carrier's `status_date` when it is RFC 3339, otherwise `now`.
fn happened_at(status_date: Option<&str>, now: DateTime<Utc>) -> String {
    let timestamp = match status_date.map(DateTime::parse_from_rfc3339) {
        Some(Ok(parsed)) => parsed.with_timezone(&Utc),
        Some(Err(e)) => {
            warn!(status_date = ?status_date, error = %e, "Unparseable status_date, using current time");
            now
        }
        None => now,
    };
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
