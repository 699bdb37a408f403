//! Identifier resolution cascade.
//!
//! Shippo metadata is inconsistent: some labels carry Shopify GIDs as JSON,
//! some carry a free-text note like `Order #1042`, many carry nothing. The
//! cascade runs an ordered list of [`Strategy`] values. Each one produces
//! candidate identifiers which only fill slots that are still empty, so the
//! first strategy to find an identifier wins.
//!
//! | Strategy | Runs when | Fills |
//! |----------|-----------|-------|
//! | `MetadataFields` | always | order, fulfillment |
//! | `ConfiguredFallback` | always | order, fulfillment |
//! | `OrderNameLookup` | a slot is empty and metadata is free text | order, fulfillment |
//! | `FulfillmentParentLookup` | order empty, fulfillment known | order |

mod order_name;

pub use order_name::{extract_order_name, latest_fulfillment};

use kit_return_core::{FulfillmentId, Metadata, OrderGid};
use tracing::{debug, instrument, warn};

use crate::config::FallbackIdentifiers;
use crate::shopify::{AdminClient, AdminShopifyError};

/// Metadata keys holding the order GID, in precedence order.
pub const ORDER_GID_KEYS: &[&str] = &["shopify_order_gid", "shopify_order_id"];

/// Metadata keys holding the fulfillment GID.
pub const FULFILLMENT_ID_KEYS: &[&str] = &["kit_fulfillment_id"];

/// Identifiers collected so far; either may still be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifiers {
    /// Target order.
    pub order_gid: Option<OrderGid>,
    /// Target fulfillment.
    pub fulfillment_id: Option<FulfillmentId>,
}

/// Both identifiers, ready for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentifiers {
    /// Target order.
    pub order_gid: OrderGid,
    /// Target fulfillment.
    pub fulfillment_id: FulfillmentId,
}

impl Identifiers {
    /// Fill empty slots from `candidates`. Filled slots are never replaced.
    pub fn absorb(&mut self, candidates: Self) {
        if self.order_gid.is_none() {
            self.order_gid = candidates.order_gid.filter(|g| !g.as_str().is_empty());
        }
        if self.fulfillment_id.is_none() {
            self.fulfillment_id = candidates.fulfillment_id.filter(|f| !f.as_str().is_empty());
        }
    }

    /// Whether both identifiers are known.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.order_gid.is_some() && self.fulfillment_id.is_some()
    }

    /// Names of the identifiers that are still missing.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.order_gid.is_none() {
            missing.push("order_gid");
        }
        if self.fulfillment_id.is_none() {
            missing.push("fulfillment_id");
        }
        missing
    }

    /// Convert into [`ResolvedIdentifiers`] if both are present.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged when either identifier is missing.
    pub fn into_resolved(self) -> Result<ResolvedIdentifiers, Self> {
        match self {
            Self {
                order_gid: Some(order_gid),
                fulfillment_id: Some(fulfillment_id),
            } => Ok(ResolvedIdentifiers {
                order_gid,
                fulfillment_id,
            }),
            partial => Err(partial),
        }
    }
}

impl From<&FallbackIdentifiers> for Identifiers {
    fn from(fallback: &FallbackIdentifiers) -> Self {
        Self {
            order_gid: fallback.order_gid.clone(),
            fulfillment_id: fallback.fulfillment_id.clone(),
        }
    }
}

/// One step of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Explicit fields of structured metadata.
    MetadataFields,
    /// Identifiers configured for the deployment.
    ConfiguredFallback,
    /// Parse `Order #N` from free-text metadata and look the order up.
    OrderNameLookup,
    /// Look up the parent order of a known fulfillment.
    FulfillmentParentLookup,
}

impl Strategy {
    /// Strategies in the order they run.
    pub const CASCADE: [Self; 4] = [
        Self::MetadataFields,
        Self::ConfiguredFallback,
        Self::OrderNameLookup,
        Self::FulfillmentParentLookup,
    ];

    /// Short label for log fields.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MetadataFields => "metadata_fields",
            Self::ConfiguredFallback => "configured_fallback",
            Self::OrderNameLookup => "order_name_lookup",
            Self::FulfillmentParentLookup => "fulfillment_parent_lookup",
        }
    }

    /// Whether the strategy should run given what is already known.
    #[must_use]
    pub const fn applies(self, found: &Identifiers, metadata: &Metadata) -> bool {
        match self {
            Self::MetadataFields => matches!(metadata, Metadata::Structured(_)),
            Self::ConfiguredFallback => true,
            Self::OrderNameLookup => {
                !found.is_complete() && matches!(metadata, Metadata::Freeform(_))
            }
            Self::FulfillmentParentLookup => {
                found.order_gid.is_none() && found.fulfillment_id.is_some()
            }
        }
    }
}

/// Inputs to the cascade.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    /// Normalized webhook metadata.
    pub metadata: &'a Metadata,
    /// Configured fallback identifiers.
    pub fallback: &'a FallbackIdentifiers,
    /// Client used by the lookup strategies.
    pub shopify: &'a AdminClient,
}

/// Identifiers named explicitly in structured metadata.
///
/// Values are kept as given. A Shopify GID of the wrong resource type is
/// logged but still wins over later strategies.
#[must_use]
pub fn from_metadata(metadata: &Metadata) -> Identifiers {
    let order_gid = metadata.first_field(ORDER_GID_KEYS, OrderGid::from_json);
    let fulfillment_id = metadata.first_field(FULFILLMENT_ID_KEYS, FulfillmentId::from_json);

    if let Some(gid) = order_gid.as_ref().filter(|g| !g.names_resource()) {
        warn!(order_gid = %gid, "Metadata order GID names another resource type");
    }
    if let Some(id) = fulfillment_id.as_ref().filter(|f| !f.names_resource()) {
        warn!(fulfillment_id = %id, "Metadata fulfillment ID names another resource type");
    }

    Identifiers {
        order_gid,
        fulfillment_id,
    }
}

/// Run the full cascade.
///
/// Returns whatever could be found; check [`Identifiers::into_resolved`]
/// before mutating anything.
///
/// # Errors
///
/// Returns an error if a lookup request fails.
#[instrument(skip(ctx), fields(metadata = ctx.metadata.kind()))]
pub async fn resolve_identifiers(
    ctx: ResolutionContext<'_>,
) -> Result<Identifiers, AdminShopifyError> {
    let mut found = Identifiers::default();

    for strategy in Strategy::CASCADE {
        if found.is_complete() {
            break;
        }
        if !strategy.applies(&found, ctx.metadata) {
            continue;
        }

        let candidates = run_strategy(strategy, ctx, &found).await?;
        debug!(
            strategy = strategy.name(),
            order_gid = ?candidates.order_gid,
            fulfillment_id = ?candidates.fulfillment_id,
            "Strategy finished"
        );
        found.absorb(candidates);
    }

    Ok(found)
}

async fn run_strategy(
    strategy: Strategy,
    ctx: ResolutionContext<'_>,
    found: &Identifiers,
) -> Result<Identifiers, AdminShopifyError> {
    match strategy {
        Strategy::MetadataFields => Ok(from_metadata(ctx.metadata)),
        Strategy::ConfiguredFallback => Ok(Identifiers::from(ctx.fallback)),
        Strategy::OrderNameLookup => {
            let Some(name) = ctx.metadata.freeform_text().and_then(extract_order_name) else {
                return Ok(Identifiers::default());
            };

            let Some(order) = ctx.shopify.find_order_by_name(&name).await? else {
                debug!(order_name = %name, "No order matches name");
                return Ok(Identifiers::default());
            };

            let fulfillment_id = latest_fulfillment(&order.fulfillments).map(|f| f.id.clone());
            Ok(Identifiers {
                order_gid: Some(order.id),
                fulfillment_id,
            })
        }
        Strategy::FulfillmentParentLookup => {
            let Some(fulfillment_id) = found.fulfillment_id.as_ref() else {
                return Ok(Identifiers::default());
            };

            let order_gid = ctx.shopify.get_fulfillment_order_gid(fulfillment_id).await?;
            Ok(Identifiers {
                order_gid,
                fulfillment_id: None,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(n: u64) -> OrderGid {
        OrderGid::parse(&n.to_string()).unwrap()
    }

    fn fulfillment(n: u64) -> FulfillmentId {
        FulfillmentId::parse(&n.to_string()).unwrap()
    }

    fn structured(value: serde_json::Value) -> Metadata {
        Metadata::from_raw(Some(&value))
    }

    #[test]
    fn test_absorb_only_fills_empty_slots() {
        let mut ids = Identifiers {
            order_gid: Some(order(1)),
            fulfillment_id: None,
        };
        ids.absorb(Identifiers {
            order_gid: Some(order(2)),
            fulfillment_id: Some(fulfillment(3)),
        });

        assert_eq!(ids.order_gid, Some(order(1)));
        assert_eq!(ids.fulfillment_id, Some(fulfillment(3)));
    }

    #[test]
    fn test_into_resolved() {
        let partial = Identifiers {
            order_gid: Some(order(1)),
            fulfillment_id: None,
        };
        assert_eq!(partial.missing(), vec!["fulfillment_id"]);
        assert!(partial.into_resolved().is_err());

        let full = Identifiers {
            order_gid: Some(order(1)),
            fulfillment_id: Some(fulfillment(2)),
        };
        let resolved = full.into_resolved().unwrap();
        assert_eq!(resolved.order_gid.as_str(), "gid://shopify/Order/1");
        assert_eq!(resolved.fulfillment_id.as_str(), "gid://shopify/Fulfillment/2");
    }

    #[test]
    fn test_missing_lists_both() {
        assert_eq!(
            Identifiers::default().missing(),
            vec!["order_gid", "fulfillment_id"]
        );
    }

    #[test]
    fn test_from_metadata_reads_explicit_fields() {
        let metadata = Metadata::from_raw(Some(&json!(
            r#"{"shopify_order_gid":"gid://X","kit_fulfillment_id":"gid://Y"}"#
        )));
        let ids = from_metadata(&metadata);

        assert_eq!(ids.order_gid.unwrap().as_str(), "gid://X");
        assert_eq!(ids.fulfillment_id.unwrap().as_str(), "gid://Y");
    }

    #[test]
    fn test_from_metadata_falls_back_to_order_id_key() {
        let metadata = structured(json!({ "shopify_order_id": 1042 }));
        let ids = from_metadata(&metadata);

        assert_eq!(ids.order_gid, Some(order(1042)));
        assert!(ids.fulfillment_id.is_none());
    }

    #[test]
    fn test_from_metadata_keeps_wrong_resource() {
        let metadata = structured(json!({
            "shopify_order_gid": "gid://shopify/OrderX/1042",
            "kit_fulfillment_id": "gid://shopify/Fulfillment/1"
        }));
        let ids = from_metadata(&metadata);

        assert_eq!(ids.order_gid.unwrap().as_str(), "gid://shopify/OrderX/1042");
        assert_eq!(ids.fulfillment_id, Some(fulfillment(1)));
    }

    #[test]
    fn test_from_metadata_freeform_is_empty() {
        let metadata = Metadata::from_text("Order #1042");
        assert_eq!(from_metadata(&metadata), Identifiers::default());
    }

    #[test]
    fn test_fallback_conversion() {
        let fallback = FallbackIdentifiers {
            order_gid: Some(order(7)),
            fulfillment_id: None,
        };
        let ids = Identifiers::from(&fallback);
        assert_eq!(ids.order_gid, Some(order(7)));
        assert!(ids.fulfillment_id.is_none());
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(
            Strategy::CASCADE,
            [
                Strategy::MetadataFields,
                Strategy::ConfiguredFallback,
                Strategy::OrderNameLookup,
                Strategy::FulfillmentParentLookup,
            ]
        );
    }

    #[test]
    fn test_order_name_lookup_applies_only_to_freeform() {
        let empty = Identifiers::default();
        let freeform = Metadata::from_text("Order #1042");
        let structured_md = structured(json!({ "note": "Order #1042" }));

        assert!(Strategy::OrderNameLookup.applies(&empty, &freeform));
        assert!(!Strategy::OrderNameLookup.applies(&empty, &structured_md));
        assert!(!Strategy::OrderNameLookup.applies(&empty, &Metadata::Absent));

        let complete = Identifiers {
            order_gid: Some(order(1)),
            fulfillment_id: Some(fulfillment(2)),
        };
        assert!(!Strategy::OrderNameLookup.applies(&complete, &freeform));
    }

    #[test]
    fn test_parent_lookup_needs_fulfillment_without_order() {
        let md = Metadata::Absent;
        let only_fulfillment = Identifiers {
            order_gid: None,
            fulfillment_id: Some(fulfillment(2)),
        };
        let only_order = Identifiers {
            order_gid: Some(order(1)),
            fulfillment_id: None,
        };

        assert!(Strategy::FulfillmentParentLookup.applies(&only_fulfillment, &md));
        assert!(!Strategy::FulfillmentParentLookup.applies(&only_order, &md));
        assert!(!Strategy::FulfillmentParentLookup.applies(&Identifiers::default(), &md));
    }
}
