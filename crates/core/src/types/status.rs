//! Status enums shared with the Shopify Admin API.

use serde::{Deserialize, Serialize};

/// Status of a fulfillment timeline event.
///
/// Maps to Shopify's `FulfillmentEventStatus` enum values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FulfillmentEventStatus {
    LabelPurchased,
    LabelPrinted,
    ReadyForPickup,
    Confirmed,
    InTransit,
    OutForDelivery,
    AttemptedDelivery,
    Delayed,
    Delivered,
    Failure,
    Carrier,
}

impl std::fmt::Display for FulfillmentEventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::LabelPurchased => "LABEL_PURCHASED",
            Self::LabelPrinted => "LABEL_PRINTED",
            Self::ReadyForPickup => "READY_FOR_PICKUP",
            Self::Confirmed => "CONFIRMED",
            Self::InTransit => "IN_TRANSIT",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::AttemptedDelivery => "ATTEMPTED_DELIVERY",
            Self::Delayed => "DELAYED",
            Self::Delivered => "DELIVERED",
            Self::Failure => "FAILURE",
            Self::Carrier => "CARRIER",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_format() {
        for status in [
            FulfillmentEventStatus::Delivered,
            FulfillmentEventStatus::OutForDelivery,
            FulfillmentEventStatus::LabelPurchased,
        ] {
            let wire = serde_json::to_string(&status).unwrap();
            assert_eq!(wire, format!("\"{status}\""));
        }
    }
}
