//! Domain types for Shopify Admin API requests and responses.

use kit_return_core::{FulfillmentEventStatus, FulfillmentId, OrderGid};
use serde::{Deserialize, Serialize};

// =============================================================================
// User errors
// =============================================================================

/// A validation error reported in a mutation payload.
///
/// User errors do not fail the HTTP request; they come back next to the
/// mutation result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.field.as_deref() {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Join user errors into a single log-friendly string.
#[must_use]
pub fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The `userErrors` part of any mutation payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserErrorsPayload {
    #[serde(default)]
    pub user_errors: Vec<UserError>,
}

// =============================================================================
// Mutation inputs
// =============================================================================

/// `FulfillmentTrackingInput` for `fulfillmentTrackingInfoUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingInfoInput {
    /// Tracking number shown to the customer.
    pub number: String,
    /// Carrier display name.
    pub company: String,
    /// Tracking page, omitted when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// `FulfillmentEventInput` for `fulfillmentEventCreate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentEventInput {
    /// Fulfillment the event belongs to.
    pub fulfillment_id: FulfillmentId,
    /// Event status.
    pub status: FulfillmentEventStatus,
    /// When the event happened (RFC 3339, UTC).
    pub happened_at: String,
    /// Timeline message.
    pub message: String,
}

// =============================================================================
// Query results
// =============================================================================

/// An order matched by name, with its fulfillments.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLookup {
    /// Order GID.
    pub id: OrderGid,
    /// Order name (e.g. `#1042`).
    pub name: String,
    /// Fulfillments in the order they were returned.
    #[serde(default)]
    pub fulfillments: Vec<FulfillmentSummary>,
}

/// Minimal fulfillment view used to pick the latest fulfillment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillmentSummary {
    /// Fulfillment GID.
    pub id: FulfillmentId,
    /// Fulfillment status (e.g. `SUCCESS`).
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp as returned by Shopify.
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_error_display() {
        let err = UserError {
            field: Some(vec!["fulfillmentId".to_string(), "id".to_string()]),
            message: "Fulfillment does not exist".to_string(),
        };
        assert_eq!(err.to_string(), "fulfillmentId.id: Fulfillment does not exist");

        let no_field = UserError {
            field: None,
            message: "Access denied".to_string(),
        };
        assert_eq!(no_field.to_string(), "Access denied");

        let empty_field = UserError {
            field: Some(vec![]),
            message: "Access denied".to_string(),
        };
        assert_eq!(empty_field.to_string(), "Access denied");
    }

    #[test]
    fn test_format_user_errors() {
        let errors = vec![
            UserError {
                field: Some(vec!["tags".to_string()]),
                message: "is invalid".to_string(),
            },
            UserError {
                field: None,
                message: "Order is archived".to_string(),
            },
        ];
        assert_eq!(format_user_errors(&errors), "tags: is invalid; Order is archived");
    }

    #[test]
    fn test_tracking_input_omits_missing_url() {
        let input = TrackingInfoInput {
            number: "KIT-RETURN".to_string(),
            company: "Kit Return".to_string(),
            url: None,
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "number": "KIT-RETURN", "company": "Kit Return" })
        );
    }

    #[test]
    fn test_event_input_serializes_camel_case() {
        let input = FulfillmentEventInput {
            fulfillment_id: FulfillmentId::parse("gid://shopify/Fulfillment/9").unwrap(),
            status: FulfillmentEventStatus::Delivered,
            happened_at: "2025-08-01T17:42:00Z".to_string(),
            message: "Impression kit returned".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({
                "fulfillmentId": "gid://shopify/Fulfillment/9",
                "status": "DELIVERED",
                "happenedAt": "2025-08-01T17:42:00Z",
                "message": "Impression kit returned"
            })
        );
    }

    #[test]
    fn test_order_lookup_deserializes() {
        let order: OrderLookup = serde_json::from_value(json!({
            "id": "gid://shopify/Order/1042",
            "name": "#1042",
            "fulfillments": [
                { "id": "gid://shopify/Fulfillment/1", "status": "SUCCESS", "createdAt": "2025-07-01T10:00:00Z" },
                { "id": "gid://shopify/Fulfillment/2", "status": "SUCCESS", "createdAt": null }
            ]
        }))
        .unwrap();

        assert_eq!(order.name, "#1042");
        assert_eq!(order.fulfillments.len(), 2);
        assert!(order.fulfillments[1].created_at.is_none());
    }
}
