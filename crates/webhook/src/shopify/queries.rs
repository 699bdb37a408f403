//! GraphQL documents for the Shopify Admin API.
//!
//! Every document is a single named operation; the name is sent as
//! `operationName` alongside the query.

/// A named GraphQL operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Operation name, matching the name inside `document`.
    pub name: &'static str,
    /// Full GraphQL document.
    pub document: &'static str,
}

// =============================================================================
// Order operations
// =============================================================================

/// Add tags to an order (or any taggable resource).
pub const TAGS_ADD: Operation = Operation {
    name: "TagsAdd",
    document: r"
        mutation TagsAdd($id: ID!, $tags: [String!]!) {
            tagsAdd(id: $id, tags: $tags) {
                node {
                    id
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ",
};

/// Find orders by search query, with their fulfillments.
pub const ORDER_BY_NAME: Operation = Operation {
    name: "OrderByName",
    document: r"
        query OrderByName($query: String!) {
            orders(first: 5, query: $query) {
                edges {
                    node {
                        id
                        name
                        fulfillments {
                            id
                            status
                            createdAt
                        }
                    }
                }
            }
        }
    ",
};

// =============================================================================
// Fulfillment operations
// =============================================================================

/// Resolve a fulfillment's parent order.
pub const FULFILLMENT_PARENT_ORDER: Operation = Operation {
    name: "FulfillmentParentOrder",
    document: r"
        query FulfillmentParentOrder($id: ID!) {
            fulfillment(id: $id) {
                id
                order {
                    id
                }
            }
        }
    ",
};

/// Update tracking info on a fulfillment, optionally emailing the customer.
pub const FULFILLMENT_TRACKING_INFO_UPDATE: Operation = Operation {
    name: "FulfillmentTrackingInfoUpdate",
    document: r"
        mutation FulfillmentTrackingInfoUpdate(
            $fulfillmentId: ID!
            $trackingInfoInput: FulfillmentTrackingInput!
            $notifyCustomer: Boolean
        ) {
            fulfillmentTrackingInfoUpdate(
                fulfillmentId: $fulfillmentId
                trackingInfoInput: $trackingInfoInput
                notifyCustomer: $notifyCustomer
            ) {
                fulfillment {
                    id
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ",
};

/// Record an event on a fulfillment's timeline.
pub const FULFILLMENT_EVENT_CREATE: Operation = Operation {
    name: "FulfillmentEventCreate",
    document: r"
        mutation FulfillmentEventCreate($fulfillmentEvent: FulfillmentEventInput!) {
            fulfillmentEventCreate(fulfillmentEvent: $fulfillmentEvent) {
                fulfillmentEvent {
                    id
                    status
                }
                userErrors {
                    field
                    message
                }
            }
        }
    ",
};
