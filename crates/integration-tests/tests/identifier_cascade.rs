//! Identifier cascade against a mock Shopify.
//!
//! Drives `resolve_identifiers` directly so each strategy's remote lookup
//! can be checked without the mutation sequence.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use kit_return_core::{FulfillmentId, Metadata, OrderGid};
use kit_return_integration_tests::{MockReply, MockShopify, TEST_TOKEN};
use kit_return_webhook::{
    config::FallbackIdentifiers,
    resolve::{Identifiers, ResolutionContext, resolve_identifiers},
    shopify::{AdminClient, AdminShopifyError},
};
use secrecy::SecretString;
use serde_json::json;

fn client(mock: &MockShopify) -> AdminClient {
    AdminClient::with_endpoint(mock.endpoint(), SecretString::from(TEST_TOKEN))
}

async fn resolve(
    mock: &MockShopify,
    metadata: &Metadata,
    fallback: &FallbackIdentifiers,
) -> Result<Identifiers, AdminShopifyError> {
    let shopify = client(mock);
    resolve_identifiers(ResolutionContext {
        metadata,
        fallback,
        shopify: &shopify,
    })
    .await
}

fn orders_reply(nodes: serde_json::Value) -> MockReply {
    let edges: Vec<_> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|node| json!({ "node": node }))
        .collect();
    MockReply::Data(json!({ "orders": { "edges": edges } }))
}

#[tokio::test]
async fn test_structured_metadata_needs_no_lookup() {
    let mock = MockShopify::start().await;
    let metadata = Metadata::from_text(
        r#"{"shopify_order_gid":"gid://X","kit_fulfillment_id":"gid://Y"}"#,
    );

    let ids = resolve(&mock, &metadata, &FallbackIdentifiers::default())
        .await
        .unwrap();

    assert_eq!(ids.order_gid.unwrap().as_str(), "gid://X");
    assert_eq!(ids.fulfillment_id.unwrap().as_str(), "gid://Y");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_order_lookup_picks_exact_name_and_latest_fulfillment() {
    let mock = MockShopify::start().await;
    mock.reply(
        "OrderByName",
        orders_reply(json!([
            {
                "id": "gid://shopify/Order/10420",
                "name": "#10420",
                "fulfillments": [
                    { "id": "gid://shopify/Fulfillment/90", "createdAt": "2025-09-01T00:00:00Z" }
                ]
            },
            {
                "id": "gid://shopify/Order/1042",
                "name": "#1042",
                "fulfillments": [
                    { "id": "gid://shopify/Fulfillment/1", "createdAt": "2025-07-01T10:00:00Z" },
                    { "id": "gid://shopify/Fulfillment/2", "createdAt": "2025-07-05T10:00:00Z" },
                    { "id": "gid://shopify/Fulfillment/3", "createdAt": null }
                ]
            }
        ])),
    );

    let ids = resolve(
        &mock,
        &Metadata::from_text("Kit return, order #1042"),
        &FallbackIdentifiers::default(),
    )
    .await
    .unwrap();

    assert_eq!(ids.order_gid.unwrap().as_str(), "gid://shopify/Order/1042");
    assert_eq!(
        ids.fulfillment_id.unwrap().as_str(),
        "gid://shopify/Fulfillment/2"
    );
    assert_eq!(mock.operations(), ["OrderByName"]);
}

#[tokio::test]
async fn test_order_lookup_only_fills_empty_slot() {
    let mock = MockShopify::start().await;
    mock.reply(
        "OrderByName",
        orders_reply(json!([
            {
                "id": "gid://shopify/Order/1042",
                "name": "#1042",
                "fulfillments": [{ "id": "gid://shopify/Fulfillment/2", "createdAt": "2025-07-05T10:00:00Z" }]
            }
        ])),
    );
    let fallback = FallbackIdentifiers {
        order_gid: Some(OrderGid::parse("gid://shopify/Order/7").unwrap()),
        fulfillment_id: None,
    };

    let ids = resolve(&mock, &Metadata::from_text("Order #1042"), &fallback)
        .await
        .unwrap();

    assert_eq!(ids.order_gid.unwrap().as_str(), "gid://shopify/Order/7");
    assert_eq!(
        ids.fulfillment_id.unwrap().as_str(),
        "gid://shopify/Fulfillment/2"
    );
}

#[tokio::test]
async fn test_complete_fallback_skips_lookups() {
    let mock = MockShopify::start().await;
    let fallback = FallbackIdentifiers {
        order_gid: Some(OrderGid::parse("7").unwrap()),
        fulfillment_id: Some(FulfillmentId::parse("8").unwrap()),
    };

    let ids = resolve(&mock, &Metadata::from_text("Order #1042"), &fallback)
        .await
        .unwrap();

    assert!(ids.is_complete());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_parent_lookup_fills_only_order() {
    let mock = MockShopify::start().await;
    mock.reply(
        "FulfillmentParentOrder",
        MockReply::Data(json!({
            "fulfillment": { "id": "gid://shopify/Fulfillment/77", "order": { "id": "gid://shopify/Order/5" } }
        })),
    );
    let metadata = Metadata::from_raw(Some(&json!({ "kit_fulfillment_id": 77 })));

    let ids = resolve(&mock, &metadata, &FallbackIdentifiers::default())
        .await
        .unwrap();

    assert_eq!(ids.order_gid.unwrap().as_str(), "gid://shopify/Order/5");
    assert_eq!(
        ids.fulfillment_id.unwrap().as_str(),
        "gid://shopify/Fulfillment/77"
    );

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].variables["id"], "gid://shopify/Fulfillment/77");
}

#[tokio::test]
async fn test_parent_lookup_for_unknown_fulfillment() {
    let mock = MockShopify::start().await;
    let metadata = Metadata::from_text(r#"{"kit_fulfillment_id":"gid://shopify/Fulfillment/404"}"#);

    let ids = resolve(&mock, &metadata, &FallbackIdentifiers::default())
        .await
        .unwrap();

    assert!(ids.order_gid.is_none());
    assert_eq!(ids.missing(), vec!["order_gid"]);
    assert_eq!(mock.operations(), ["FulfillmentParentOrder"]);
}

#[tokio::test]
async fn test_structured_note_is_not_text_matched() {
    let mock = MockShopify::start().await;
    let metadata = Metadata::from_raw(Some(&json!({ "note": "Order #1042" })));

    let ids = resolve(&mock, &metadata, &FallbackIdentifiers::default())
        .await
        .unwrap();

    assert_eq!(ids, Identifiers::default());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_lookup_error_propagates() {
    let mock = MockShopify::start().await;
    mock.reply(
        "OrderByName",
        MockReply::Http {
            status: 401,
            body: "[API] Invalid API key or access token".to_string(),
        },
    );

    let err = resolve(
        &mock,
        &Metadata::from_text("Order #1042"),
        &FallbackIdentifiers::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AdminShopifyError::Unauthorized(_)));
}
