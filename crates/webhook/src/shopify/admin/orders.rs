//! Order operations for the Admin API.

use kit_return_core::{FulfillmentId, OrderGid};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::{AdminClient, AdminShopifyError};
use crate::shopify::{
    queries::{FULFILLMENT_PARENT_ORDER, ORDER_BY_NAME, TAGS_ADD},
    types::{OrderLookup, UserError, UserErrorsPayload},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagsAddResponse {
    tags_add: Option<UserErrorsPayload>,
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    orders: OrderEdges,
}

#[derive(Debug, Deserialize)]
struct OrderEdges {
    #[serde(default)]
    edges: Vec<OrderEdge>,
}

#[derive(Debug, Deserialize)]
struct OrderEdge {
    node: OrderLookup,
}

#[derive(Debug, Deserialize)]
struct FulfillmentResponse {
    fulfillment: Option<FulfillmentNode>,
}

#[derive(Debug, Deserialize)]
struct FulfillmentNode {
    order: Option<OrderRef>,
}

#[derive(Debug, Deserialize)]
struct OrderRef {
    id: OrderGid,
}

impl AdminClient {
    /// Add tags to an order.
    ///
    /// Tags already on the order are left alone; Shopify de-duplicates.
    ///
    /// # Arguments
    ///
    /// * `order_gid` - Shopify order GID
    /// * `tags` - Tags to add
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. User errors are returned
    /// in the `Ok` value for the caller to log.
    #[instrument(skip(self, tags), fields(order_gid = %order_gid))]
    pub async fn add_order_tags(
        &self,
        order_gid: &OrderGid,
        tags: &[String],
    ) -> Result<Vec<UserError>, AdminShopifyError> {
        let variables = json!({
            "id": order_gid,
            "tags": tags,
        });

        let response: TagsAddResponse = self.execute(&TAGS_ADD, Some(variables)).await?;

        Ok(response
            .tags_add
            .map(|payload| payload.user_errors)
            .unwrap_or_default())
    }

    /// Find an order by its exact name (e.g. `#1042`).
    ///
    /// Shopify's name search is prefix-based, so the results are filtered
    /// down to the order whose name matches exactly.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(order_name = %name))]
    pub async fn find_order_by_name(
        &self,
        name: &str,
    ) -> Result<Option<OrderLookup>, AdminShopifyError> {
        let variables = json!({ "query": format!("name:{name}") });

        let response: OrdersResponse = self.execute(&ORDER_BY_NAME, Some(variables)).await?;

        let found = response
            .orders
            .edges
            .into_iter()
            .map(|edge| edge.node)
            .find(|order| order.name.eq_ignore_ascii_case(name));

        debug!(found = found.is_some(), "Order name lookup finished");
        Ok(found)
    }

    /// Get the GID of the order a fulfillment belongs to.
    ///
    /// Returns `None` when the fulfillment does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(fulfillment_id = %fulfillment_id))]
    pub async fn get_fulfillment_order_gid(
        &self,
        fulfillment_id: &FulfillmentId,
    ) -> Result<Option<OrderGid>, AdminShopifyError> {
        let variables = json!({ "id": fulfillment_id });

        let response: FulfillmentResponse =
            self.execute(&FULFILLMENT_PARENT_ORDER, Some(variables)).await?;

        Ok(response
            .fulfillment
            .and_then(|f| f.order)
            .map(|order| order.id))
    }
}
