//! Fulfillment tracking and timeline operations for the Admin API.

use kit_return_core::FulfillmentId;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use super::{AdminClient, AdminShopifyError};
use crate::shopify::{
    queries::{FULFILLMENT_EVENT_CREATE, FULFILLMENT_TRACKING_INFO_UPDATE},
    types::{FulfillmentEventInput, TrackingInfoInput, UserError, UserErrorsPayload},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackingInfoUpdateResponse {
    fulfillment_tracking_info_update: Option<UserErrorsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventCreateResponse {
    fulfillment_event_create: Option<UserErrorsPayload>,
}

impl AdminClient {
    /// Update tracking info on a fulfillment.
    ///
    /// # Arguments
    ///
    /// * `fulfillment_id` - Shopify fulfillment GID
    /// * `tracking` - Carrier, number and optional URL
    /// * `notify_customer` - Whether Shopify emails the customer
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. User errors are returned
    /// in the `Ok` value.
    #[instrument(skip(self, tracking), fields(fulfillment_id = %fulfillment_id))]
    pub async fn update_fulfillment_tracking(
        &self,
        fulfillment_id: &FulfillmentId,
        tracking: &TrackingInfoInput,
        notify_customer: bool,
    ) -> Result<Vec<UserError>, AdminShopifyError> {
        let variables = json!({
            "fulfillmentId": fulfillment_id,
            "trackingInfoInput": tracking,
            "notifyCustomer": notify_customer,
        });

        let response: TrackingInfoUpdateResponse = self
            .execute(&FULFILLMENT_TRACKING_INFO_UPDATE, Some(variables))
            .await?;

        Ok(response
            .fulfillment_tracking_info_update
            .map(|payload| payload.user_errors)
            .unwrap_or_default())
    }

    /// Create a timeline event on a fulfillment.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. User errors are returned
    /// in the `Ok` value.
    #[instrument(
        skip(self, input),
        fields(fulfillment_id = %input.fulfillment_id, status = %input.status)
    )]
    pub async fn create_fulfillment_event(
        &self,
        input: &FulfillmentEventInput,
    ) -> Result<Vec<UserError>, AdminShopifyError> {
        let variables = json!({ "fulfillmentEvent": input });

        let response: EventCreateResponse = self
            .execute(&FULFILLMENT_EVENT_CREATE, Some(variables))
            .await?;

        Ok(response
            .fulfillment_event_create
            .map(|payload| payload.user_errors)
            .unwrap_or_default())
    }
}
