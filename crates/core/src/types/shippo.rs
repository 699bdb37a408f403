//! Shippo tracking webhook payloads.
//!
//! Only the fields the kit return flow reads are modeled. Every field is
//! optional, and a field of the wrong JSON type reads as absent, so that
//! partial or unexpected payloads are filtered out by the handler instead of
//! being rejected during deserialization.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

use super::metadata::Metadata;

/// Shippo webhook event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippoEvent {
    TrackUpdated,
    TransactionCreated,
    TransactionUpdated,
    BatchCreated,
    BatchPurchased,
    #[serde(other)]
    Other,
}

/// Shippo tracking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    PreTransit,
    Transit,
    Delivered,
    Returned,
    Failure,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PreTransit => write!(f, "PRE_TRANSIT"),
            Self::Transit => write!(f, "TRANSIT"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Returned => write!(f, "RETURNED"),
            Self::Failure => write!(f, "FAILURE"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// A tracking webhook delivered by Shippo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryEvent {
    /// Event type (`track_updated` for tracking changes).
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<ShippoEvent>,
    /// Tracking object the event refers to.
    #[serde(default, deserialize_with = "lenient")]
    pub data: Option<TrackingData>,
}

/// The `data` object of a `track_updated` event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingData {
    /// Carrier token (e.g. `usps`).
    #[serde(default, deserialize_with = "lenient")]
    pub carrier: Option<String>,
    /// Carrier tracking number.
    #[serde(default, deserialize_with = "lenient")]
    pub tracking_number: Option<String>,
    /// Public tracking page.
    #[serde(default, deserialize_with = "lenient")]
    pub tracking_url: Option<String>,
    /// Latest tracking status.
    #[serde(default, deserialize_with = "lenient")]
    pub tracking_status: Option<TrackingStatusInfo>,
    /// Metadata set when the label was purchased.
    #[serde(default)]
    pub metadata: Option<Value>,
}

/// The `tracking_status` object of a tracking payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackingStatusInfo {
    /// Normalized status.
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<TrackingStatus>,
    /// Carrier-provided description of the status.
    #[serde(default, deserialize_with = "lenient")]
    pub status_details: Option<String>,
    /// When the carrier recorded the status (ISO 8601).
    #[serde(default, deserialize_with = "lenient")]
    pub status_date: Option<String>,
}

impl DeliveryEvent {
    /// Read a webhook body of any JSON shape.
    ///
    /// A body that is not an object yields an empty event, which the
    /// delivered-update filter then ignores.
    #[must_use]
    pub fn from_json(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    /// Tracking status of the event, if any.
    #[must_use]
    pub fn status(&self) -> Option<TrackingStatus> {
        self.data
            .as_ref()
            .and_then(|d| d.tracking_status.as_ref())
            .and_then(|s| s.status)
    }

    /// Whether this is a `track_updated` event reporting `DELIVERED`.
    #[must_use]
    pub fn is_delivered_update(&self) -> bool {
        self.event == Some(ShippoEvent::TrackUpdated)
            && self.status() == Some(TrackingStatus::Delivered)
    }

    /// Tracking number, ignoring blank values.
    #[must_use]
    pub fn tracking_number(&self) -> Option<&str> {
        non_blank(self.data.as_ref()?.tracking_number.as_deref())
    }

    /// Tracking URL, ignoring blank values.
    #[must_use]
    pub fn tracking_url(&self) -> Option<&str> {
        non_blank(self.data.as_ref()?.tracking_url.as_deref())
    }

    /// Carrier status timestamp, ignoring blank values.
    #[must_use]
    pub fn status_date(&self) -> Option<&str> {
        let status = self.data.as_ref()?.tracking_status.as_ref()?;
        non_blank(status.status_date.as_deref())
    }

    /// Normalized metadata.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        Metadata::from_raw(self.data.as_ref().and_then(|d| d.metadata.as_ref()))
    }
}

/// Deserialize an optional field, treating a value of the wrong type as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
