//! Order-name extraction from free-text metadata and fulfillment selection.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::shopify::FulfillmentSummary;

/// `Order #1042`, `order#1042`, `ORDER   #1042`.
static ORDER_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Order\s*#(\d+)").expect("Invalid regex"));

/// Extract a Shopify order name (`#<digits>`) from free text.
///
/// Only the first match is used.
#[must_use]
pub fn extract_order_name(text: &str) -> Option<String> {
    ORDER_NAME_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|digits| format!("#{}", digits.as_str()))
}

/// Pick the most recently created fulfillment.
///
/// Ties keep the earlier entry in response order. Missing or unparseable
/// timestamps rank older than any valid one.
#[must_use]
pub fn latest_fulfillment(fulfillments: &[FulfillmentSummary]) -> Option<&FulfillmentSummary> {
    let mut latest: Option<(&FulfillmentSummary, Option<DateTime<Utc>>)> = None;

    for fulfillment in fulfillments {
        let created_at = parse_timestamp(fulfillment.created_at.as_deref());
        match latest {
            Some((_, best)) if created_at <= best => {}
            _ => latest = Some((fulfillment, created_at)),
        }
    }

    latest.map(|(fulfillment, _)| fulfillment)
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kit_return_core::FulfillmentId;

    fn summary(id: u64, created_at: Option<&str>) -> FulfillmentSummary {
        FulfillmentSummary {
            id: FulfillmentId::parse(&id.to_string()).unwrap(),
            status: Some("SUCCESS".to_string()),
            created_at: created_at.map(String::from),
        }
    }

    #[test]
    fn test_extract_order_name() {
        assert_eq!(extract_order_name("Order #1042"), Some("#1042".to_string()));
        assert_eq!(extract_order_name("order#77"), Some("#77".to_string()));
        assert_eq!(
            extract_order_name("Return kit for ORDER   #5 (Jane)"),
            Some("#5".to_string())
        );
    }

    #[test]
    fn test_extract_order_name_takes_first_match() {
        assert_eq!(
            extract_order_name("Order #1 replaces Order #2"),
            Some("#1".to_string())
        );
    }

    #[test]
    fn test_extract_order_name_rejects_other_text() {
        assert_eq!(extract_order_name("#1042"), None);
        assert_eq!(extract_order_name("Order 1042"), None);
        assert_eq!(extract_order_name("Order #"), None);
        assert_eq!(extract_order_name(""), None);
    }

    #[test]
    fn test_latest_fulfillment_picks_newest() {
        let fulfillments = vec![
            summary(1, Some("2025-07-01T10:00:00Z")),
            summary(2, Some("2025-07-03T10:00:00Z")),
            summary(3, Some("2025-07-02T10:00:00Z")),
        ];
        let latest = latest_fulfillment(&fulfillments).unwrap();
        assert_eq!(latest.id.as_str(), "gid://shopify/Fulfillment/2");
    }

    #[test]
    fn test_latest_fulfillment_compares_across_offsets() {
        let fulfillments = vec![
            summary(1, Some("2025-07-01T12:00:00+02:00")),
            summary(2, Some("2025-07-01T11:00:00Z")),
        ];
        let latest = latest_fulfillment(&fulfillments).unwrap();
        assert_eq!(latest.id.as_str(), "gid://shopify/Fulfillment/2");
    }

    #[test]
    fn test_latest_fulfillment_ties_keep_first() {
        let fulfillments = vec![
            summary(1, Some("2025-07-01T10:00:00Z")),
            summary(2, Some("2025-07-01T10:00:00Z")),
        ];
        let latest = latest_fulfillment(&fulfillments).unwrap();
        assert_eq!(latest.id.as_str(), "gid://shopify/Fulfillment/1");
    }

    #[test]
    fn test_latest_fulfillment_unparseable_ranks_oldest() {
        let fulfillments = vec![
            summary(1, Some("yesterday")),
            summary(2, None),
            summary(3, Some("2020-01-01T00:00:00Z")),
        ];
        let latest = latest_fulfillment(&fulfillments).unwrap();
        assert_eq!(latest.id.as_str(), "gid://shopify/Fulfillment/3");

        let only_bad = vec![summary(4, Some("nope")), summary(5, None)];
        let latest = latest_fulfillment(&only_bad).unwrap();
        assert_eq!(latest.id.as_str(), "gid://shopify/Fulfillment/4");
    }

    #[test]
    fn test_latest_fulfillment_empty() {
        assert!(latest_fulfillment(&[]).is_none());
    }
}
