//! Webhook metadata attached to a Shippo shipment.
//!
//! Shippo echoes back whatever metadata string was set when the label was
//! purchased. Depending on who bought the label it is a JSON-encoded object
//! (`{"shopify_order_gid": "...", "kit_fulfillment_id": "..."}`), a free-text
//! note such as `"Order #1042"`, or missing entirely.

use serde_json::{Map, Value};

/// Normalized shape of the `data.metadata` field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Metadata {
    /// A JSON object, either sent as an encoded string or inline.
    Structured(Map<String, Value>),
    /// Anything else, kept verbatim for text matching.
    Freeform(String),
    /// No metadata, `null`, or a blank string.
    #[default]
    Absent,
}

impl Metadata {
    /// Normalize the raw `metadata` value from a webhook payload.
    ///
    /// Never fails: text that does not decode to a JSON object is kept as
    /// [`Metadata::Freeform`].
    #[must_use]
    pub fn from_raw(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::Object(map)) => Self::Structured(map.clone()),
            Some(Value::String(s)) => Self::from_text(s),
            Some(other) => Self::Freeform(other.to_string()),
        }
    }

    /// Normalize a metadata string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return Self::Absent;
        }

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self::Structured(map),
            _ => Self::Freeform(text.to_string()),
        }
    }

    /// Look up a field of structured metadata.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Structured(map) => map.get(key),
            Self::Freeform(_) | Self::Absent => None,
        }
    }

    /// Return the first of `keys` whose value `parse` accepts.
    ///
    /// Keys are tried in order, so earlier keys take precedence.
    pub fn first_field<T>(&self, keys: &[&str], parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
        keys.iter()
            .filter_map(|key| self.field(key))
            .find_map(parse)
    }

    /// Raw text for free-form metadata.
    #[must_use]
    pub fn freeform_text(&self) -> Option<&str> {
        match self {
            Self::Freeform(text) => Some(text),
            Self::Structured(_) | Self::Absent => None,
        }
    }

    /// Short label for log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::Freeform(_) => "freeform",
            Self::Absent => "absent",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::OrderGid;
    use serde_json::json;

    #[test]
    fn test_absent_variants() {
        assert_eq!(Metadata::from_raw(None), Metadata::Absent);
        assert_eq!(Metadata::from_raw(Some(&Value::Null)), Metadata::Absent);
        assert_eq!(Metadata::from_raw(Some(&json!("  "))), Metadata::Absent);
    }

    #[test]
    fn test_json_encoded_object_parses_to_exact_fields() {
        let raw = json!(r#"{"shopify_order_gid":"gid://X","kit_fulfillment_id":"gid://Y"}"#);
        let metadata = Metadata::from_raw(Some(&raw));

        let Metadata::Structured(fields) = &metadata else {
            panic!("expected structured metadata, got {metadata:?}");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["shopify_order_gid"], json!("gid://X"));
        assert_eq!(fields["kit_fulfillment_id"], json!("gid://Y"));
    }

    #[test]
    fn test_inline_object_is_structured() {
        let raw = json!({"kit_fulfillment_id": "gid://shopify/Fulfillment/1"});
        assert!(matches!(
            Metadata::from_raw(Some(&raw)),
            Metadata::Structured(_)
        ));
    }

    #[test]
    fn test_plain_text_is_freeform() {
        let metadata = Metadata::from_raw(Some(&json!("Order #1042")));
        assert_eq!(metadata.freeform_text(), Some("Order #1042"));
        assert!(metadata.field("shopify_order_gid").is_none());
    }

    #[test]
    fn test_json_scalar_string_is_freeform() {
        // Valid JSON, but not an object
        let metadata = Metadata::from_raw(Some(&json!("1042")));
        assert_eq!(metadata, Metadata::Freeform("1042".to_string()));
    }

    #[test]
    fn test_malformed_json_is_freeform() {
        let metadata = Metadata::from_raw(Some(&json!("{\"shopify_order_gid\": ")));
        assert_eq!(metadata.kind(), "freeform");
    }

    #[test]
    fn test_first_field_skips_empty_values() {
        let metadata = Metadata::from_raw(Some(&json!({
            "shopify_order_gid": "",
            "shopify_order_id": "gid://shopify/Order/7"
        })));

        let gid = metadata.first_field(&["shopify_order_gid", "shopify_order_id"], OrderGid::from_json);
        assert_eq!(gid.unwrap().as_str(), "gid://shopify/Order/7");
    }

    #[test]
    fn test_first_field_respects_key_order() {
        let metadata = Metadata::from_raw(Some(&json!({
            "shopify_order_gid": "gid://shopify/Order/1",
            "shopify_order_id": "gid://shopify/Order/2"
        })));

        let gid = metadata.first_field(&["shopify_order_gid", "shopify_order_id"], OrderGid::from_json);
        assert_eq!(gid.unwrap().as_str(), "gid://shopify/Order/1");
    }
}
