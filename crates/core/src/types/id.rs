//! Newtype Shopify global IDs for type-safe entity references.
//!
//! Use the `define_gid!` macro to create type-safe GID wrappers that prevent
//! accidentally passing a fulfillment ID where an order GID is expected.

use thiserror::Error;

/// Prefix shared by every Shopify Admin API global ID.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Errors produced when parsing a GID from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GidError {
    /// The value was empty or whitespace only.
    #[error("identifier is empty")]
    Empty,
}

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` which trims input and expands bare numeric IDs to
///   `gid://shopify/<Resource>/<n>`
/// - `from_json()` accepting JSON strings and unsigned numbers
/// - `names_resource()` to detect a Shopify GID of another resource type
/// - `Display`, `AsRef<str>` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use kit_return_core::define_gid;
/// define_gid!(ProductGid, "Product");
///
/// let id = ProductGid::parse(" 42 ").unwrap();
/// assert_eq!(id.as_str(), "gid://shopify/Product/42");
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource type this GID refers to.
            pub const RESOURCE: &'static str = $resource;

            /// Parse a GID from untrusted input.
            ///
            /// Any other non-blank value is kept as an opaque identifier,
            /// including a Shopify GID of another resource type.
            ///
            /// # Errors
            ///
            /// Returns `GidError::Empty` for blank input.
            pub fn parse(raw: &str) -> ::core::result::Result<Self, $crate::types::id::GidError> {
                let value = raw.trim();
                if value.is_empty() {
                    return Err($crate::types::id::GidError::Empty);
                }

                if value.bytes().all(|b| b.is_ascii_digit()) {
                    return Ok(Self(format!(
                        "{}{}/{}",
                        $crate::types::id::GID_PREFIX,
                        $resource,
                        value
                    )));
                }

                Ok(Self(value.to_string()))
            }

            /// Whether the value can refer to this resource type.
            ///
            /// False only for a `gid://shopify/...` value naming another
            /// resource; opaque values are given the benefit of the doubt.
            #[must_use]
            pub fn names_resource(&self) -> bool {
                self.0
                    .strip_prefix($crate::types::id::GID_PREFIX)
                    .is_none_or(|rest| rest.starts_with(concat!($resource, "/")))
            }

            /// Parse a GID from a loosely-typed JSON value.
            ///
            /// Strings go through [`Self::parse`]; unsigned integers are
            /// treated as legacy numeric IDs. Anything else yields `None`.
            #[must_use]
            pub fn from_json(value: &::serde_json::Value) -> Option<Self> {
                match value {
                    ::serde_json::Value::String(s) => Self::parse(s).ok(),
                    ::serde_json::Value::Number(n) => {
                        n.as_u64().and_then(|n| Self::parse(&n.to_string()).ok())
                    }
                    _ => None,
                }
            }

            /// Get the GID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::convert::AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::GidError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_gid!(OrderGid, "Order");
define_gid!(FulfillmentId, "Fulfillment");
