//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **CRITICAL: This module holds the high-privilege Shopify Admin API token.**
//!
//! The kit return flow only needs:
//! - Orders: tag add, lookup by name
//! - Fulfillments: tracking info update, timeline events, parent order lookup
//!
//! # Architecture
//!
//! - Hand-written GraphQL documents in [`queries`], sent with variables
//! - Request envelopes use `graphql_client::QueryBody`
//! - Direct API calls to Shopify (no local state)
//! - Single attempt per call: no retries, no local timeout
//!
//! # Example
//!
//! ```rust,ignore
//! use kit_return_webhook::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config.shopify);
//!
//! let order = client.find_order_by_name("#1042").await?;
//! let user_errors = client
//!     .add_order_tags(&order_gid, &["kit_return_received".to_string()])
//!     .await?;
//! ```

mod admin;
pub mod queries;
pub mod types;

pub use admin::AdminClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Full response body.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A GraphQL error returned by the Shopify Admin API.
///
/// Only the message is kept; the full response body is logged when the
/// error is raised.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field 'tagsAdd' doesn't exist".to_string(),
            },
            GraphQLError {
                message: "Invalid global id".to_string(),
            },
        ];
        let err = AdminShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'tagsAdd' doesn't exist; Invalid global id"
        );
    }

    #[test]
    fn test_status_error_includes_body() {
        let err = AdminShopifyError::Status {
            status: 502,
            body: "upstream unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 502: upstream unavailable");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = AdminShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_unauthorized_error() {
        let err = AdminShopifyError::Unauthorized("Invalid token".to_string());
        assert_eq!(err.to_string(), "Unauthorized: Invalid token");
    }
}
