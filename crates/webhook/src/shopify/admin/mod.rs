//! Shopify Admin API GraphQL client.
//!
//! Authenticates with a static Admin API access token (custom app) sent in
//! the `X-Shopify-Access-Token` header.

use std::sync::Arc;

use graphql_client::QueryBody;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{error, instrument};

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, queries::Operation};

mod fulfillment;
mod orders;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Security
///
/// The access token can mutate orders and fulfillments. It is never logged.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Create a client for the store described by `config`.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        Self::with_endpoint(config.graphql_endpoint(), config.access_token.clone())
    }

    /// Create a client for an explicit GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token,
            }),
        }
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation.
    ///
    /// Makes exactly one request. Every failure that comes with a response
    /// is logged with the full body before being returned as an error.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::RateLimited` on HTTP 429.
    /// Returns `AdminShopifyError::Unauthorized` on HTTP 401.
    /// Returns `AdminShopifyError::Status` on any other non-success status.
    /// Returns `AdminShopifyError::GraphQL` if the response carries errors
    /// or no data.
    /// Returns `AdminShopifyError::Parse` if a success body does not decode.
    /// Returns `AdminShopifyError::Http` on network failures.
    #[instrument(skip(self, operation, variables), fields(operation = operation.name))]
    pub(crate) async fn execute<T: DeserializeOwned>(
        &self,
        operation: &Operation,
        variables: Option<serde_json::Value>,
    ) -> Result<T, AdminShopifyError> {
        let body = QueryBody {
            variables: variables.unwrap_or(serde_json::Value::Null),
            query: operation.document,
            operation_name: operation.name,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);

        let text = response.text().await?;

        if !status.is_success() {
            error!(
                operation = operation.name,
                status = status.as_u16(),
                body = %text,
                "Shopify request failed"
            );

            return Err(match status {
                reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    AdminShopifyError::RateLimited(retry_after)
                }
                reqwest::StatusCode::UNAUTHORIZED => AdminShopifyError::Unauthorized(
                    "Invalid or expired access token".to_string(),
                ),
                _ => AdminShopifyError::Status {
                    status: status.as_u16(),
                    body: text,
                },
            });
        }

        let graphql_response: GraphQLResponse<T> = serde_json::from_str(&text).map_err(|e| {
            error!(
                operation = operation.name,
                error = %e,
                body = %text,
                "Failed to decode Shopify response"
            );
            AdminShopifyError::Parse(e)
        })?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            error!(
                operation = operation.name,
                body = %text,
                "Shopify returned GraphQL errors"
            );

            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError { message: e.message })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            error!(
                operation = operation.name,
                body = %text,
                "Shopify response has no data"
            );
            AdminShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
            }])
        })
    }
}
