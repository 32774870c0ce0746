//! Order API client.
//!
//! Submits one order per checkout to `POST {base}/orders`. Only `201 Created`
//! counts as success; every other status, transport failure, or timeout is
//! an [`OrderError`]. Requests are never retried.

use knitwear_core::{ProductId, VariantId};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::{ApiConfig, bearer};

/// Longest slice of a response body kept for logs.
const LOG_BODY_LIMIT: usize = 500;

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No response within the configured timeout.
    #[error("Order request timed out after {0} seconds")]
    Timeout(u64),

    /// API answered with something other than 201 Created.
    #[error("API error: {status}{}", .message.as_ref().map(|m| format!(" - {m}")).unwrap_or_default())]
    Api {
        status: u16,
        /// Message extracted from the response body, if the server sent one.
        message: Option<String>,
    },

    /// Client could not be configured.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl OrderError {
    /// Message the server gave for the failure, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Payment method label sent with the order (e.g. `"cod"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    /// Cash on delivery.
    #[must_use]
    pub fn cash_on_delivery() -> Self {
        Self("cod".to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::cash_on_delivery()
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        if label.is_empty() {
            return Err(OrderError::Config("payment method cannot be empty".to_string()));
        }
        Ok(Self(label))
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shipping address block of the order payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// One line of the order payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub quantity: u32,
    /// Unit price in standard currency units.
    pub price: f64,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub total_amount: f64,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub items: Vec<OrderItem>,
}

/// What the API told us about an accepted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Order id, when the response body carries one.
    pub order_id: Option<String>,
}

/// Client for the backend order API.
#[derive(Clone)]
pub struct OrderClient {
    client: reqwest::Client,
    endpoint: String,
    timeout_secs: u64,
}

impl OrderClient {
    /// Create a new order API client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, OrderError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&bearer(token))
                .map_err(|e| OrderError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.order_timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint("orders"),
            timeout_secs: config.order_timeout.as_secs(),
        })
    }

    /// URL orders are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Submit an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Timeout`] if the API does not answer in time,
    /// [`OrderError::Api`] for any status other than 201, and
    /// [`OrderError::Http`] for transport failures.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn submit(&self, request: &OrderRequest) -> Result<OrderConfirmation, OrderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();

        // Once the server has answered 201 the order exists; an unreadable
        // body only costs us the order id.
        if status == StatusCode::CREATED {
            let body = response.text().await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Order created but response body unreadable");
                String::new()
            });
            let confirmation = OrderConfirmation {
                order_id: extract_order_id(&body),
            };
            tracing::info!(order_id = ?confirmation.order_id, "Order created");
            return Ok(confirmation);
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        tracing::warn!(
            status = %status,
            body = %body.chars().take(LOG_BODY_LIMIT).collect::<String>(),
            "Order API rejected submission"
        );
        Err(OrderError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        })
    }

    fn classify(&self, error: reqwest::Error) -> OrderError {
        if error.is_timeout() {
            OrderError::Timeout(self.timeout_secs)
        } else {
            OrderError::Http(error)
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks at `message`, `error` (string or `{message}`), then `detail`.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let candidates = [
        value.get("message"),
        value.get("error").and_then(|e| e.get("message").or(Some(e))),
        value.get("detail"),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(serde_json::Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(ToOwned::to_owned)
}

/// Pull the new order id out of a 201 body (`id`, `order_id`, or `data.id`).
fn extract_order_id(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    [
        value.get("id"),
        value.get("order_id"),
        value.get("data").and_then(|d| d.get("id")),
        value.get("order").and_then(|o| o.get("id")),
    ]
    .into_iter()
    .flatten()
    .find_map(|id| match id {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(r#"{"message":"Out of stock"}"#).as_deref(),
            Some("Out of stock")
        );
        assert_eq!(
            extract_error_message(r#"{"error":"Invalid pincode"}"#).as_deref(),
            Some("Invalid pincode")
        );
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"Token expired"}}"#).as_deref(),
            Some("Token expired")
        );
        assert_eq!(
            extract_error_message(r#"{"detail":"Not allowed"}"#).as_deref(),
            Some("Not allowed")
        );
        assert_eq!(extract_error_message(r#"{"message":"  "}"#), None);
        assert_eq!(extract_error_message("<html>502</html>"), None);
        assert_eq!(extract_error_message(""), None);
    }

    #[test]
    fn test_extract_order_id_variants() {
        assert_eq!(extract_order_id(r#"{"id":42}"#).as_deref(), Some("42"));
        assert_eq!(
            extract_order_id(r#"{"order_id":"ORD-9"}"#).as_deref(),
            Some("ORD-9")
        );
        assert_eq!(
            extract_order_id(r#"{"data":{"id":"abc"}}"#).as_deref(),
            Some("abc")
        );
        assert_eq!(extract_order_id("{}"), None);
        assert_eq!(extract_order_id(""), None);
    }

    #[test]
    fn test_payload_shape() {
        let request = OrderRequest {
            total_amount: 1430.0,
            payment_method: PaymentMethod::cash_on_delivery(),
            shipping_address: ShippingAddress {
                first_name: "Asha".to_string(),
                zip_code: "560001".to_string(),
                ..ShippingAddress::default()
            },
            items: vec![OrderItem {
                product_id: ProductId::new(1),
                variant_id: None,
                size: Some("M".to_string()),
                color: None,
                quantity: 2,
                price: 715.0,
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["payment_method"], "cod");
        assert_eq!(json["shipping_address"]["firstName"], "Asha");
        assert_eq!(json["shipping_address"]["zipCode"], "560001");
        assert_eq!(json["items"][0]["product_id"], 1);
        assert_eq!(json["items"][0]["price"], 715.0);
        assert!(json["items"][0].get("variant_id").is_none());
        assert!(json["items"][0].get("color").is_none());
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("COD".parse::<PaymentMethod>().unwrap().as_str(), "cod");
        assert!(" ".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_api_error_display() {
        let err = OrderError::Api {
            status: 422,
            message: Some("Invalid phone".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 422 - Invalid phone");
        assert_eq!(err.server_message(), Some("Invalid phone"));

        let err = OrderError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 500");
    }

    #[test]
    fn test_client_endpoint() {
        let mut config =
            ApiConfig::new("http://127.0.0.1:8000/api", Duration::from_secs(3)).unwrap();
        config.token = Some(SecretString::from("tok_9fK2xQ7pL3mZ8vB1"));
        let client = OrderClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:8000/api/orders");
    }
}
