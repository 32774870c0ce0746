//! Unified error type for front ends driving the storefront.
//!
//! Library functions return their own module errors; `StorefrontError` wraps
//! them so a front end has one type to propagate and one place that decides
//! what the shopper is allowed to see.

use knitwear_core::PriceError;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::persistence::StorageError;
use crate::services::orders::OrderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Snapshot storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Order API call failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Checkout was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// A price string could not be parsed.
    #[error("Price error: {0}")]
    Price(#[from] PriceError),

    /// Referenced item does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input from the shopper.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// Whether this is a fault on our side rather than bad input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Storage(_) | Self::Order(_))
    }

    /// Message safe to show the shopper.
    ///
    /// Internal failures get a generic message; details go to the log.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Storage(_) => "Something went wrong on our end.".to_string(),
            Self::Order(err) => err
                .server_message()
                .map_or_else(|| "External service error".to_string(), ToOwned::to_owned),
            Self::Checkout(err) => err.user_message(),
            Self::Price(_) => "Invalid price".to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }

    /// Log the error, at `error` for internal faults and `warn` otherwise.
    pub fn report(&self) {
        if self.is_internal() {
            tracing::error!(error = %self, "Storefront error");
        } else {
            tracing::warn!(error = %self, "Storefront request rejected");
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::NotFound("product 12".to_string());
        assert_eq!(err.to_string(), "Not found: product 12");

        let err = StorefrontError::BadRequest("quantity".to_string());
        assert_eq!(err.to_string(), "Bad request: quantity");
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = StorefrontError::from(StorageError::InvalidKey("../x".to_string()));
        assert!(err.is_internal());
        assert!(!err.user_message().contains("../x"));

        let err = StorefrontError::from(OrderError::Api {
            status: 502,
            message: None,
        });
        assert_eq!(err.user_message(), "External service error");
    }

    #[test]
    fn test_checkout_messages_pass_through() {
        let err = StorefrontError::from(CheckoutError::EmptyCart);
        assert!(!err.is_internal());
        assert_eq!(err.user_message(), "Your cart is empty.");
    }
}
