//! Checkout: turn the current cart into a single order submission.
//!
//! The flow is one-shot. The payload is built from the cart snapshot, sent
//! once, and on `201` the cart is cleared. Any failure leaves the cart as it
//! was and yields an error [`Notification`] for the shopper; resubmitting is
//! up to them.

use thiserror::Error;

use crate::cart::{CartState, CartStore};
use crate::persistence::SnapshotStorage;
use crate::services::orders::{
    OrderClient, OrderConfirmation, OrderError, OrderItem, OrderRequest, PaymentMethod,
    ShippingAddress,
};

/// Where the shopper lands after a successful order.
const ORDERS_PATH: &str = "/orders";

const GENERIC_FAILURE: &str = "Failed to place order. Please try again.";

/// Errors that stop a checkout attempt.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Order submission failed: {0}")]
    Order(#[from] OrderError),
}

impl CheckoutError {
    /// Message suitable for a toast; never exposes transport internals.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyCart => "Your cart is empty.".to_string(),
            Self::MissingField(field) => format!("Please fill in your {field}."),
            Self::InvalidEmail(_) => "Please enter a valid email address.".to_string(),
            Self::Order(OrderError::Timeout(_)) => {
                "The order service took too long to respond. Please try again.".to_string()
            }
            Self::Order(err) => err
                .server_message()
                .map_or_else(|| GENERIC_FAILURE.to_string(), ToOwned::to_owned),
        }
    }
}

/// Shopper input collected on the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Result of one checkout attempt.
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Order accepted; the cart has been cleared.
    Placed {
        confirmation: OrderConfirmation,
        notification: Notification,
        redirect_to: String,
    },
    /// Order not placed; the cart is untouched.
    Failed {
        error: CheckoutError,
        notification: Notification,
    },
}

impl CheckoutOutcome {
    #[must_use]
    pub const fn notification(&self) -> &Notification {
        match self {
            Self::Placed { notification, .. } | Self::Failed { notification, .. } => notification,
        }
    }

    #[must_use]
    pub const fn is_placed(&self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}

/// Build the order payload from a cart snapshot.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] for an empty cart, and
/// [`CheckoutError::MissingField`] / [`CheckoutError::InvalidEmail`] when the
/// shipping address is incomplete.
pub fn build_order_request(
    cart: &CartState,
    details: &CheckoutDetails,
) -> Result<OrderRequest, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    validate_address(&details.shipping_address)?;

    let items = cart
        .items()
        .iter()
        .map(|line| OrderItem {
            product_id: line.id,
            variant_id: line.variant_id,
            size: line.selected_size.clone(),
            color: line.selected_color.clone(),
            quantity: line.quantity,
            price: line.price.to_f64(),
        })
        .collect();

    Ok(OrderRequest {
        total_amount: cart.total_amount().to_f64(),
        payment_method: details.payment_method.clone(),
        shipping_address: trimmed(&details.shipping_address),
        items,
    })
}

/// Submit the cart as an order.
///
/// Clears the cart only when the API answers `201 Created`.
pub async fn place_order<P: SnapshotStorage>(
    cart: &mut CartStore<P>,
    client: &OrderClient,
    details: &CheckoutDetails,
) -> CheckoutOutcome {
    let result = match build_order_request(cart.state(), details) {
        Ok(request) => client.submit(&request).await.map_err(CheckoutError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(confirmation) => {
            cart.clear_cart();
            let redirect_to = confirmation
                .order_id
                .as_ref()
                .map_or_else(|| ORDERS_PATH.to_string(), |id| format!("{ORDERS_PATH}/{id}"));
            CheckoutOutcome::Placed {
                confirmation,
                notification: Notification::success("Order placed successfully!"),
                redirect_to,
            }
        }
        Err(error) => {
            tracing::warn!(error = %error, "Checkout failed, cart left unchanged");
            let notification = Notification::error(error.user_message());
            CheckoutOutcome::Failed {
                error,
                notification,
            }
        }
    }
}

fn validate_address(address: &ShippingAddress) -> Result<(), CheckoutError> {
    let required = [
        ("first name", &address.first_name),
        ("last name", &address.last_name),
        ("email", &address.email),
        ("phone number", &address.phone),
        ("address", &address.address),
        ("city", &address.city),
        ("state", &address.state),
        ("zip code", &address.zip_code),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(CheckoutError::MissingField(*field));
    }

    let email = address.email.trim();
    let valid_email = !email.contains(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
    if !valid_email {
        return Err(CheckoutError::InvalidEmail(email.to_owned()));
    }

    Ok(())
}

fn trimmed(address: &ShippingAddress) -> ShippingAddress {
    let t = |s: &String| s.trim().to_owned();
    ShippingAddress {
        first_name: t(&address.first_name),
        last_name: t(&address.last_name),
        email: t(&address.email),
        phone: t(&address.phone),
        address: t(&address.address),
        city: t(&address.city),
        state: t(&address.state),
        zip_code: t(&address.zip_code),
    }
}
