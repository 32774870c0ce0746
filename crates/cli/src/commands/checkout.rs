//! Checkout command.
//!
//! # Usage
//!
//! ```bash
//! kw-cli checkout \
//!     --first-name Asha --last-name Rao --email asha@example.in \
//!     --phone 9876543210 --address "12 MG Road" --city Bengaluru \
//!     --state Karnataka --zip-code 560001
//! ```
//!
//! # Environment Variables
//!
//! - `KNITWEAR_API_BASE_URL` - Backend API base URL
//! - `KNITWEAR_API_TOKEN` - Bearer token sent with the order, if set

use clap::Args;
use knitwear_storefront::checkout::place_order;
use knitwear_storefront::error::{Result, StorefrontError};
use knitwear_storefront::services::{OrderClient, PaymentMethod, ShippingAddress};
use knitwear_storefront::{CartStore, CheckoutDetails, CheckoutOutcome, StorefrontConfig};

#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    #[arg(short, long)]
    email: String,

    #[arg(long)]
    phone: String,

    /// Street address
    #[arg(long)]
    address: String,

    #[arg(long)]
    city: String,

    #[arg(long)]
    state: String,

    #[arg(long)]
    zip_code: String,

    /// Payment method label
    #[arg(long, default_value = "cod")]
    payment_method: String,
}

impl CheckoutArgs {
    fn details(self) -> Result<CheckoutDetails> {
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|e| StorefrontError::BadRequest(e.to_string()))?;

        Ok(CheckoutDetails {
            shipping_address: ShippingAddress {
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                phone: self.phone,
                address: self.address,
                city: self.city,
                state: self.state,
                zip_code: self.zip_code,
            },
            payment_method,
        })
    }
}

/// Submit the saved cart as an order.
///
/// # Errors
///
/// Returns the checkout error when the order is not placed; the saved cart
/// is left as it was.
pub async fn run(config: &StorefrontConfig, args: CheckoutArgs) -> Result<()> {
    let details = args.details()?;
    let client = OrderClient::new(&config.api)?;
    let mut cart = CartStore::load(super::storage(config));

    tracing::info!(
        "Placing order for {} item(s), total {}",
        cart.state().item_count(),
        config.currency.format(cart.state().total_amount())
    );

    match place_order(&mut cart, &client, &details).await {
        CheckoutOutcome::Placed {
            notification,
            redirect_to,
            ..
        } => {
            tracing::info!("{} -> {redirect_to}", notification.message);
            if let Some(e) = cart.take_persist_error() {
                tracing::warn!(error = %e, "Order placed but the saved cart could not be cleared");
            }
            Ok(())
        }
        CheckoutOutcome::Failed { error, .. } => Err(error.into()),
    }
}
