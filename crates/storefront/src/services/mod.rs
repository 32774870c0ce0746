//! Clients for the remote backend API.
//!
//! # Services
//!
//! - `orders` - Order submission (`POST /orders`)

pub mod orders;

pub use orders::{
    OrderClient, OrderConfirmation, OrderError, OrderItem, OrderRequest, PaymentMethod,
    ShippingAddress,
};
