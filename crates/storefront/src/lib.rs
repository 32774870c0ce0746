//! Knitwear Storefront library.
//!
//! Client-side state for the shop front end: the cart and wishlist stores,
//! their persistence, and the checkout hand-off to the backend order API.
//!
//! # Architecture
//!
//! - Pure reducers (`CartState::reduce`, `WishlistState::reduce`) hold all
//!   transition logic and never touch storage
//! - [`store::Store`] owns a state value and writes its snapshot through a
//!   [`persistence::SnapshotStorage`] adapter after every dispatch
//! - Prices are parsed into minor units in [`catalog`], where backend data
//!   enters the storefront
//! - [`checkout`] is the only async path: one order request, no retries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod persistence;
pub mod services;
pub mod store;
pub mod wishlist;

pub use cart::{CartAction, CartLineItem, CartState, CartStore, NewCartItem};
pub use catalog::{ProductSummary, ProductVariant, VariantSelection};
pub use checkout::{CheckoutDetails, CheckoutOutcome, Notification, NotificationLevel};
pub use config::StorefrontConfig;
pub use error::StorefrontError;
pub use persistence::{FileStorage, MemoryStorage, SnapshotStorage, StorageError};
pub use store::{Snapshot, Store};
pub use wishlist::{WishlistAction, WishlistItem, WishlistState, WishlistStore};
