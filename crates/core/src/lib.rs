//! Knitwear Core - Shared types library.
//!
//! This crate provides the domain types used across the knitwear workspace:
//! - `storefront` - Cart, wishlist and checkout state for the shop front end
//! - `cli` - Command-line front end that drives the storefront stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, minor-unit prices, and product variant drafts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
