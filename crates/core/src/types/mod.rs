//! Core types for the knitwear storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod variant;

pub use id::*;
pub use price::{Currency, CurrencyError, Price, PriceError, parse_price, parse_price_or_zero};
pub use variant::{VariantDraft, VariantTemplate, generate_variants};
