//! Mapping from backend product data into cart and wishlist items.
//!
//! The product API returns display prices as strings (`"₹1,299.00"`). This is
//! the boundary where they are parsed into minor units; an unparsable price is
//! logged and treated as zero rather than rejected.

use knitwear_core::{Price, ProductId, VariantId, parse_price_or_zero};
use serde::{Deserialize, Serialize};

use crate::cart::NewCartItem;
use crate::wishlist::WishlistItem;

/// Product summary as returned by the backend product endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    pub price: String,
    #[serde(default, alias = "original_price")]
    pub original_price: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

/// One size/color combination of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    /// Overrides the product price when present.
    #[serde(default)]
    pub price: Option<String>,
}

/// The shopper's choice on the product page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSelection {
    pub size: Option<String>,
    pub color: Option<String>,
}

impl ProductSummary {
    /// Parsed product price.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        parse_price_or_zero(&self.price)
    }

    /// Find the variant matching a size/color selection.
    ///
    /// Comparison is case-insensitive; an unset attribute on either side
    /// matches anything.
    #[must_use]
    pub fn find_variant(&self, selection: &VariantSelection) -> Option<&ProductVariant> {
        fn matches(wanted: Option<&String>, actual: Option<&String>) -> bool {
            match (wanted, actual) {
                (Some(w), Some(a)) => w.trim().eq_ignore_ascii_case(a.trim()),
                _ => true,
            }
        }

        self.variants.iter().find(|v| {
            matches(selection.size.as_ref(), v.size.as_ref())
                && matches(selection.color.as_ref(), v.color.as_ref())
        })
    }

    /// Build the item dispatched to the cart for this product and selection.
    #[must_use]
    pub fn to_cart_item(&self, selection: &VariantSelection) -> NewCartItem {
        let variant = self.find_variant(selection);
        let price = variant
            .and_then(|v| v.price.as_deref())
            .map_or_else(|| self.unit_price(), parse_price_or_zero);

        NewCartItem {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
            price,
            image: self.image.clone(),
            variant_id: variant.map(|v| v.id),
            selected_size: selection.size.clone(),
            selected_color: selection.color.clone(),
        }
    }

    /// Build the wishlist entry for this product.
    #[must_use]
    pub fn to_wishlist_item(&self) -> WishlistItem {
        WishlistItem {
            id: self.id,
            name: self.name.clone(),
            price: self.unit_price(),
            image: self.image.clone(),
            category: self.category.clone(),
            original_price: self.original_price.as_deref().map(parse_price_or_zero),
        }
    }
}
