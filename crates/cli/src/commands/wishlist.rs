//! Wishlist commands.

use knitwear_core::ProductId;
use knitwear_storefront::error::Result;
use knitwear_storefront::{FileStorage, ProductSummary, StorefrontConfig, WishlistStore};

use super::persisted;

fn load(config: &StorefrontConfig) -> WishlistStore<FileStorage> {
    WishlistStore::load(super::storage(config))
}

/// # Errors
///
/// Returns `Storage` if the updated wishlist could not be saved.
pub fn toggle(config: &StorefrontConfig, product: &ProductSummary) -> Result<()> {
    let mut store = load(config);
    let saved = store.toggle_wishlist(product.to_wishlist_item());
    persisted(&mut store)?;
    if saved {
        tracing::info!("Saved {} to wishlist", product.name);
    } else {
        tracing::info!("Removed {} from wishlist", product.name);
    }
    Ok(())
}

/// # Errors
///
/// Returns `Storage` if the updated wishlist could not be saved.
pub fn add(config: &StorefrontConfig, product: &ProductSummary) -> Result<()> {
    let mut store = load(config);
    let count = store.add_to_wishlist(product.to_wishlist_item()).len();
    persisted(&mut store)?;
    tracing::info!("Saved {} ({count} in wishlist)", product.name);
    Ok(())
}

/// Unsave a product; an id not in the wishlist changes nothing.
///
/// # Errors
///
/// Returns `Storage` if the updated wishlist could not be saved.
pub fn remove(config: &StorefrontConfig, id: ProductId) -> Result<()> {
    let mut store = load(config);
    let was_saved = store.state().contains(id);
    store.remove_from_wishlist(id);
    persisted(&mut store)?;
    if was_saved {
        tracing::info!("Removed product {id} from wishlist");
    } else {
        tracing::debug!(product_id = %id, "Product not in wishlist, nothing removed");
    }
    Ok(())
}

pub fn show(config: &StorefrontConfig) {
    let store = load(config);
    let wishlist = store.state();
    if wishlist.is_empty() {
        tracing::info!("Wishlist is empty");
        return;
    }
    for item in wishlist.items() {
        match item.original_price {
            Some(original) if original != item.price => tracing::info!(
                "#{}  {} {} (was {})",
                item.id,
                item.name,
                config.currency.format(item.price),
                config.currency.format(original),
            ),
            _ => tracing::info!(
                "#{}  {} {}",
                item.id,
                item.name,
                config.currency.format(item.price)
            ),
        }
    }
}
