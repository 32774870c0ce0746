//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! kw-cli cart add --id 1 --name "Cable Knit" --price "₹715.00"
//! kw-cli cart update --id 1 --quantity 0
//! kw-cli cart show
//! ```

use knitwear_core::ProductId;
use knitwear_storefront::error::Result;
use knitwear_storefront::{
    CartState, CartStore, FileStorage, ProductSummary, StorefrontConfig, VariantSelection,
};

use super::persisted;

fn load(config: &StorefrontConfig) -> CartStore<FileStorage> {
    CartStore::load(super::storage(config))
}

/// Add one unit of the selected product.
///
/// # Errors
///
/// Returns `Storage` if the updated cart could not be saved.
pub fn add(
    config: &StorefrontConfig,
    product: &ProductSummary,
    selection: &VariantSelection,
) -> Result<()> {
    let mut store = load(config);
    let item = product.to_cart_item(selection);
    let quantity = store
        .add_to_cart(item)
        .get(product.id)
        .map_or(0, |line| line.quantity);
    persisted(&mut store)?;
    tracing::info!("Added {} (quantity now {quantity})", product.name);
    summarize(config, store.state());
    Ok(())
}

/// Remove a product line; an id not in the cart changes nothing.
///
/// # Errors
///
/// Returns `Storage` if the updated cart could not be saved.
pub fn remove(config: &StorefrontConfig, id: ProductId) -> Result<()> {
    let mut store = load(config);
    let before = store.state().items().len();
    store.remove_from_cart(id);
    persisted(&mut store)?;
    if store.state().items().len() == before {
        tracing::debug!(product_id = %id, "Product not in cart, nothing removed");
    } else {
        tracing::info!("Removed product {id}");
    }
    summarize(config, store.state());
    Ok(())
}

/// Set a line's quantity; zero or negative removes it.
///
/// # Errors
///
/// Returns `Storage` if the updated cart could not be saved.
pub fn update(config: &StorefrontConfig, id: ProductId, quantity: i64) -> Result<()> {
    let mut store = load(config);
    store.update_quantity(id, quantity);
    persisted(&mut store)?;
    summarize(config, store.state());
    Ok(())
}

/// # Errors
///
/// Returns `Storage` if the emptied cart could not be saved.
pub fn clear(config: &StorefrontConfig) -> Result<()> {
    let mut store = load(config);
    store.clear_cart();
    persisted(&mut store)?;
    tracing::info!("Cart cleared");
    Ok(())
}

pub fn show(config: &StorefrontConfig) {
    let store = load(config);
    let cart = store.state();
    if cart.is_empty() {
        tracing::info!("Cart is empty");
        return;
    }
    for line in cart.items() {
        let options = [line.selected_size.as_deref(), line.selected_color.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ");
        tracing::info!(
            "#{}  {} {}x {} @ {} = {}",
            line.id,
            line.name,
            line.quantity,
            if options.is_empty() { "-" } else { options.as_str() },
            config.currency.format(line.price),
            config.currency.format(line.line_total()),
        );
    }
    summarize(config, cart);
}

fn summarize(config: &StorefrontConfig, cart: &CartState) {
    tracing::info!(
        "{} item(s), total {}",
        cart.item_count(),
        config.currency.format(cart.total_amount())
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use knitwear_core::Price;
    use knitwear_storefront::StorefrontError;

    use super::*;
    use crate::commands::test_support::config_in;

    fn sweater() -> ProductSummary {
        ProductSummary {
            id: ProductId::new(1),
            name: "Cable Knit".to_string(),
            category: "Sweaters".to_string(),
            price: "₹715.00".to_string(),
            original_price: None,
            image: String::new(),
            variants: Vec::new(),
        }
    }

    #[test]
    fn test_add_twice_saves_quantity_two() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        add(&config, &sweater(), &VariantSelection::default()).unwrap();
        add(&config, &sweater(), &VariantSelection::default()).unwrap();

        let cart = load(&config);
        assert_eq!(cart.state().get(ProductId::new(1)).unwrap().quantity, 2);
        assert_eq!(cart.state().total_amount(), Price::from_minor_units(143_000));
    }

    #[test]
    fn test_remove_missing_id_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        add(&config, &sweater(), &VariantSelection::default()).unwrap();

        remove(&config, ProductId::new(99)).unwrap();

        assert_eq!(load(&config).state().items().len(), 1);
    }

    #[test]
    fn test_update_missing_id_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        update(&config, ProductId::new(99), 3).unwrap();

        assert!(load(&config).state().is_empty());
    }

    #[test]
    fn test_unwritable_state_dir_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("state");
        std::fs::write(&blocker, "not a directory").unwrap();
        let config = config_in(&blocker);

        let err = add(&config, &sweater(), &VariantSelection::default()).unwrap_err();
        assert!(matches!(err, StorefrontError::Storage(_)));

        let err = clear(&config).unwrap_err();
        assert!(matches!(err, StorefrontError::Storage(_)));
    }
}
