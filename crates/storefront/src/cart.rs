//! Shopping cart state and its reducer.
//!
//! The cart keeps one line per product id, in first-added order. The total is
//! derived: it is recomputed after every transition and whenever a snapshot is
//! loaded, so a stale persisted total can never leak into the UI.

use knitwear_core::{Price, ProductId, VariantId};
use serde::{Deserialize, Serialize};

use crate::persistence::SnapshotStorage;
use crate::store::{Snapshot, Store};

/// A product as it is added to the cart, before it has a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

/// One row of the cart.
///
/// Identity is the product `id` alone; the variant fields record the
/// selection made when the line was first added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub image: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<String>,
}

impl CartLineItem {
    /// Price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.saturating_mul(self.quantity)
    }

    fn from_new(item: NewCartItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            price: item.price,
            image: item.image,
            quantity: 1,
            variant_id: item.variant_id,
            selected_size: item.selected_size,
            selected_color: item.selected_color,
        }
    }
}

/// Intents the UI can dispatch against the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add one unit of a product; merges into an existing line with the same id.
    Add(NewCartItem),
    /// Drop the line for a product, if present.
    Remove(ProductId),
    /// Set a line's quantity; zero or negative removes the line.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Empty the cart.
    Clear,
}

/// Cart contents plus the derived total.
///
/// Fields are private so the total can only change through [`CartState::reduce`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PersistedCart")]
pub struct CartState {
    items: Vec<CartLineItem>,
    total_amount: Price,
}

/// Wire shape of a stored cart snapshot.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCart {
    #[serde(default)]
    items: Vec<CartLineItem>,
}

impl From<PersistedCart> for CartState {
    fn from(persisted: PersistedCart) -> Self {
        let mut items: Vec<CartLineItem> = Vec::with_capacity(persisted.items.len());
        for line in persisted.items.into_iter().filter(|line| line.quantity > 0) {
            match items.iter_mut().find(|existing| existing.id == line.id) {
                Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
                None => items.push(line),
            }
        }
        Self::with_items(items)
    }
}

impl CartState {
    fn with_items(items: Vec<CartLineItem>) -> Self {
        let mut state = Self {
            items,
            total_amount: Price::ZERO,
        };
        state.recompute_total();
        state
    }

    /// Lines in first-added order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub const fn total_amount(&self) -> Price {
        self.total_amount
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Look up the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply an action, returning the next state.
    ///
    /// Missing ids on `Remove` and `UpdateQuantity` are no-ops.
    #[must_use]
    pub fn reduce(mut self, action: CartAction) -> Self {
        match action {
            CartAction::Add(item) => {
                // Re-adding a product bumps the existing line and keeps its
                // original size/color selection.
                if let Some(line) = self.items.iter_mut().find(|line| line.id == item.id) {
                    line.quantity = line.quantity.saturating_add(1);
                } else {
                    self.items.push(CartLineItem::from_new(item));
                }
            }
            CartAction::Remove(id) => self.items.retain(|line| line.id != id),
            CartAction::UpdateQuantity { id, quantity } => {
                if quantity <= 0 {
                    self.items.retain(|line| line.id != id);
                } else if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
                    line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
                }
            }
            CartAction::Clear => self.items.clear(),
        }
        self.recompute_total();
        self
    }

    fn recompute_total(&mut self) {
        self.total_amount = self.items.iter().map(CartLineItem::line_total).sum();
    }
}

impl Snapshot for CartState {
    type Action = CartAction;

    const STORAGE_KEY: &'static str = "cart";

    fn transition(self, action: Self::Action) -> Self {
        self.reduce(action)
    }
}

/// Cart state owned by the application root, persisted after every change.
pub type CartStore<P> = Store<CartState, P>;

impl<P: SnapshotStorage> Store<CartState, P> {
    /// Add one unit of `item`.
    pub fn add_to_cart(&mut self, item: NewCartItem) -> &CartState {
        tracing::debug!(product_id = %item.id, "Adding to cart");
        self.dispatch(CartAction::Add(item))
    }

    /// Remove the line for `id`; a missing id leaves the cart unchanged.
    pub fn remove_from_cart(&mut self, id: ProductId) -> &CartState {
        tracing::debug!(product_id = %id, "Removing from cart");
        self.dispatch(CartAction::Remove(id))
    }

    /// Set the quantity for `id`; zero or below removes the line.
    pub fn update_quantity(&mut self, id: ProductId, quantity: i64) -> &CartState {
        tracing::debug!(product_id = %id, quantity, "Updating cart quantity");
        self.dispatch(CartAction::UpdateQuantity { id, quantity })
    }

    pub fn clear_cart(&mut self) -> &CartState {
        tracing::debug!("Clearing cart");
        self.dispatch(CartAction::Clear)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: i64, price_minor: i64) -> NewCartItem {
        NewCartItem {
            id: ProductId::new(id),
            name: format!("Cable Knit {id}"),
            category: "Sweaters".to_string(),
            price: Price::from_minor_units(price_minor),
            image: format!("/images/{id}.jpg"),
            variant_id: None,
            selected_size: Some("M".to_string()),
            selected_color: Some("Cream".to_string()),
        }
    }

    fn expected_total(state: &CartState) -> i64 {
        state
            .items()
            .iter()
            .map(|l| l.price.minor_units() * i64::from(l.quantity))
            .sum()
    }

    #[test]
    fn test_add_new_item_appends_with_quantity_one() {
        let state = CartState::default().reduce(CartAction::Add(item(1, 71_500)));
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 1);
        assert_eq!(state.total_amount().minor_units(), 71_500);
    }

    #[test]
    fn test_add_existing_item_increments_quantity() {
        let state = CartState::default()
            .reduce(CartAction::Add(item(1, 71_500)))
            .reduce(CartAction::Add(item(1, 71_500)));
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 2);
        assert_eq!(state.total_amount(), Price::from_minor_units(143_000));
    }

    #[test]
    fn test_add_same_product_other_variant_merges_into_first_line() {
        let mut large_navy = item(1, 71_500);
        large_navy.selected_size = Some("L".to_string());
        large_navy.selected_color = Some("Navy".to_string());

        let state = CartState::default()
            .reduce(CartAction::Add(item(1, 71_500)))
            .reduce(CartAction::Add(large_navy));

        // Lines are keyed by product, so the second selection is folded into
        // the first line and its size/color are dropped.
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 2);
        assert_eq!(state.items()[0].selected_size.as_deref(), Some("M"));
        assert_eq!(state.items()[0].selected_color.as_deref(), Some("Cream"));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let state = CartState::default()
            .reduce(CartAction::Add(item(3, 100)))
            .reduce(CartAction::Add(item(1, 100)))
            .reduce(CartAction::Add(item(3, 100)))
            .reduce(CartAction::Add(item(2, 100)));
        let ids: Vec<i64> = state.items().iter().map(|l| l.id.as_i64()).collect();
        assert_eq!(ids, [3, 1, 2]);
        assert_eq!(state.item_count(), 4);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let state = CartState::default()
            .reduce(CartAction::Add(item(1, 250)))
            .reduce(CartAction::UpdateQuantity {
                id: ProductId::new(1),
                quantity: 4,
            });
        assert_eq!(state.get(ProductId::new(1)).unwrap().quantity, 4);
        assert_eq!(state.total_amount().minor_units(), 1_000);
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let base = CartState::default()
            .reduce(CartAction::Add(item(1, 250)))
            .reduce(CartAction::Add(item(2, 300)));

        let zeroed = base.clone().reduce(CartAction::UpdateQuantity {
            id: ProductId::new(1),
            quantity: 0,
        });
        let negative = base.reduce(CartAction::UpdateQuantity {
            id: ProductId::new(1),
            quantity: -5,
        });

        assert_eq!(zeroed, negative);
        assert!(zeroed.get(ProductId::new(1)).is_none());
        assert_eq!(zeroed.total_amount().minor_units(), 300);
    }

    #[test]
    fn test_update_quantity_missing_id_is_noop() {
        let base = CartState::default().reduce(CartAction::Add(item(1, 250)));
        let next = base.clone().reduce(CartAction::UpdateQuantity {
            id: ProductId::new(99),
            quantity: 3,
        });
        assert_eq!(base, next);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let base = CartState::default().reduce(CartAction::Add(item(1, 250)));
        let next = base.clone().reduce(CartAction::Remove(ProductId::new(42)));
        assert_eq!(base, next);
    }

    #[test]
    fn test_clear_zeroes_total() {
        let state = CartState::default()
            .reduce(CartAction::Add(item(1, 250)))
            .reduce(CartAction::Clear);
        assert!(state.is_empty());
        assert!(state.total_amount().is_zero());
    }

    #[test]
    fn test_total_tracks_every_transition() {
        let actions = [
            CartAction::Add(item(1, 71_500)),
            CartAction::Add(item(2, 49_900)),
            CartAction::Add(item(1, 71_500)),
            CartAction::UpdateQuantity {
                id: ProductId::new(2),
                quantity: 3,
            },
            CartAction::Remove(ProductId::new(1)),
            CartAction::Add(item(3, 1)),
        ];
        let mut state = CartState::default();
        for action in actions {
            state = state.reduce(action);
            assert_eq!(state.total_amount().minor_units(), expected_total(&state));
        }
    }

    #[test]
    fn test_snapshot_shape() {
        let state = CartState::default().reduce(CartAction::Add(item(1, 71_500)));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["totalAmount"], 71_500);
        assert_eq!(json["items"][0]["selectedSize"], "M");
        assert_eq!(json["items"][0]["quantity"], 1);
        assert!(json["items"][0].get("variantId").is_none());
    }

    #[test]
    fn test_loading_recomputes_total_and_normalizes_lines() {
        let raw = r#"{
            "items": [
                {"id": 1, "name": "A", "category": "c", "price": 100, "image": "", "quantity": 2},
                {"id": 2, "name": "B", "category": "c", "price": 50, "image": "", "quantity": 0},
                {"id": 1, "name": "A", "category": "c", "price": 100, "image": "", "quantity": 1}
            ],
            "totalAmount": 999999
        }"#;
        let state: CartState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.items()[0].quantity, 3);
        assert_eq!(state.total_amount().minor_units(), 300);
    }
}
