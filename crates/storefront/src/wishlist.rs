//! Wishlist state: a set of saved products, unique by id.

use knitwear_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

use crate::persistence::SnapshotStorage;
use crate::store::{Snapshot, Store};

/// A saved product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAction {
    /// Append unless an entry with the same id exists.
    Add(WishlistItem),
    /// Remove the entry with this id, if any.
    Remove(ProductId),
    /// Remove if present, otherwise append.
    Toggle(WishlistItem),
}

/// Saved products in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersistedWishlist")]
pub struct WishlistState {
    items: Vec<WishlistItem>,
}

#[derive(Deserialize)]
struct PersistedWishlist {
    #[serde(default)]
    items: Vec<WishlistItem>,
}

impl From<PersistedWishlist> for WishlistState {
    fn from(persisted: PersistedWishlist) -> Self {
        let mut state = Self::default();
        for item in persisted.items {
            state = state.reduce(WishlistAction::Add(item));
        }
        state
    }
}

impl WishlistState {
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    /// Whether `id` is saved (drives the heart icon).
    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply an action, returning the next state.
    #[must_use]
    pub fn reduce(mut self, action: WishlistAction) -> Self {
        match action {
            WishlistAction::Add(item) => {
                if !self.contains(item.id) {
                    self.items.push(item);
                }
            }
            WishlistAction::Remove(id) => self.items.retain(|item| item.id != id),
            WishlistAction::Toggle(item) => {
                if self.contains(item.id) {
                    self.items.retain(|existing| existing.id != item.id);
                } else {
                    self.items.push(item);
                }
            }
        }
        self
    }
}

impl Snapshot for WishlistState {
    type Action = WishlistAction;

    const STORAGE_KEY: &'static str = "wishlist";

    fn transition(self, action: Self::Action) -> Self {
        self.reduce(action)
    }
}

/// Wishlist state owned by the application root, persisted after every change.
pub type WishlistStore<P> = Store<WishlistState, P>;

impl<P: SnapshotStorage> Store<WishlistState, P> {
    pub fn add_to_wishlist(&mut self, item: WishlistItem) -> &WishlistState {
        self.dispatch(WishlistAction::Add(item))
    }

    pub fn remove_from_wishlist(&mut self, id: ProductId) -> &WishlistState {
        self.dispatch(WishlistAction::Remove(id))
    }

    /// Save or unsave `item`. Returns whether it is saved afterwards.
    pub fn toggle_wishlist(&mut self, item: WishlistItem) -> bool {
        let id = item.id;
        let saved = self.dispatch(WishlistAction::Toggle(item)).contains(id);
        tracing::debug!(product_id = %id, saved, "Toggled wishlist");
        saved
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn item(id: i64) -> WishlistItem {
        WishlistItem {
            id: ProductId::new(id),
            name: format!("Merino Scarf {id}"),
            price: Price::from_minor_units(89_900),
            image: format!("/images/{id}.jpg"),
            category: "Scarves".to_string(),
            original_price: Some(Price::from_minor_units(119_900)),
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let state = WishlistState::default()
            .reduce(WishlistAction::Add(item(1)))
            .reduce(WishlistAction::Add(item(1)));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let base = WishlistState::default().reduce(WishlistAction::Add(item(1)));
        let next = base.clone().reduce(WishlistAction::Remove(ProductId::new(2)));
        assert_eq!(base, next);
    }

    #[test]
    fn test_toggle_twice_restores_absent_item() {
        let base = WishlistState::default().reduce(WishlistAction::Add(item(1)));
        let toggled = base.clone().reduce(WishlistAction::Toggle(item(9)));
        assert!(toggled.contains(ProductId::new(9)));

        let restored = toggled.reduce(WishlistAction::Toggle(item(9)));
        assert_eq!(restored, base);
    }

    #[test]
    fn test_toggle_twice_keeps_present_item_saved() {
        let base = WishlistState::default()
            .reduce(WishlistAction::Add(item(1)))
            .reduce(WishlistAction::Add(item(2)));
        let restored = base
            .clone()
            .reduce(WishlistAction::Toggle(item(1)))
            .reduce(WishlistAction::Toggle(item(1)));

        // Membership is restored; the re-saved item moves to the end.
        let mut ids: Vec<i64> = restored.items().iter().map(|i| i.id.as_i64()).collect();
        ids.sort_unstable();
        assert_eq!(ids, [1, 2]);
        assert_eq!(restored.items()[1].id, ProductId::new(1));
    }

    #[test]
    fn test_loading_drops_duplicate_ids() {
        let raw = r#"{"items":[
            {"id":1,"name":"A","price":100,"image":"","category":"c"},
            {"id":1,"name":"A again","price":100,"image":"","category":"c"}
        ]}"#;
        let state: WishlistState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.items()[0].name, "A");
        assert_eq!(state.items()[0].original_price, None);
    }
}
