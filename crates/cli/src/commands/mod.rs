//! Subcommand implementations.

pub mod cart;
pub mod checkout;
pub mod variants;
pub mod wishlist;

use knitwear_storefront::error::Result;
use knitwear_storefront::{FileStorage, Snapshot, SnapshotStorage, Store, StorefrontConfig};

/// Snapshot storage rooted at the configured state directory.
fn storage(config: &StorefrontConfig) -> FileStorage {
    FileStorage::new(&config.state_dir)
}

/// Surface a failed snapshot write; on disk is the only place CLI state lives.
fn persisted<S: Snapshot, P: SnapshotStorage>(store: &mut Store<S, P>) -> Result<()> {
    store.take_persist_error().map_or(Ok(()), |e| Err(e.into()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use std::collections::HashMap;
    use std::path::Path;

    use knitwear_storefront::StorefrontConfig;

    pub fn config_in(dir: &Path) -> StorefrontConfig {
        let vars = HashMap::from([(
            "KNITWEAR_STATE_DIR".to_string(),
            dir.to_string_lossy().into_owned(),
        )]);
        StorefrontConfig::from_map(&vars).unwrap()
    }
}
