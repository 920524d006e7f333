//! Integration tests for Pocket Store.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-store-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end cart flows against the sample catalog
//! - `cart_reload` - Carts surviving a restart through the filesystem store
//! - `cart_properties` - Property tests for cart and persistence laws
//!
//! This library holds the fixtures the test files share.

use pocket_store_core::{Cart, CartStore, Catalog, FileStore, MemoryStore, ProductId};
use tempfile::TempDir;

/// Ids present in the sample catalog.
pub const SAMPLE_IDS: [i32; 6] = [1, 2, 3, 4, 5, 6];

/// A store over the sample catalog with empty in-memory storage.
#[must_use]
pub fn memory_store() -> CartStore<MemoryStore> {
    CartStore::open(Catalog::sample(), MemoryStore::new())
}

/// A store over the sample catalog whose storage starts as `storage`.
#[must_use]
pub fn store_with(storage: MemoryStore) -> CartStore<MemoryStore> {
    CartStore::open(Catalog::sample(), storage)
}

/// A filesystem-backed store living in a fresh temporary directory.
///
/// Keep the returned directory alive for as long as the store is used.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
#[allow(clippy::expect_used)]
pub fn file_store() -> (TempDir, CartStore<FileStore>) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = CartStore::open(Catalog::sample(), FileStore::new(dir.path()));
    (dir, store)
}

/// Build a cart by adding each id once, in order, against the sample catalog.
#[must_use]
pub fn cart_from_adds(ids: &[i32]) -> Cart {
    let mut store = memory_store();
    for &id in ids {
        store.add_item(ProductId::new(id));
    }
    store.cart().clone()
}
