//! A cart store that can be shared between threads.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Cart, CartChange, CartStore, Totals};
use crate::storage::KeyValueStore;
use crate::types::ProductId;

/// Cloneable handle to one [`CartStore`], serializing every command behind a
/// mutex so that concurrent adds of the same product never produce two lines.
#[derive(Debug)]
pub struct SharedCartStore<S> {
    inner: Arc<Mutex<CartStore<S>>>,
}

impl<S> Clone for SharedCartStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStore> SharedCartStore<S> {
    pub fn new(store: CartStore<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    // Poisoning only means a listener panicked; the cart itself is consistent.
    fn lock(&self) -> MutexGuard<'_, CartStore<S>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_item(&self, id: ProductId) -> CartChange {
        self.lock().add_item(id)
    }

    pub fn remove_item(&self, id: ProductId) -> CartChange {
        self.lock().remove_item(id)
    }

    pub fn set_quantity(&self, id: ProductId, quantity: i64) -> CartChange {
        self.lock().set_quantity(id, quantity)
    }

    pub fn clear(&self) -> CartChange {
        self.lock().clear()
    }

    /// A copy of the cart as it is right now.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().cart().clone()
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.lock().totals()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lock().item_count()
    }

    /// Run `f` with exclusive access to the underlying store.
    pub fn with<R>(&self, f: impl FnOnce(&mut CartStore<S>) -> R) -> R {
        f(&mut self.lock())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::thread;

    use super::*;
    use crate::catalog::Catalog;
    use crate::storage::MemoryStore;

    #[test]
    fn test_concurrent_adds_keep_one_line() {
        let shared = SharedCartStore::new(CartStore::open(Catalog::sample(), MemoryStore::new()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        shared.add_item(ProductId::new(2));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let cart = shared.snapshot();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 200);
        assert_eq!(shared.item_count(), 200);
    }

    #[test]
    fn test_with_gives_store_access() {
        let shared = SharedCartStore::new(CartStore::open(Catalog::sample(), MemoryStore::new()));
        shared.add_item(ProductId::new(1));

        let persisted = shared.with(|store| store.storage().get(crate::CART_KEY).unwrap());
        assert!(persisted.is_some());
    }

    #[test]
    fn test_survives_panicking_listener() {
        let shared = SharedCartStore::new(CartStore::open(Catalog::sample(), MemoryStore::new()));
        shared.with(|store| {
            store.subscribe(|change, _| {
                assert!(!matches!(change, CartChange::Cleared), "listener blew up");
            });
        });

        let for_thread = shared.clone();
        let result = thread::spawn(move || for_thread.clear()).join();
        assert!(result.is_err());

        assert_eq!(shared.add_item(ProductId::new(1)), CartChange::Added(ProductId::new(1)));
    }
}
