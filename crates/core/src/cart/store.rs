//! The cart store: sole owner of a cart and its persisted copy.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{Cart, CartChange, CartLine, Totals};
use crate::catalog::Catalog;
use crate::persistence::CartPersistence;
use crate::storage::KeyValueStore;
use crate::types::ProductId;

/// Callback invoked after every command that reached the cart.
///
/// Receives what changed and the cart as it is now.
pub type CartListener = Box<dyn FnMut(&CartChange, &Cart) + Send>;

/// Owns one cart, writes it through to storage and tells listeners.
///
/// Every command persists before it returns, so the storage slot always
/// matches [`CartStore::lines`] once a command completes. Commands never
/// fail: unknown products are ignored and storage errors are logged.
pub struct CartStore<S> {
    catalog: Arc<Catalog>,
    cart: Cart,
    persistence: CartPersistence<S>,
    listeners: Vec<CartListener>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the store, restoring whatever cart `storage` holds.
    pub fn open(catalog: impl Into<Arc<Catalog>>, storage: S) -> Self {
        let persistence = CartPersistence::new(storage);
        let cart = persistence.load();
        debug!(lines = cart.len(), "Restored cart");
        Self {
            catalog: catalog.into(),
            cart,
            persistence,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for cart changes.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&CartChange, &Cart) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Add one unit of a catalog product.
    ///
    /// Unknown product ids are ignored without persisting or notifying.
    pub fn add_item(&mut self, id: ProductId) -> CartChange {
        let Some(product) = self.catalog.find_by_id(id) else {
            debug!(product_id = %id, "Ignoring add of unknown product");
            return CartChange::Unchanged;
        };
        let change = self.cart.add(product);
        self.commit(change)
    }

    /// Delete the product's line. A product not in the cart is not an error.
    pub fn remove_item(&mut self, id: ProductId) -> CartChange {
        let change = self.cart.remove(id);
        self.commit(change)
    }

    /// Set a line's quantity. Values below 1 remove the line.
    ///
    /// Products not in the cart are ignored.
    pub fn set_quantity(&mut self, id: ProductId, quantity: i64) -> CartChange {
        let Ok(quantity) = u64::try_from(quantity) else {
            return self.remove_item(id);
        };
        if quantity == 0 {
            return self.remove_item(id);
        }
        match self.cart.set_quantity(id, quantity) {
            CartChange::Unchanged => {
                debug!(product_id = %id, "Ignoring quantity update for product not in cart");
                CartChange::Unchanged
            }
            change => self.commit(change),
        }
    }

    /// One more unit of a product already in the cart.
    pub fn increment(&mut self, id: ProductId) -> CartChange {
        match self.cart.line(id) {
            Some(line) => {
                let quantity = line.quantity.saturating_add(1);
                self.set_quantity(id, i64::try_from(quantity).unwrap_or(i64::MAX))
            }
            None => CartChange::Unchanged,
        }
    }

    /// One less unit of a product already in the cart; the last unit removes the line.
    pub fn decrement(&mut self, id: ProductId) -> CartChange {
        match self.cart.line(id) {
            Some(line) => {
                let quantity = i64::try_from(line.quantity).unwrap_or(i64::MAX) - 1;
                self.set_quantity(id, quantity)
            }
            None => CartChange::Unchanged,
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> CartChange {
        let change = self.cart.clear();
        self.commit(change)
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        self.cart.totals()
    }

    /// Sum of quantities, for the cart badge.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The storage backend the cart is written to.
    #[must_use]
    pub const fn storage(&self) -> &S {
        self.persistence.storage()
    }

    /// Close the store and hand back its storage backend.
    pub fn into_storage(self) -> S {
        self.persistence.into_storage()
    }

    fn commit(&mut self, change: CartChange) -> CartChange {
        self.persistence.save(&self.cart);
        debug!(
            ?change,
            lines = self.cart.len(),
            items = self.cart.item_count(),
            "Cart updated"
        );
        for listener in &mut self.listeners {
            listener(&change, &self.cart);
        }
        change
    }
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("persistence", &self.persistence)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::persistence::{CART_KEY, decode};
    use crate::storage::MemoryStore;
    use crate::types::Price;

    fn store() -> CartStore<MemoryStore> {
        CartStore::open(Catalog::sample(), MemoryStore::new())
    }

    fn id(n: i32) -> ProductId {
        ProductId::new(n)
    }

    fn persisted(store: &CartStore<MemoryStore>) -> Option<Cart> {
        store
            .storage()
            .get(CART_KEY)
            .unwrap()
            .map(|text| decode(&text).unwrap())
    }

    #[test]
    fn test_add_twice_gives_one_line() {
        let mut store = store();
        store.add_item(id(1));
        store.add_item(id(1));

        assert_eq!(store.lines().len(), 1);
        assert_eq!(store.lines()[0].quantity, 2);
        assert_eq!(
            store.totals(),
            Totals {
                subtotal: Price::from_cents(1998),
                total: Price::from_cents(1998),
            }
        );
    }

    #[test]
    fn test_add_unknown_product_is_silent() {
        let mut store = store();
        store.add_item(id(1));
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        store.subscribe(move |_, _| *counter.lock().unwrap() += 1);

        assert_eq!(store.add_item(id(999)), CartChange::Unchanged);
        assert_eq!(store.item_count(), 1);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[test]
    fn test_add_unknown_product_does_not_persist() {
        let mut store = store();
        store.add_item(id(999));
        assert!(persisted(&store).is_none());
    }

    #[test]
    fn test_every_mutation_is_written_through() {
        let mut store = store();

        store.add_item(id(2));
        assert_eq!(persisted(&store).as_ref(), Some(store.cart()));

        store.add_item(id(1));
        store.set_quantity(id(2), 7);
        assert_eq!(persisted(&store).as_ref(), Some(store.cart()));

        store.remove_item(id(1));
        assert_eq!(persisted(&store).as_ref(), Some(store.cart()));

        store.clear();
        assert_eq!(persisted(&store), Some(Cart::new()));
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut store = store();
        store.add_item(id(1));

        assert_eq!(store.set_quantity(id(1), 0), CartChange::Removed(id(1)));
        assert!(store.lines().is_empty());
        assert_eq!(store.item_count(), 0);
    }

    #[test]
    fn test_set_quantity_negative_removes_line() {
        let mut store = store();
        store.add_item(id(1));
        store.set_quantity(id(1), -4);
        assert!(store.lines().is_empty());
    }

    #[test]
    fn test_set_quantity_has_no_upper_bound() {
        let mut store = store();
        store.add_item(id(5));
        store.set_quantity(id(5), 1_000_000);

        assert_eq!(store.item_count(), 1_000_000);
        assert_eq!(store.totals().total, Price::from_cents(599_000_000));
    }

    #[test]
    fn test_set_quantity_for_product_not_in_cart_is_ignored() {
        let mut store = store();
        assert_eq!(store.set_quantity(id(1), 3), CartChange::Unchanged);
        assert!(store.lines().is_empty());
        assert!(persisted(&store).is_none());
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut store = store();
        store.add_item(id(3));

        store.increment(id(3));
        assert_eq!(store.item_count(), 2);

        store.decrement(id(3));
        store.decrement(id(3));
        assert!(store.lines().is_empty());

        assert_eq!(store.increment(id(3)), CartChange::Unchanged);
        assert_eq!(store.decrement(id(3)), CartChange::Unchanged);
    }

    #[test]
    fn test_remove_absent_still_notifies() {
        let mut store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |change, _| sink.lock().unwrap().push(*change));

        store.remove_item(id(4));
        assert_eq!(*seen.lock().unwrap(), vec![CartChange::Unchanged]);
    }

    #[test]
    fn test_listeners_see_new_state() {
        let mut store = store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |change, cart| sink.lock().unwrap().push((*change, cart.item_count())));

        store.add_item(id(1));
        store.add_item(id(1));
        store.clear();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (CartChange::Added(id(1)), 1),
                (
                    CartChange::QuantityChanged {
                        id: id(1),
                        quantity: 2
                    },
                    2
                ),
                (CartChange::Cleared, 0),
            ]
        );
    }

    #[test]
    fn test_open_restores_previous_session() {
        let mut first = store();
        first.add_item(id(6));
        first.add_item(id(2));
        let storage = first.into_storage();

        let second = CartStore::open(Catalog::sample(), storage);
        let ids: Vec<i32> = second.lines().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![6, 2]);
    }

    #[test]
    fn test_restored_lines_keep_snapshot_price() {
        let mut first = store();
        first.add_item(id(1));
        let storage = first.into_storage();

        let repriced = Catalog::new(vec![crate::catalog::Product::new(
            1,
            "Music 1",
            Price::from_cents(100),
            "label1.webp",
        )])
        .unwrap();
        let mut second = CartStore::open(repriced, storage);
        second.add_item(id(1));

        assert_eq!(second.lines()[0].price, Price::from_cents(999));
        assert_eq!(second.totals().total, Price::from_cents(1998));
    }

    #[test]
    fn test_independent_stores() {
        let mut a = store();
        let b = store();
        a.add_item(id(1));
        assert_eq!(a.item_count(), 1);
        assert_eq!(b.item_count(), 0);
    }
}
