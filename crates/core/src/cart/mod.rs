//! Cart lines, totals and the cart store.
//!
//! [`Cart`] is the plain value: an ordered list of lines with at most one
//! line per product. [`CartStore`] wraps a cart together with its catalog,
//! persistence and listeners and is what presentation layers talk to.

mod shared;
mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Product;
use crate::types::{Price, ProductId};

pub use shared::SharedCartStore;
pub use store::{CartListener, CartStore};

/// Reasons a list of lines cannot form a valid cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartLineError {
    #[error("line for product {0} has quantity 0")]
    ZeroQuantity(ProductId),
    #[error("product {0} appears in more than one line")]
    DuplicateLine(ProductId),
    #[error("line for product {0} has a negative price")]
    NegativePrice(ProductId),
}

/// One product in the cart.
///
/// `name`, `price` and `image` are copied from the catalog when the line is
/// created and are not refreshed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1.
    pub quantity: u64,
}

impl CartLine {
    /// A new line for `product` with quantity 1.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// `price x quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Cart totals. `total` equals `subtotal`: there is no tax, shipping or discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Price,
    pub total: Price,
}

/// What a cart command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended with quantity 1.
    Added(ProductId),
    /// An existing line now has `quantity` units.
    QuantityChanged { id: ProductId, quantity: u64 },
    /// A line was deleted.
    Removed(ProductId),
    /// All lines were deleted.
    Cleared,
    /// Nothing changed (unknown product, or product not in the cart).
    Unchanged,
}

impl CartChange {
    /// Whether the cart contents differ from before the command.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Ordered cart lines, unique by product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from lines in the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if any line has quantity 0 or a negative price, or
    /// if two lines share a product id.
    pub fn from_lines(lines: Vec<CartLine>) -> Result<Self, CartLineError> {
        for (index, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(CartLineError::ZeroQuantity(line.id));
            }
            if line.price.is_negative() {
                return Err(CartLineError::NegativePrice(line.id));
            }
            if lines.iter().take(index).any(|earlier| earlier.id == line.id) {
                return Err(CartLineError::DuplicateLine(line.id));
            }
        }
        Ok(Self { lines })
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// The line for `id`, if the product is in the cart.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        let subtotal: Price = self.lines.iter().map(CartLine::line_total).sum();
        Totals {
            subtotal,
            total: subtotal,
        }
    }

    /// Add one unit of `product`.
    pub fn add(&mut self, product: &Product) -> CartChange {
        if let Some(line) = self.lines.iter_mut().find(|line| line.id == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return CartChange::QuantityChanged {
                id: line.id,
                quantity: line.quantity,
            };
        }
        self.lines.push(CartLine::from_product(product));
        CartChange::Added(product.id)
    }

    /// Delete the line for `id`.
    pub fn remove(&mut self, id: ProductId) -> CartChange {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        if self.lines.len() == before {
            CartChange::Unchanged
        } else {
            CartChange::Removed(id)
        }
    }

    /// Set the quantity of an existing line. `quantity` of 0 removes the line.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u64) -> CartChange {
        if quantity == 0 {
            return self.remove(id);
        }
        match self.lines.iter_mut().find(|line| line.id == id) {
            Some(line) => {
                line.quantity = quantity;
                CartChange::QuantityChanged { id, quantity }
            }
            None => CartChange::Unchanged,
        }
    }

    pub fn clear(&mut self) -> CartChange {
        self.lines.clear();
        CartChange::Cleared
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn music() -> Product {
        Product::new(1, "Music 1", Price::from_cents(999), "label1.webp")
    }

    fn podcast() -> Product {
        Product::new(3, "Podcast 1", Price::from_cents(999), "label3.webp")
    }

    #[test]
    fn test_add_appends_then_increments() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(&music()), CartChange::Added(ProductId::new(1)));
        assert_eq!(
            cart.add(&music()),
            CartChange::QuantityChanged {
                id: ProductId::new(1),
                quantity: 2
            }
        );
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&podcast());
        cart.add(&music());
        cart.add(&podcast());

        let ids: Vec<i32> = cart.lines().iter().map(|l| l.id.as_i32()).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_line_snapshot_is_independent_of_product() {
        let mut product = music();
        let mut cart = Cart::new();
        cart.add(&product);

        product.price = Price::from_cents(100);
        product.name = "Renamed".to_string();
        cart.add(&product);

        let line = cart.line(ProductId::new(1)).unwrap();
        assert_eq!(line.name, "Music 1");
        assert_eq!(line.price, Price::from_cents(999));
        assert_eq!(line.quantity, 2);
    }

    #[test]
    fn test_remove_absent_is_unchanged() {
        let mut cart = Cart::new();
        cart.add(&music());
        assert_eq!(cart.remove(ProductId::new(2)), CartChange::Unchanged);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(&music());
        assert_eq!(
            cart.set_quantity(ProductId::new(1), 0),
            CartChange::Removed(ProductId::new(1))
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_absent_is_unchanged() {
        let mut cart = Cart::new();
        assert_eq!(cart.set_quantity(ProductId::new(1), 5), CartChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(&music());
        cart.add(&music());
        cart.add(&Product::new(5, "Podcast 2", Price::from_cents(599), "label5.jpg"));

        let totals = cart.totals();
        assert_eq!(totals.subtotal, Price::from_cents(2597));
        assert_eq!(totals.total, totals.subtotal);
    }

    #[test]
    fn test_empty_totals_are_zero() {
        assert_eq!(Cart::new().totals(), Totals::default());
        assert_eq!(Cart::new().item_count(), 0);
    }

    #[test]
    fn test_from_lines_rejects_invalid() {
        let line = CartLine::from_product(&music());

        let zero = CartLine {
            quantity: 0,
            ..line.clone()
        };
        assert_eq!(
            Cart::from_lines(vec![zero]),
            Err(CartLineError::ZeroQuantity(ProductId::new(1)))
        );

        assert_eq!(
            Cart::from_lines(vec![line.clone(), line.clone()]),
            Err(CartLineError::DuplicateLine(ProductId::new(1)))
        );

        let negative = CartLine {
            price: Price::from_cents(-5),
            ..line
        };
        assert_eq!(
            Cart::from_lines(vec![negative]),
            Err(CartLineError::NegativePrice(ProductId::new(1)))
        );
    }

    #[test]
    fn test_change_is_change() {
        assert!(CartChange::Cleared.is_change());
        assert!(CartChange::Added(ProductId::new(1)).is_change());
        assert!(!CartChange::Unchanged.is_change());
    }
}
