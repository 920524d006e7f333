//! Persisting the cart to its storage slot.
//!
//! The slot holds a JSON array of lines in cart order:
//!
//! ```json
//! [{"id":1,"name":"Music 1","price":9.99,"image":"label1.webp","quantity":2}]
//! ```
//!
//! [`CartPersistence::save`] and [`CartPersistence::load`] never fail: a
//! broken backend or a corrupt slot is logged and the cart degrades to its
//! in-memory value or to empty. The `try_*` variants report the error.

use thiserror::Error;
use tracing::warn;

use crate::cart::{Cart, CartLine, CartLineError};
use crate::storage::{KeyValueStore, StorageError};

/// Slot name the cart is stored under.
pub const CART_KEY: &str = "cart";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Saved cart is not valid JSON for a cart: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Saved cart is invalid: {0}")]
    InvalidLine(#[from] CartLineError),
}

/// Encode a cart as the JSON text stored in the slot.
///
/// # Errors
///
/// Returns an error if serialization fails, which only happens for prices
/// that cannot be represented as a JSON number.
pub fn encode(cart: &Cart) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(cart.lines())?)
}

/// Decode slot text back into a cart, preserving line order.
///
/// Lines are not checked against any catalog. Unknown fields are ignored so
/// newer writers stay readable.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of complete lines, or
/// if the lines break a cart invariant.
pub fn decode(text: &str) -> Result<Cart, PersistenceError> {
    let lines: Vec<CartLine> = serde_json::from_str(text)?;
    Ok(Cart::from_lines(lines)?)
}

/// Reads and writes a [`Cart`] in one slot of a [`KeyValueStore`].
#[derive(Debug)]
pub struct CartPersistence<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under the default [`CART_KEY`] slot.
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, CART_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Write `cart` to the slot, replacing the previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails or the backend rejects the write.
    pub fn try_save(&mut self, cart: &Cart) -> Result<(), PersistenceError> {
        let text = encode(cart)?;
        self.storage.set(&self.key, &text)?;
        Ok(())
    }

    /// Write `cart` to the slot, logging instead of failing.
    ///
    /// Returns whether the write succeeded.
    pub fn save(&mut self, cart: &Cart) -> bool {
        match self.try_save(cart) {
            Ok(()) => true,
            Err(e) => {
                warn!(slot = %self.key, error = %e, "Failed to save cart, keeping it in memory only");
                false
            }
        }
    }

    /// Read the cart from the slot. `Ok(None)` means the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the content does
    /// not decode into a valid cart.
    pub fn try_load(&self) -> Result<Option<Cart>, PersistenceError> {
        self.storage
            .get(&self.key)?
            .map(|text| decode(&text))
            .transpose()
    }

    /// Read the cart from the slot, falling back to an empty cart.
    pub fn load(&self) -> Cart {
        match self.try_load() {
            Ok(cart) => cart.unwrap_or_default(),
            Err(e) => {
                warn!(slot = %self.key, error = %e, "Discarding unreadable saved cart");
                Cart::new()
            }
        }
    }
}
