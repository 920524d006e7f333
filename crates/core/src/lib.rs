//! Pocket Store Core - Catalog, cart store and cart persistence.
//!
//! This crate holds everything a presentation layer needs to run the store:
//! - `pocket` CLI - Terminal storefront built on top of this crate
//!
//! # Architecture
//!
//! The core is synchronous and UI-agnostic. A [`CartStore`] owns its
//! [`Cart`] and the key-value backend it persists to; every command writes
//! the cart through to storage before it returns and then notifies
//! registered listeners.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and emails
//! - [`catalog`] - Read-only product registry
//! - [`cart`] - Cart lines, totals and the cart store
//! - [`storage`] - Key-value backends (memory, filesystem)
//! - [`persistence`] - Encoding the cart into its storage slot
//! - [`checkout`] - Simulated checkout
//! - [`view`] - Display formatting for presentation layers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod persistence;
pub mod storage;
pub mod types;
pub mod view;

pub use cart::{
    Cart, CartChange, CartLine, CartLineError, CartListener, CartStore, SharedCartStore, Totals,
};
pub use catalog::{Catalog, CatalogError, Product};
pub use checkout::{CheckoutError, ContactDetails, ContactError, OrderConfirmation, checkout};
pub use persistence::{CART_KEY, CartPersistence, PersistenceError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use types::*;
