//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! pocket cart add 1        # one more "Music 1"
//! pocket cart set 1 3      # exactly three
//! pocket cart dec 1        # the "-" button
//! pocket cart remove 1
//! pocket cart show --json  # the saved slot contents
//! ```

use std::io::{self, Write};

use pocket_store_core::view::{CartView, parse_quantity_input};
use pocket_store_core::{CartChange, CartStore, KeyValueStore, ProductId, persistence};
use thiserror::Error;
use tracing::{instrument, warn};

use crate::render;

/// Errors that can occur while showing the cart.
#[derive(Debug, Error)]
pub enum CartCommandError {
    #[error("Cannot encode cart: {0}")]
    Encode(#[from] persistence::PersistenceError),
    #[error("Cannot write output: {0}")]
    Output(#[from] io::Error),
}

/// Show the cart, or print it in its persisted JSON layout.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded or written to `out`.
#[instrument(skip(out, store))]
pub fn show<S: KeyValueStore>(
    out: &mut impl Write,
    store: &CartStore<S>,
    json: bool,
) -> Result<(), CartCommandError> {
    if json {
        writeln!(out, "{}", persistence::encode(store.cart())?)?;
    } else {
        render::cart(out, &CartView::from(store.cart()))?;
    }
    Ok(())
}

#[instrument(skip(out, store))]
pub fn add<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
    id: ProductId,
) -> io::Result<CartChange> {
    let change = store.add_item(id);
    render_after(out, store, change)
}

#[instrument(skip(out, store))]
pub fn remove<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
    id: ProductId,
) -> io::Result<CartChange> {
    let change = store.remove_item(id);
    render_after(out, store, change)
}

/// Set a quantity typed by the user. Input that is not a whole number is ignored.
#[instrument(skip(out, store))]
pub fn set<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
    id: ProductId,
    input: &str,
) -> io::Result<CartChange> {
    let Some(quantity) = parse_quantity_input(input) else {
        warn!(input, "Ignoring quantity that is not a whole number");
        return Ok(CartChange::Unchanged);
    };
    let change = store.set_quantity(id, quantity);
    render_after(out, store, change)
}

#[instrument(skip(out, store))]
pub fn increment<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
    id: ProductId,
) -> io::Result<CartChange> {
    let change = store.increment(id);
    render_after(out, store, change)
}

#[instrument(skip(out, store))]
pub fn decrement<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
    id: ProductId,
) -> io::Result<CartChange> {
    let change = store.decrement(id);
    render_after(out, store, change)
}

#[instrument(skip(out, store))]
pub fn clear<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
) -> io::Result<CartChange> {
    let change = store.clear();
    render_after(out, store, change)
}

fn render_after<S: KeyValueStore>(
    out: &mut impl Write,
    store: &CartStore<S>,
    change: CartChange,
) -> io::Result<CartChange> {
    render::cart(out, &CartView::from(store.cart()))?;
    Ok(change)
}
