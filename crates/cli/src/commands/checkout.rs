//! Simulated checkout command.
//!
//! # Usage
//!
//! ```bash
//! pocket checkout --name "Ada Lovelace" --email ada@example.com --address "12 St James's Square"
//! ```

use std::io::{self, Write};

use pocket_store_core::{CartStore, CheckoutError, ContactDetails, KeyValueStore, checkout};
use thiserror::Error;
use tracing::instrument;

use crate::render;

/// Errors that can occur while placing an order from the CLI.
#[derive(Debug, Error)]
pub enum CheckoutCommandError {
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error("Cannot encode order confirmation: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Cannot write output: {0}")]
    Output(#[from] io::Error),
}

/// Raw order form fields as typed by the user.
#[derive(Debug, Clone)]
pub struct OrderForm {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Validate the form, place the order and empty the cart.
///
/// # Errors
///
/// Returns an error if the form is invalid or the cart is empty; the cart is
/// unchanged in that case. Also fails if the confirmation cannot be written
/// to `out`, after the order has been placed.
#[instrument(skip(out, store))]
pub fn place_order<S: KeyValueStore>(
    out: &mut impl Write,
    store: &mut CartStore<S>,
    form: &OrderForm,
    json: bool,
) -> Result<(), CheckoutCommandError> {
    let contact = ContactDetails::parse(&form.name, &form.email, &form.address)
        .map_err(CheckoutError::from)?;
    let order = checkout(store, contact)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&order)?)?;
    } else {
        render::order(out, &order)?;
    }
    Ok(())
}
