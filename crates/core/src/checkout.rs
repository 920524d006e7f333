//! Simulated checkout.
//!
//! Checkout collects contact details, takes a snapshot of the cart as an
//! order confirmation and empties the cart. No payment is taken and nothing
//! leaves the process.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::cart::{CartLine, CartStore, Totals};
use crate::storage::KeyValueStore;
use crate::types::{Email, EmailError};

/// Problems with the order form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Name is required")]
    EmptyName,
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
    #[error("Delivery address is required")]
    EmptyAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Cannot check out an empty cart")]
    EmptyCart,
    #[error(transparent)]
    Contact(#[from] ContactError),
}

/// Validated order form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: Email,
    pub address: String,
}

impl ContactDetails {
    /// Validate raw form input. Name and address are trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or address is blank or the email is invalid.
    pub fn parse(name: &str, email: &str, address: &str) -> Result<Self, ContactError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContactError::EmptyName);
        }
        let email = Email::parse(email)?;
        let address = address.trim();
        if address.is_empty() {
            return Err(ContactError::EmptyAddress);
        }

        Ok(Self {
            name: name.to_owned(),
            email,
            address: address.to_owned(),
        })
    }
}

/// What the customer sees after placing the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: Uuid,
    pub placed_at: DateTime<Utc>,
    pub contact: ContactDetails,
    pub lines: Vec<CartLine>,
    pub totals: Totals,
}

impl OrderConfirmation {
    /// Sum of quantities across all ordered lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }
}

/// Place a simulated order for everything in the cart, then clear the cart.
///
/// The cart is left untouched when checkout fails.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing to order.
pub fn checkout<S: KeyValueStore>(
    store: &mut CartStore<S>,
    contact: ContactDetails,
) -> Result<OrderConfirmation, CheckoutError> {
    if store.lines().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let confirmation = OrderConfirmation {
        order_number: Uuid::new_v4(),
        placed_at: Utc::now(),
        contact,
        lines: store.lines().to_vec(),
        totals: store.totals(),
    };
    store.clear();

    info!(
        order_number = %confirmation.order_number,
        items = confirmation.item_count(),
        total = %confirmation.totals.total,
        "Order placed"
    );
    Ok(confirmation)
}
