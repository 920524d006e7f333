//! Terminal rendering of catalog, cart and order views.
//!
//! Renderers write to any [`Write`]; `main` hands them a locked stdout while
//! `tracing` diagnostics go to stderr.

use std::io::{self, Write};

use pocket_store_core::view::{CartView, ProductView};
use pocket_store_core::{Catalog, OrderConfirmation};

pub fn catalog(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "Catalog")?;
    writeln!(out, "=======")?;
    for product in catalog.list().iter().map(ProductView::from) {
        writeln!(
            out,
            "  [{}] {:<20} {:>9}  ({})",
            product.id, product.title, product.price, product.image
        )?;
    }
    Ok(())
}

pub fn cart(out: &mut impl Write, view: &CartView) -> io::Result<()> {
    writeln!(out, "Cart ({} items)", view.item_count)?;
    writeln!(out, "===============")?;
    if view.is_empty() {
        return writeln!(out, "  Your cart is empty");
    }
    for item in &view.items {
        writeln!(
            out,
            "  [{}] {:<20} {:>9} x {:<4} {:>10}",
            item.id, item.title, item.price, item.quantity, item.line_price
        )?;
    }
    writeln!(out, "  Subtotal: {}", view.subtotal)?;
    writeln!(out, "  Total:    {}", view.total)
}

pub fn order(out: &mut impl Write, order: &OrderConfirmation) -> io::Result<()> {
    writeln!(out, "Thank you for your order, {}!", order.contact.name)?;
    writeln!(out, "  Order number: {}", order.order_number)?;
    writeln!(out, "  Placed at:    {}", order.placed_at.to_rfc3339())?;
    writeln!(out, "  Items:        {}", order.item_count())?;
    writeln!(out, "  Total:        {}", order.totals.total)?;
    writeln!(out, "  Confirmation sent to {}", order.contact.email)
}
