//! Catalog listing.

use std::io::{self, Write};

use pocket_store_core::Catalog;
use tracing::instrument;

use crate::render;

/// Print every product with its id, which the `cart` commands take.
///
/// # Errors
///
/// Returns an error if the listing cannot be written to `out`.
#[instrument(skip_all, fields(products = catalog.len()))]
pub fn list(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    render::catalog(out, catalog)
}
