//! Category command handler

use anyhow::Result;

use modzone_core::CatalogStore;

use crate::output::Output;

/// List the category choices, starting with the "All Categories" sentinel
pub fn list(store: &CatalogStore, output: &Output) -> Result<()> {
    output.print_categories(&store.categories());
    Ok(())
}
