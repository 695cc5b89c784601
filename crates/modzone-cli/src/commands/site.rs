//! Site configuration command handlers

use anyhow::{Context, Result};

use modzone_core::{CatalogStore, SiteConfigPatch};

use crate::output::Output;

/// Show the site configuration
pub fn show(store: &CatalogStore, output: &Output) -> Result<()> {
    output.print_site(store.site_config());
    Ok(())
}

/// Set one site configuration field
///
/// An empty value for `ad_key` clears the ad integration.
pub fn set(store: &mut CatalogStore, key: String, value: String, output: &Output) -> Result<()> {
    let mut patch = SiteConfigPatch::default();
    patch.set_field(&key, &value)?;

    if store
        .set_site_config(&patch)
        .context("Failed to save site configuration")?
    {
        output.success(&format!("Set {} = {}", key, value));
    } else {
        output.message("No changes.");
    }

    Ok(())
}
