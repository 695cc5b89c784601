//! Reset command handler

use anyhow::{Context, Result};

use modzone_core::CatalogStore;

use crate::editor::confirm;
use crate::output::Output;

/// Replace the catalog and site configuration with the built-in defaults
pub fn reset(store: &mut CatalogStore, yes: bool, output: &Output) -> Result<()> {
    if output.should_prompt() && !yes {
        println!(
            "This replaces all {} game(s) and the site configuration with the defaults.",
            store.game_count()
        );
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.reset().context("Failed to reset catalog")?;
    output.success("Catalog reset to defaults");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use modzone_core::NewGame;

    #[test]
    fn test_reset_restores_seed() {
        let mut store = CatalogStore::in_memory().unwrap();
        store.add_game(NewGame::new("Extra")).unwrap();
        store.remove_game("1").unwrap();

        reset(&mut store, false, &Output::new(OutputFormat::Quiet)).unwrap();

        let ids: Vec<_> = store.games().iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5", "6"]);
    }
}
