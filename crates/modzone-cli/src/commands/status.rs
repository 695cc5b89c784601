//! Status command handler

use anyhow::{Context, Result};

use modzone_core::{CatalogStore, Config};

use crate::output::{Output, OutputFormat};

/// Show backend, location, counts and any load problems
pub fn show(store: &CatalogStore, config: &Config, output: &Output) -> Result<()> {
    // The sentinel is not a real category
    let category_count = store.categories().len().saturating_sub(1);
    let issues = store.load_issues();
    let backups = store.backup_keys()?;

    match output.format {
        OutputFormat::Json => {
            let issues: Vec<_> = issues
                .iter()
                .map(|i| {
                    serde_json::json!({
                        "key": i.key,
                        "backup_key": i.backup_key,
                        "details": i.details
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "backend": config.backend.to_string(),
                    "location": store.location(),
                    "on_corrupt": config.on_corrupt.to_string(),
                    "counts": {
                        "games": store.game_count(),
                        "categories": category_count
                    },
                    "site_name": store.site_config().site_name,
                    "load_issues": issues,
                    "backups": backups
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.game_count());
        }
        OutputFormat::Human => {
            println!("{} Status", store.site_config().site_name);
            println!("==============");
            println!();
            println!("Storage:");
            println!("  Backend:    {}", config.backend);
            println!("  Location:   {}", store.location());
            println!("  On corrupt: {}", config.on_corrupt);
            println!();
            println!("Contents:");
            println!("  Games:      {}", store.game_count());
            println!("  Categories: {}", category_count);
            if !issues.is_empty() {
                println!();
                println!("Recovered at load:");
                for issue in issues {
                    println!(
                        "  {} (backup in {}): {}",
                        issue.key, issue.backup_key, issue.details
                    );
                }
            }
            if !backups.is_empty() {
                println!();
                println!("Backups ({}):", backups.len());
                for key in &backups {
                    println!("  {}", key);
                }
                println!("Remove them with: modzone status --prune-backups");
            }
        }
    }

    Ok(())
}

/// Delete backups of unreadable stored values
pub fn prune_backups(store: &mut CatalogStore, output: &Output) -> Result<()> {
    let removed = store
        .prune_backups()
        .context("Failed to remove backups")?;
    output.success(&format!("Removed {} backup(s)", removed));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use modzone_core::storage::MemoryBackend;
    use modzone_core::{KeyValueBackend, LoadPolicy};

    #[test]
    fn test_prune_backups_after_recovery() {
        let mut backend = MemoryBackend::new();
        backend.set("modzone_games", "{broken").unwrap();
        let mut store =
            CatalogStore::open_with_backend(Box::new(backend), LoadPolicy::Recover).unwrap();
        assert_eq!(store.backup_keys().unwrap().len(), 1);

        let output = Output::new(OutputFormat::Quiet);
        show(&store, &Config::default(), &output).unwrap();
        prune_backups(&mut store, &output).unwrap();
        assert!(store.backup_keys().unwrap().is_empty());
        assert_eq!(store.game_count(), 6);
    }
}
