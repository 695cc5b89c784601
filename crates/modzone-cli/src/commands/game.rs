//! Game command handlers

use anyhow::{anyhow, bail, Context, Result};

use modzone_core::models::parse_tags;
use modzone_core::{
    CatalogStore, CategoryFilter, GamePatch, GameQuery, NewGame, Platform, PlatformFilter,
};

use crate::editor::{confirm, is_interactive, prompt_with_default};
use crate::output::{short_id, Output};

/// Fields accepted by `game add`
pub struct AddArgs {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub downloads: Option<String>,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

/// Parse a `--rating` argument, rejecting NaN and infinities
pub fn parse_rating(value: &str) -> Result<f64, String> {
    let rating = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid rating '{}': {}", value, e))?;
    if rating.is_finite() {
        Ok(rating)
    } else {
        Err(format!("invalid rating '{}': must be a finite number", value))
    }
}

/// List games, optionally filtered
pub fn list(
    store: &CatalogStore,
    search: Option<String>,
    platform: &str,
    category: &str,
    output: &Output,
) -> Result<()> {
    let platform = platform.parse::<PlatformFilter>()?;
    let category = category
        .parse::<CategoryFilter>()
        .map_err(|e| anyhow!("Invalid category: {:?}", e))?;
    let query = GameQuery::new(search.unwrap_or_default(), platform, category);

    output.print_games(&store.query(&query));
    Ok(())
}

/// Show a single game
pub fn show(store: &CatalogStore, id: String, output: &Output) -> Result<()> {
    let id = resolve_game_id(store, &id)?;
    let game = store
        .get_game(&id)
        .ok_or_else(|| anyhow!("Game not found: {}", id))?;

    output.print_game(game);
    Ok(())
}

/// Add a new game
pub fn add(store: &mut CatalogStore, args: AddArgs, output: &Output) -> Result<()> {
    let platform = args
        .platform
        .as_deref()
        .map(str::parse::<Platform>)
        .transpose()?;

    let tags: Vec<String> = args.tags.iter().flat_map(|t| parse_tags(t)).collect();

    let draft = NewGame {
        title: args.title,
        description: args.description,
        image: args.image,
        rating: args.rating,
        downloads: args.downloads,
        platform,
        category: args.category,
        tags: if tags.is_empty() { None } else { Some(tags) },
    };

    match store.add_game(draft).context("Failed to add game")? {
        Some(game) => {
            output.success(&format!("Added game: {}", game.id));
            output.print_game(&game);
        }
        None => output.message("Nothing added: a game needs a title and a finite rating."),
    }

    Ok(())
}

/// Edit a game
///
/// With `--set` assignments the patch is built from them; otherwise each
/// field is prompted for interactively.
pub fn edit(
    store: &mut CatalogStore,
    id: String,
    assignments: Vec<String>,
    output: &Output,
) -> Result<()> {
    let id = resolve_game_id(store, &id)?;

    let patch = if assignments.is_empty() {
        if !is_interactive() {
            bail!("No changes given. Use --set key=value (e.g. --set rating=4.5).");
        }
        prompt_patch(store, &id)?
    } else {
        GamePatch::from_assignments(&assignments)?
    };

    if store
        .update_game(&id, &patch)
        .context("Failed to update game")?
    {
        output.success("Game updated");
        if let Some(game) = store.get_game(&id) {
            output.print_game(game);
        }
    } else if patch.clears_title() {
        output.message("Not updated: the title cannot be empty.");
    } else {
        output.message("No changes.");
    }

    Ok(())
}

/// Prompt for each field, keeping the current value on empty input
fn prompt_patch(store: &CatalogStore, id: &str) -> Result<GamePatch> {
    let game = store
        .get_game(id)
        .ok_or_else(|| anyhow!("Game not found: {}", id))?;

    println!("Editing game: {}", game.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let current = [
        ("title", game.title.clone()),
        ("description", game.description.clone()),
        ("image", game.image.clone()),
        ("rating", game.rating.to_string()),
        ("downloads", game.downloads.clone()),
        ("platform", game.platform.to_string()),
        ("category", game.category.clone()),
        ("tags", game.tags.join(", ")),
    ];

    let mut patch = GamePatch::default();
    for (field, value) in current {
        if let Some(new_value) = prompt_with_default(field, &value)? {
            patch.set_field(field, &new_value)?;
        }
    }
    Ok(patch)
}

/// Delete a game
pub fn delete(store: &mut CatalogStore, id: String, yes: bool, output: &Output) -> Result<()> {
    let id = resolve_game_id(store, &id)?;
    let game = store
        .get_game(&id)
        .ok_or_else(|| anyhow!("Game not found: {}", id))?;

    if output.should_prompt() && !yes {
        println!("Delete game: {} - {}", short_id(&game.id), game.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.remove_game(&id).context("Failed to delete game")?;
    output.success(&format!("Deleted game: {}", id));

    Ok(())
}

/// Resolve a game ID (supports full ID or unique prefix)
fn resolve_game_id(store: &CatalogStore, id: &str) -> Result<String> {
    if store.get_game(id).is_some() {
        return Ok(id.to_string());
    }

    let matches = store.find_by_prefix(id);

    match matches.len() {
        0 => bail!("No game found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple games match '{}':", id);
            for game in &matches {
                eprintln!("  {} - {}", game.id, game.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    fn quiet() -> Output {
        Output::new(OutputFormat::Quiet)
    }

    #[test]
    fn test_resolve_exact_and_prefix() {
        let mut store = CatalogStore::in_memory().unwrap();
        assert_eq!(resolve_game_id(&store, "3").unwrap(), "3");

        let game = store.add_game(NewGame::new("Prefixed")).unwrap().unwrap();
        let prefix: String = game.id.chars().take(8).collect();
        assert_eq!(resolve_game_id(&store, &prefix).unwrap(), game.id);

        assert!(resolve_game_id(&store, "zzz-not-there").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let store = CatalogStore::in_memory().unwrap();
        // Every id starts with the empty string
        let err = resolve_game_id(&store, "").unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_add_parses_platform_and_tags() {
        let mut store = CatalogStore::in_memory().unwrap();
        let args = AddArgs {
            title: "Subway Surfers Mod".to_string(),
            description: None,
            image: None,
            rating: Some(4.2),
            downloads: None,
            platform: Some("android".to_string()),
            category: Some("Arcade".to_string()),
            tags: vec!["Runner, Casual".to_string(), "Offline".to_string()],
        };
        add(&mut store, args, &quiet()).unwrap();

        let game = &store.games()[0];
        assert_eq!(game.title, "Subway Surfers Mod");
        assert_eq!(game.platform, Platform::Android);
        assert_eq!(game.tags, vec!["Runner", "Casual", "Offline"]);
        assert_eq!(game.downloads, "1K");
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("4.5"), Ok(4.5));
        assert_eq!(parse_rating(" 0 "), Ok(0.0));
        assert!(parse_rating("nan").is_err());
        assert!(parse_rating("inf").is_err());
        assert!(parse_rating("-infinity").is_err());
        assert!(parse_rating("five").is_err());
    }

    #[test]
    fn test_add_rejects_unknown_platform() {
        let mut store = CatalogStore::in_memory().unwrap();
        let args = AddArgs {
            title: "X".to_string(),
            description: None,
            image: None,
            rating: None,
            downloads: None,
            platform: Some("windows".to_string()),
            category: None,
            tags: Vec::new(),
        };
        assert!(add(&mut store, args, &quiet()).is_err());
        assert_eq!(store.game_count(), 6);
    }

    #[test]
    fn test_edit_with_assignments() {
        let mut store = CatalogStore::in_memory().unwrap();
        edit(
            &mut store,
            "2".to_string(),
            vec!["title=Zooba Ultimate".to_string(), "tags=A,B".to_string()],
            &quiet(),
        )
        .unwrap();

        let game = store.get_game("2").unwrap();
        assert_eq!(game.title, "Zooba Ultimate");
        assert_eq!(game.tags, vec!["A", "B"]);
        assert_eq!(game.category, "Action");
    }

    #[test]
    fn test_edit_rejects_unknown_field() {
        let mut store = CatalogStore::in_memory().unwrap();
        let result = edit(
            &mut store,
            "2".to_string(),
            vec!["color=red".to_string()],
            &quiet(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_delete_in_quiet_mode_skips_prompt() {
        let mut store = CatalogStore::in_memory().unwrap();
        delete(&mut store, "4".to_string(), false, &quiet()).unwrap();
        assert!(store.get_game("4").is_none());
        assert_eq!(store.game_count(), 5);
    }

    #[test]
    fn test_list_rejects_bad_platform() {
        let store = CatalogStore::in_memory().unwrap();
        assert!(list(&store, None, "desktop", "All Categories", &quiet()).is_err());
        assert!(list(&store, Some("mod".to_string()), "iOS", "Action", &quiet()).is_ok());
    }
}
