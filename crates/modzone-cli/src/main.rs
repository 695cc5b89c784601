//! MODZONE CLI
//!
//! Command-line interface for MODZONE - game catalog and site settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use modzone_core::{CatalogStore, Config, ALL_CATEGORIES};

mod commands;
mod editor;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "modzone")]
#[command(about = "MODZONE - Game mod catalog management")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage games
    Game {
        #[command(subcommand)]
        command: GameCommands,
    },
    /// List category choices
    Categories,
    /// Show or set the site configuration
    Site {
        #[command(subcommand)]
        command: Option<SiteCommands>,
    },
    /// Show storage status and counts
    Status {
        /// Delete backups of unreadable stored values
        #[arg(long)]
        prune_backups: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Restore the built-in catalog and site configuration
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum GameCommands {
    /// List games
    #[command(alias = "ls")]
    List {
        /// Case-insensitive title search
        #[arg(short, long)]
        search: Option<String>,
        /// Platform filter (All, Android, iOS, Both)
        #[arg(short, long, default_value = "All")]
        platform: String,
        /// Category filter
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// Show game details
    Show {
        /// Game ID (full ID or prefix)
        id: String,
    },
    /// Add a game
    Add {
        /// Game title
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Image URL
        #[arg(short, long)]
        image: Option<String>,
        /// Rating out of 5
        #[arg(short, long, value_parser = commands::game::parse_rating)]
        rating: Option<f64>,
        /// Download count label (e.g. "10M+")
        #[arg(long)]
        downloads: Option<String>,
        /// Android, iOS or Both
        #[arg(short, long)]
        platform: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Tags to add (repeatable, comma-separated)
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Edit a game (prompts for each field without --set)
    Edit {
        /// Game ID (full ID or prefix)
        id: String,
        /// Field assignment, e.g. --set rating=4.5
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
    /// Delete a game
    #[command(alias = "rm")]
    Delete {
        /// Game ID (full ID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SiteCommands {
    /// Show the site configuration
    Show,
    /// Set a site configuration field
    Set {
        /// Field (site_name, hero_subtitle, locker_url, ad_key)
        key: String,
        /// New value
        value: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, backend, on_corrupt, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init(&config);

    let mut store = CatalogStore::open_with_config(&config)?;
    store.subscribe(|event| debug!(?event, "catalog changed"));

    for issue in store.load_issues() {
        output.warning(&format!(
            "Stored {} was unreadable and has been reset to defaults (backup: {})",
            issue.key, issue.backup_key
        ));
    }

    match cli.command {
        Commands::Game { command } => handle_game_command(command, &mut store, &output),
        Commands::Categories => commands::category::list(&store, &output),
        Commands::Site { command } => handle_site_command(command, &mut store, &output),
        Commands::Status { prune_backups } => {
            if prune_backups {
                commands::status::prune_backups(&mut store, &output)?;
            }
            commands::status::show(&store, &config, &output)
        }
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Reset { yes } => commands::reset::reset(&mut store, yes, &output),
    }
}

fn handle_game_command(
    command: GameCommands,
    store: &mut CatalogStore,
    output: &Output,
) -> Result<()> {
    match command {
        GameCommands::List {
            search,
            platform,
            category,
        } => commands::game::list(store, search, &platform, &category, output),
        GameCommands::Show { id } => commands::game::show(store, id, output),
        GameCommands::Add {
            title,
            description,
            image,
            rating,
            downloads,
            platform,
            category,
            tag,
        } => {
            let args = commands::game::AddArgs {
                title,
                description,
                image,
                rating,
                downloads,
                platform,
                category,
                tags: tag,
            };
            commands::game::add(store, args, output)
        }
        GameCommands::Edit { id, set } => commands::game::edit(store, id, set, output),
        GameCommands::Delete { id, yes } => commands::game::delete(store, id, yes, output),
    }
}

fn handle_site_command(
    command: Option<SiteCommands>,
    store: &mut CatalogStore,
    output: &Output,
) -> Result<()> {
    match command {
        Some(SiteCommands::Show) | None => commands::site::show(store, output),
        Some(SiteCommands::Set { key, value }) => commands::site::set(store, key, value, output),
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
