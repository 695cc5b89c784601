//! Catalog store
//!
//! The `CatalogStore` owns the ordered game collection and the site
//! configuration record, and keeps them persisted in a key-value backend.
//!
//! ## Persisted layout
//!
//! Two independently keyed JSON blobs:
//! - `modzone_games` - the full game collection, most recent first
//! - `modzone_config` - the site configuration record
//!
//! Both are rewritten in full after every change.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = CatalogStore::open()?;  // Loads existing or seeds defaults
//!
//! let game = store.add_game(NewGame::new("Subway Surfers Mod"))?;
//!
//! let query = GameQuery::new("subway", PlatformFilter::All, CategoryFilter::All);
//! let games = store.query(&query);
//! ```

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{Config, LoadPolicy};
use crate::models::{Game, GamePatch, NewGame, SiteConfig, SiteConfigPatch};
use crate::query::{category_list, GameQuery};
use crate::seed::{default_games, default_site_config};
use crate::storage::{open_backend, KeyValueBackend, MemoryBackend, StorageError};

/// Key holding the serialized game collection
pub const GAMES_KEY: &str = "modzone_games";

/// Infix marking a key as a backup of an unreadable value
const BACKUP_MARKER: &str = ".corrupt-";

/// Key holding the serialized site configuration
pub const SITE_CONFIG_KEY: &str = "modzone_config";

/// A stored blob that could not be parsed and was replaced with defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadIssue {
    /// Key whose value was unreadable
    pub key: String,
    /// Key the unreadable value was copied to
    pub backup_key: String,
    /// Parser error message
    pub details: String,
}

/// Change notification delivered to subscribers after each persisted change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    GameAdded { id: String },
    GameUpdated { id: String },
    GameRemoved { id: String },
    SiteConfigChanged,
    /// Everything was replaced with the built-in defaults
    Reset,
}

/// Handle returned by [`CatalogStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Catalog and site configuration as loaded from a backend
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub games: Vec<Game>,
    pub site: SiteConfig,
    /// Unreadable blobs that were replaced with defaults
    pub issues: Vec<LoadIssue>,
    /// True when at least one key was absent or unreadable
    pub used_defaults: bool,
}

/// Load both records from a backend
///
/// A missing key yields the built-in default for that record. An unreadable
/// value either fails the load or, under [`LoadPolicy::Recover`], is copied
/// to a backup key and replaced with the default.
pub fn load_snapshot(backend: &mut dyn KeyValueBackend, policy: LoadPolicy) -> Result<Snapshot> {
    let mut issues = Vec::new();
    let mut used_defaults = false;

    let games = load_blob(
        backend,
        GAMES_KEY,
        policy,
        default_games,
        &mut issues,
        &mut used_defaults,
    )?;
    let site = load_blob(
        backend,
        SITE_CONFIG_KEY,
        policy,
        default_site_config,
        &mut issues,
        &mut used_defaults,
    )?;

    Ok(Snapshot {
        games,
        site,
        issues,
        used_defaults,
    })
}

fn load_blob<T: DeserializeOwned>(
    backend: &mut dyn KeyValueBackend,
    key: &str,
    policy: LoadPolicy,
    default: impl FnOnce() -> T,
    issues: &mut Vec<LoadIssue>,
    used_defaults: &mut bool,
) -> Result<T> {
    let raw = backend
        .get(key)
        .with_context(|| format!("Failed to read '{}'", key))?;

    let Some(raw) = raw else {
        debug!(key, "no stored value, using defaults");
        *used_defaults = true;
        return Ok(default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            let details = e.to_string();
            if policy == LoadPolicy::Fail {
                return Err(StorageError::CorruptBlob {
                    key: key.to_string(),
                    details,
                }
                .into());
            }

            let backup_key = format!(
                "{}{}{}",
                key,
                BACKUP_MARKER,
                Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
            );
            backend
                .set(&backup_key, &raw)
                .with_context(|| format!("Failed to back up unreadable '{}'", key))?;

            warn!(key, backup_key = %backup_key, error = %details, "stored value unreadable, using defaults");
            issues.push(LoadIssue {
                key: key.to_string(),
                backup_key,
                details,
            });
            *used_defaults = true;
            Ok(default())
        }
    }
}

/// Write both records to a backend in full
pub fn save_snapshot(
    backend: &mut dyn KeyValueBackend,
    games: &[Game],
    site: &SiteConfig,
) -> Result<()> {
    save_blob(backend, GAMES_KEY, games)?;
    save_blob(backend, SITE_CONFIG_KEY, site)?;
    Ok(())
}

fn save_blob<T: Serialize + ?Sized>(
    backend: &mut dyn KeyValueBackend,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value).map_err(StorageError::from)?;
    backend
        .set(key, &json)
        .with_context(|| format!("Failed to write '{}'", key))
}

/// Catalog store
///
/// Holds the game collection and the site configuration in memory and
/// rewrites both to the backend after every mutation.
pub struct CatalogStore {
    backend: Box<dyn KeyValueBackend>,
    games: Vec<Game>,
    site: SiteConfig,
    issues: Vec<LoadIssue>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl CatalogStore {
    /// Open the store using the configuration from the default location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config)
    }

    /// Open the store with a specific configuration
    pub fn open_with_config(config: &Config) -> Result<Self> {
        let backend = open_backend(config).context("Failed to open storage backend")?;
        Self::open_with_backend(backend, config.on_corrupt)
    }

    /// Open the store on an already-constructed backend
    ///
    /// On first run (or after recovering from an unreadable value) the
    /// loaded defaults are written back immediately.
    pub fn open_with_backend(
        mut backend: Box<dyn KeyValueBackend>,
        policy: LoadPolicy,
    ) -> Result<Self> {
        let snapshot =
            load_snapshot(backend.as_mut(), policy).context("Failed to load catalog")?;

        let mut store = Self {
            backend,
            games: snapshot.games,
            site: snapshot.site,
            issues: snapshot.issues,
            subscribers: Vec::new(),
            next_subscription: 0,
        };

        if snapshot.used_defaults {
            store.save().context("Failed to write initial catalog")?;
        }

        info!(
            location = %store.location(),
            games = store.games.len(),
            "catalog opened"
        );
        Ok(store)
    }

    /// A store backed by memory only
    pub fn in_memory() -> Result<Self> {
        Self::open_with_backend(Box::new(MemoryBackend::new()), LoadPolicy::Recover)
    }

    /// Where the backend keeps its data
    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Values that were unreadable at load time and replaced with defaults
    pub fn load_issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    /// Keys holding backups of unreadable values, from this or earlier runs
    pub fn backup_keys(&self) -> Result<Vec<String>> {
        let keys = self.backend.keys().context("Failed to list stored keys")?;
        Ok(keys
            .into_iter()
            .filter(|k| k.contains(BACKUP_MARKER))
            .collect())
    }

    /// Delete every backup key, returning how many were removed
    pub fn prune_backups(&mut self) -> Result<usize> {
        let keys = self.backup_keys()?;
        for key in &keys {
            self.backend
                .remove(key)
                .with_context(|| format!("Failed to remove '{}'", key))?;
        }
        info!(count = keys.len(), "backups pruned");
        Ok(keys.len())
    }

    /// Access the backend directly
    pub fn backend(&self) -> &dyn KeyValueBackend {
        self.backend.as_ref()
    }

    // ==================== Persistence ====================

    /// Write the full collection and configuration to the backend
    pub fn save(&mut self) -> Result<()> {
        save_snapshot(self.backend.as_mut(), &self.games, &self.site)
    }

    /// Re-read both records from the backend, discarding in-memory state
    pub fn reload(&mut self, policy: LoadPolicy) -> Result<()> {
        let snapshot = load_snapshot(self.backend.as_mut(), policy)?;
        self.games = snapshot.games;
        self.site = snapshot.site;
        self.issues = snapshot.issues;
        Ok(())
    }

    // ==================== Game Operations ====================

    /// All games, most recently added first
    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Number of games in the catalog
    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Get a game by ID
    pub fn get_game(&self, id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Games whose ID starts with `prefix`, in catalog order
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Game> {
        self.games
            .iter()
            .filter(|g| g.id.starts_with(prefix))
            .collect()
    }

    /// Add a new game at the front of the catalog
    ///
    /// Returns `None` without touching the store when the draft has no title
    /// or its rating is not a finite number.
    pub fn add_game(&mut self, draft: NewGame) -> Result<Option<Game>> {
        if !draft.has_title() {
            debug!("ignoring game without a title");
            return Ok(None);
        }
        if !draft.has_valid_rating() {
            debug!(rating = ?draft.rating, "ignoring game with a non-finite rating");
            return Ok(None);
        }

        let game = draft.into_game(self.fresh_id());
        self.games.insert(0, game.clone());
        self.save().context("Failed to save new game")?;

        debug!(id = %game.id, title = %game.title, "game added");
        self.notify(StoreEvent::GameAdded {
            id: game.id.clone(),
        });
        Ok(Some(game))
    }

    /// Merge a patch into the game with the given ID
    ///
    /// Returns `false` without touching the store when no game matches, the
    /// patch is empty, or the patch would blank out the title.
    pub fn update_game(&mut self, id: &str, patch: &GamePatch) -> Result<bool> {
        if patch.is_empty() || patch.clears_title() {
            debug!(id, "ignoring empty or title-clearing patch");
            return Ok(false);
        }

        let Some(game) = self.games.iter_mut().find(|g| g.id == id) else {
            debug!(id, "no game to update");
            return Ok(false);
        };
        game.apply(patch);

        self.save().context("Failed to save updated game")?;
        debug!(id, "game updated");
        self.notify(StoreEvent::GameUpdated { id: id.to_string() });
        Ok(true)
    }

    /// Remove the game with the given ID, returning it
    pub fn remove_game(&mut self, id: &str) -> Result<Option<Game>> {
        let Some(pos) = self.games.iter().position(|g| g.id == id) else {
            debug!(id, "no game to remove");
            return Ok(None);
        };
        let removed = self.games.remove(pos);

        self.save().context("Failed to save after removing game")?;
        debug!(id, "game removed");
        self.notify(StoreEvent::GameRemoved { id: id.to_string() });
        Ok(Some(removed))
    }

    /// Generate an identifier not used by any game in the catalog
    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get_game(&id).is_none() {
                return id;
            }
        }
    }

    // ==================== Query ====================

    /// Games matching a query, in catalog order
    pub fn query(&self, query: &GameQuery) -> Vec<Game> {
        query.filter(&self.games)
    }

    /// Category choices: the "All Categories" sentinel, then each category
    /// in first-seen order
    pub fn categories(&self) -> Vec<String> {
        category_list(&self.games)
    }

    // ==================== Site Configuration ====================

    /// The site configuration record
    pub fn site_config(&self) -> &SiteConfig {
        &self.site
    }

    /// Merge a patch into the site configuration
    ///
    /// Returns `false` without touching the store when the patch is empty.
    pub fn set_site_config(&mut self, patch: &SiteConfigPatch) -> Result<bool> {
        if patch.is_empty() {
            return Ok(false);
        }

        self.site.apply(patch);
        self.save().context("Failed to save site configuration")?;
        debug!("site configuration updated");
        self.notify(StoreEvent::SiteConfigChanged);
        Ok(true)
    }

    /// Replace everything with the built-in defaults
    pub fn reset(&mut self) -> Result<()> {
        self.games = default_games();
        self.site = default_site_config();
        self.save().context("Failed to save defaults")?;
        info!("catalog reset to defaults");
        self.notify(StoreEvent::Reset);
        Ok(())
    }

    // ==================== Subscriptions ====================

    /// Register a callback invoked after each persisted change
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a callback; returns `false` if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: StoreEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(&event);
        }
    }
}
