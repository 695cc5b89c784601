//! MODZONE Core Library
//!
//! This crate provides the core functionality for MODZONE, a small game
//! catalog with a sitewide configuration record.
//!
//! # Architecture
//!
//! - **Catalog store**: the ordered game collection plus the site
//!   configuration, persisted as two JSON blobs in a key-value backend and
//!   rewritten in full on every change
//! - **Query view**: order-preserving filtering by title, platform and
//!   category
//!
//! # Quick Start
//!
//! ```text
//! let mut store = CatalogStore::open()?;
//!
//! // Add a game
//! let mut draft = NewGame::new("Subway Surfers Mod");
//! draft.platform = Some(Platform::Android);
//! store.add_game(draft)?;
//!
//! // Query games
//! let query = GameQuery::new("subway", PlatformFilter::All, CategoryFilter::All);
//! let games = store.query(&query);
//! ```
//!
//! # Modules
//!
//! - `store`: Catalog store (main entry point)
//! - `models`: Game and site configuration records, patches
//! - `query`: Filters and the category list
//! - `storage`: Key-value backends
//! - `seed`: Built-in catalog used on first run
//! - `config`: Application configuration

pub mod config;
pub mod models;
pub mod query;
pub mod seed;
pub mod storage;
pub mod store;

pub use config::{BackendKind, Config, LoadPolicy};
pub use models::{Game, GamePatch, NewGame, PatchError, Platform, SiteConfig, SiteConfigPatch};
pub use query::{category_list, CategoryFilter, GameQuery, PlatformFilter, ALL_CATEGORIES};
pub use storage::{KeyValueBackend, StorageError};
pub use store::{CatalogStore, LoadIssue, StoreEvent, SubscriptionId};
