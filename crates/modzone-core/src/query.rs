//! Catalog query view
//!
//! Derives a filtered, read-only subsequence of the catalog from three
//! independent predicates: title text, platform compatibility and category.
//! Results always preserve catalog order.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::models::{Game, ParsePlatformError, Platform};

/// Sentinel category that matches every game
pub const ALL_CATEGORIES: &str = "All Categories";

/// Label for the platform filter that matches every game
pub const ALL_PLATFORMS: &str = "All Platforms";

/// Platform predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlatformFilter {
    /// Every platform
    #[default]
    All,
    /// Games tagged with this platform, plus games tagged `Both`
    Only(Platform),
}

impl PlatformFilter {
    /// Whether a game on `platform` passes this filter
    ///
    /// An Android-only game never passes an iOS filter and vice versa.
    pub fn matches(&self, platform: Platform) -> bool {
        match self {
            PlatformFilter::All => true,
            PlatformFilter::Only(wanted) => platform == Platform::Both || platform == *wanted,
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::All => f.write_str(ALL_PLATFORMS),
            PlatformFilter::Only(platform) => write!(f, "{}", platform),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") || trimmed.eq_ignore_ascii_case(ALL_PLATFORMS) {
            return Ok(PlatformFilter::All);
        }
        trimmed.parse().map(PlatformFilter::Only)
    }
}

/// Category predicate
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,
    /// Exact, case-sensitive category match
    Exact(String),
}

impl CategoryFilter {
    /// Whether a game in `category` passes this filter
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Exact(category) => f.write_str(category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_CATEGORIES {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Exact(s.to_string()))
        }
    }
}

/// A combined catalog query
///
/// A game is included when the title search, platform filter and category
/// filter all pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameQuery {
    /// Case-insensitive substring of the title; empty matches everything
    pub search: String,
    pub platform: PlatformFilter,
    pub category: CategoryFilter,
}

impl GameQuery {
    pub fn new(
        search: impl Into<String>,
        platform: PlatformFilter,
        category: CategoryFilter,
    ) -> Self {
        Self {
            search: search.into(),
            platform,
            category,
        }
    }

    /// Whether the query matches everything
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_empty()
            && self.platform == PlatformFilter::All
            && self.category == CategoryFilter::All
    }

    /// Test a single game against all three predicates
    pub fn matches(&self, game: &Game) -> bool {
        self.matches_title(&game.title)
            && self.platform.matches(game.platform)
            && self.category.matches(&game.category)
    }

    fn matches_title(&self, title: &str) -> bool {
        self.search.is_empty() || title.to_lowercase().contains(&self.search.to_lowercase())
    }

    /// Games matching the query, in catalog order
    pub fn filter(&self, games: &[Game]) -> Vec<Game> {
        games.iter().filter(|g| self.matches(g)).cloned().collect()
    }
}

/// Distinct categories in first-seen order, prefixed with the
/// [`ALL_CATEGORIES`] sentinel
pub fn category_list(games: &[Game]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for game in games {
        if !categories.iter().any(|c| c == &game.category) {
            categories.push(game.category.clone());
        }
    }
    categories
}
