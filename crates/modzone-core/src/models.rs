//! Data models for MODZONE
//!
//! Defines the catalog record (`Game`), the sitewide configuration record
//! (`SiteConfig`), the draft used to add a game (`NewGame`), and the patch
//! structures used to edit existing records.
//!
//! Records serialize with camelCase keys so stored blobs keep the same
//! shape the catalog has always been persisted with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default description for games added without one
pub const DEFAULT_DESCRIPTION: &str = "Enhanced gameplay features unlocked.";
/// Default image for games added without one
pub const DEFAULT_IMAGE: &str = "https://picsum.photos/200";
/// Default rating for games added without one
pub const DEFAULT_RATING: f64 = 5.0;
/// Default download count label for games added without one
pub const DEFAULT_DOWNLOADS: &str = "1K";
/// Default category for games added without one
pub const DEFAULT_CATEGORY: &str = "General";
/// Default tags attached to newly added games
pub const DEFAULT_TAGS: &[&str] = &["Mod", "Premium"];

/// Platform compatibility of a game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Android only
    Android,
    /// iOS only
    #[serde(rename = "iOS")]
    Ios,
    /// Runs on both Android and iOS
    Both,
}

impl Platform {
    /// Display label, identical to the stored spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Both => "Both",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a platform name cannot be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown platform '{0}'. Expected one of: Android, iOS, Both")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Platform::Android),
            "ios" => Ok(Platform::Ios),
            "both" => Ok(Platform::Both),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    /// Unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Short description shown on the card
    pub description: String,
    /// Image URL
    pub image: String,
    /// Rating between 0 and 5 (not enforced)
    pub rating: f64,
    /// Free-form download count label, e.g. "368K"
    pub downloads: String,
    /// Platform compatibility
    pub platform: Platform,
    /// Free-form category
    pub category: String,
    /// Free-form tags
    pub tags: Vec<String>,
}

impl Game {
    /// Number of filled stars when rendering the rating out of five
    pub fn filled_stars(&self) -> usize {
        if self.rating.is_finite() && self.rating > 0.0 {
            (self.rating.floor() as usize).min(5)
        } else {
            0
        }
    }

    /// Apply a patch, touching only the fields the patch names
    pub fn apply(&mut self, patch: &GamePatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref image) = patch.image {
            self.image = image.clone();
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(ref downloads) = patch.downloads {
            self.downloads = downloads.clone();
        }
        if let Some(platform) = patch.platform {
            self.platform = platform;
        }
        if let Some(ref category) = patch.category {
            self.category = category.clone();
        }
        if let Some(ref tags) = patch.tags {
            self.tags = tags.clone();
        }
    }
}

/// Fields supplied when adding a game
///
/// Only the title is required. Any other field left unset (or set to an
/// empty string) takes its default when the game is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGame {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub downloads: Option<String>,
    pub platform: Option<Platform>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NewGame {
    /// Start a draft with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Whether the draft can become a game
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Whether the rating, if given, can be stored as JSON
    pub fn has_valid_rating(&self) -> bool {
        self.rating.map_or(true, f64::is_finite)
    }

    /// Build the game record under the given identifier, filling defaults
    pub fn into_game(self, id: String) -> Game {
        Game {
            id,
            title: self.title,
            description: non_empty(self.description)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            image: non_empty(self.image).unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            rating: self.rating.unwrap_or(DEFAULT_RATING),
            downloads: non_empty(self.downloads).unwrap_or_else(|| DEFAULT_DOWNLOADS.to_string()),
            platform: self.platform.unwrap_or(Platform::Both),
            category: non_empty(self.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags: match self.tags {
                Some(tags) if !tags.is_empty() => tags,
                _ => DEFAULT_TAGS.iter().map(|t| t.to_string()).collect(),
            },
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Sitewide display and integration settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Logo text
    pub site_name: String,
    /// Subtitle under the logo
    pub hero_subtitle: String,
    /// External redirect target presented before a download
    pub locker_url: String,
    /// Ad-network banner key; empty means unset
    #[serde(default)]
    pub adsterra_key: String,
}

impl SiteConfig {
    /// The ad key, if one is set
    pub fn ad_key(&self) -> Option<&str> {
        if self.adsterra_key.is_empty() {
            None
        } else {
            Some(&self.adsterra_key)
        }
    }

    /// Apply a patch, touching only the fields the patch names
    pub fn apply(&mut self, patch: &SiteConfigPatch) {
        if let Some(ref site_name) = patch.site_name {
            self.site_name = site_name.clone();
        }
        if let Some(ref hero_subtitle) = patch.hero_subtitle {
            self.hero_subtitle = hero_subtitle.clone();
        }
        if let Some(ref locker_url) = patch.locker_url {
            self.locker_url = locker_url.clone();
        }
        if let Some(ref ad_key) = patch.ad_key {
            self.adsterra_key = ad_key.clone();
        }
    }
}

/// Errors raised while building a patch from text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatchError {
    #[error("Unknown field '{field}'. Valid fields: {valid}")]
    UnknownField { field: String, valid: &'static str },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Expected key=value, got '{0}'")]
    MalformedAssignment(String),
}

/// Split a `key=value` assignment
pub fn split_assignment(assignment: &str) -> Result<(&str, &str), PatchError> {
    assignment
        .split_once('=')
        .map(|(k, v)| (k.trim(), v))
        .ok_or_else(|| PatchError::MalformedAssignment(assignment.to_string()))
}

/// Parse a comma-separated tag list, dropping empty entries
pub fn parse_tags(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

const GAME_FIELDS: &str = "title, description, image, rating, downloads, platform, category, tags";

/// A partial update to a game, naming only the fields being changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub rating: Option<f64>,
    pub downloads: Option<String>,
    pub platform: Option<Platform>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl GamePatch {
    /// Patch that only changes the title
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// True when the patch would blank out the title
    pub fn clears_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| t.trim().is_empty())
    }

    /// Set one field from its textual name and value
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), PatchError> {
        match field {
            "title" => self.title = Some(value.to_string()),
            "description" => self.description = Some(value.to_string()),
            "image" => self.image = Some(value.to_string()),
            "rating" => {
                let rating = value.trim().parse::<f64>().map_err(|e| {
                    PatchError::InvalidValue {
                        field: "rating",
                        value: value.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                if !rating.is_finite() {
                    return Err(PatchError::InvalidValue {
                        field: "rating",
                        value: value.to_string(),
                        reason: "must be a finite number".to_string(),
                    });
                }
                self.rating = Some(rating);
            }
            "downloads" => self.downloads = Some(value.to_string()),
            "platform" => {
                let platform = value.parse::<Platform>().map_err(|e| {
                    PatchError::InvalidValue {
                        field: "platform",
                        value: value.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                self.platform = Some(platform);
            }
            "category" => self.category = Some(value.to_string()),
            "tags" => self.tags = Some(parse_tags(value)),
            _ => {
                return Err(PatchError::UnknownField {
                    field: field.to_string(),
                    valid: GAME_FIELDS,
                })
            }
        }
        Ok(())
    }

    /// Build a patch from `key=value` assignments
    pub fn from_assignments<S: AsRef<str>>(assignments: &[S]) -> Result<Self, PatchError> {
        let mut patch = Self::default();
        for assignment in assignments {
            let (key, value) = split_assignment(assignment.as_ref())?;
            patch.set_field(key, value)?;
        }
        Ok(patch)
    }
}

const SITE_FIELDS: &str = "site_name, hero_subtitle, locker_url, ad_key";

/// A partial update to the site configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteConfigPatch {
    pub site_name: Option<String>,
    pub hero_subtitle: Option<String>,
    pub locker_url: Option<String>,
    pub ad_key: Option<String>,
}

impl SiteConfigPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Set one field from its textual name and value
    ///
    /// Accepts both snake_case names and the stored camelCase spellings.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), PatchError> {
        let value = Some(value.to_string());
        match field {
            "site_name" | "siteName" => self.site_name = value,
            "hero_subtitle" | "heroSubtitle" => self.hero_subtitle = value,
            "locker_url" | "lockerUrl" => self.locker_url = value,
            "ad_key" | "adsterra_key" | "adsterraKey" => self.ad_key = value,
            _ => {
                return Err(PatchError::UnknownField {
                    field: field.to_string(),
                    valid: SITE_FIELDS,
                })
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_game() -> Game {
        Game {
            id: "1".to_string(),
            title: "Clash Royale Mod".to_string(),
            description: "Unlimited Gems".to_string(),
            image: "https://picsum.photos/id/10/200/200".to_string(),
            rating: 4.8,
            downloads: "368K".to_string(),
            platform: Platform::Both,
            category: "Strategy".to_string(),
            tags: vec!["Strategy".to_string(), "Mod Menu".to_string()],
        }
    }

    #[test]
    fn test_platform_parse() {
        assert_eq!("Android".parse::<Platform>().unwrap(), Platform::Android);
        assert_eq!("ios".parse::<Platform>().unwrap(), Platform::Ios);
        assert_eq!(" BOTH ".parse::<Platform>().unwrap(), Platform::Both);
        assert!("windows".parse::<Platform>().is_err());
    }

    #[test]
    fn test_platform_serialized_spelling() {
        assert_eq!(serde_json::to_string(&Platform::Ios).unwrap(), "\"iOS\"");
        assert_eq!(Platform::Ios.to_string(), "iOS");
        let parsed: Platform = serde_json::from_str("\"Android\"").unwrap();
        assert_eq!(parsed, Platform::Android);
    }

    #[test]
    fn test_site_config_uses_camel_case() {
        let config = SiteConfig {
            site_name: "MODZONE".to_string(),
            hero_subtitle: "GAME MODS APK".to_string(),
            locker_url: "https://www.google.com".to_string(),
            adsterra_key: String::new(),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"siteName\""));
        assert!(json.contains("\"lockerUrl\""));
        assert!(json.contains("\"heroSubtitle\""));
        assert!(json.contains("\"adsterraKey\""));
    }

    #[test]
    fn test_site_config_missing_ad_key_defaults_to_empty() {
        let json = r#"{"siteName":"A","heroSubtitle":"B","lockerUrl":"C"}"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.adsterra_key, "");
        assert!(config.ad_key().is_none());
    }

    #[test]
    fn test_new_game_defaults() {
        let game = NewGame::new("New").into_game("abc".to_string());
        assert_eq!(game.id, "abc");
        assert_eq!(game.title, "New");
        assert_eq!(game.description, DEFAULT_DESCRIPTION);
        assert_eq!(game.image, DEFAULT_IMAGE);
        assert_eq!(game.rating, DEFAULT_RATING);
        assert_eq!(game.downloads, DEFAULT_DOWNLOADS);
        assert_eq!(game.platform, Platform::Both);
        assert_eq!(game.category, DEFAULT_CATEGORY);
        assert_eq!(game.tags, vec!["Mod", "Premium"]);
    }

    #[test]
    fn test_new_game_empty_strings_take_defaults() {
        let draft = NewGame {
            category: Some(String::new()),
            downloads: Some("500K".to_string()),
            ..NewGame::new("Title")
        };
        let game = draft.into_game("x".to_string());
        assert_eq!(game.category, DEFAULT_CATEGORY);
        assert_eq!(game.downloads, "500K");
    }

    #[test]
    fn test_new_game_has_title() {
        assert!(NewGame::new("A").has_title());
        assert!(!NewGame::new("").has_title());
        assert!(!NewGame::new("   ").has_title());
    }

    #[test]
    fn test_apply_title_patch_touches_only_title() {
        let original = sample_game();
        let mut game = original.clone();
        game.apply(&GamePatch::title("X"));

        assert_eq!(game.title, "X");
        assert_eq!(
            Game {
                title: original.title.clone(),
                ..game
            },
            original
        );
    }

    #[test]
    fn test_patch_from_assignments() {
        let patch = GamePatch::from_assignments(&[
            "rating=3.5",
            "platform=iOS",
            "tags=Action, Multiplayer,",
            "description=a=b",
        ])
        .unwrap();
        assert_eq!(patch.rating, Some(3.5));
        assert_eq!(patch.platform, Some(Platform::Ios));
        assert_eq!(
            patch.tags,
            Some(vec!["Action".to_string(), "Multiplayer".to_string()])
        );
        assert_eq!(patch.description.as_deref(), Some("a=b"));
        assert!(patch.title.is_none());
    }

    #[test]
    fn test_patch_rejects_unknown_and_invalid() {
        assert!(matches!(
            GamePatch::from_assignments(&["color=red"]),
            Err(PatchError::UnknownField { .. })
        ));
        assert!(matches!(
            GamePatch::from_assignments(&["rating=lots"]),
            Err(PatchError::InvalidValue { field: "rating", .. })
        ));
        assert!(matches!(
            GamePatch::from_assignments(&["platform=pc"]),
            Err(PatchError::InvalidValue { field: "platform", .. })
        ));
        assert!(matches!(
            GamePatch::from_assignments(&["title"]),
            Err(PatchError::MalformedAssignment(_))
        ));
    }

    #[test]
    fn test_patch_clears_title() {
        assert!(GamePatch::title("").clears_title());
        assert!(!GamePatch::title("ok").clears_title());
        assert!(!GamePatch::default().clears_title());
        assert!(GamePatch::default().is_empty());
    }

    #[test]
    fn test_site_patch_accepts_both_spellings() {
        let mut patch = SiteConfigPatch::default();
        patch.set_field("lockerUrl", "https://locker.example").unwrap();
        patch.set_field("ad_key", "abc123").unwrap();
        assert!(patch.set_field("theme", "dark").is_err());

        let mut config = SiteConfig {
            site_name: "MODZONE".to_string(),
            hero_subtitle: "GAME MODS APK".to_string(),
            locker_url: String::new(),
            adsterra_key: String::new(),
        };
        config.apply(&patch);
        assert_eq!(config.locker_url, "https://locker.example");
        assert_eq!(config.ad_key(), Some("abc123"));
        assert_eq!(config.site_name, "MODZONE");
    }

    #[test]
    fn test_filled_stars() {
        let mut game = sample_game();
        assert_eq!(game.filled_stars(), 4);
        game.rating = 5.0;
        assert_eq!(game.filled_stars(), 5);
        game.rating = -1.0;
        assert_eq!(game.filled_stars(), 0);
        game.rating = 9.0;
        assert_eq!(game.filled_stars(), 5);
    }

    #[test]
    fn test_game_serialization() {
        let game = sample_game();
        let json = serde_json::to_string(&game).unwrap();
        let deserialized: Game = serde_json::from_str(&json).unwrap();
        assert_eq!(game, deserialized);
    }
}
