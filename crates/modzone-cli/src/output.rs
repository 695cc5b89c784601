//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use modzone_core::{Game, SiteConfig};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single game
    pub fn print_game(&self, game: &Game) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", game.id);
                println!("Title:       {}", game.title);
                println!("Description: {}", game.description);
                println!("Image:       {}", game.image);
                println!("Rating:      {} ({})", stars(game), game.rating);
                println!("Downloads:   {}", game.downloads);
                println!("Platform:    {}", game.platform);
                println!("Category:    {}", game.category);
                if !game.tags.is_empty() {
                    println!("Tags:        {}", game.tags.join(", "));
                }
            }
            OutputFormat::Json => {
                println!("{}", to_json(game));
            }
            OutputFormat::Quiet => {
                println!("{}", game.id);
            }
        }
    }

    /// Print a list of games
    pub fn print_games(&self, games: &[Game]) {
        match self.format {
            OutputFormat::Human => {
                if games.is_empty() {
                    println!("No games found matching your criteria.");
                    return;
                }
                for game in games {
                    println!(
                        "{:<8} | {:<30} | {:<7} | {:<12} | {} | {}",
                        short_id(&game.id),
                        truncate(&game.title, 30),
                        game.platform,
                        truncate(&game.category, 12),
                        stars(game),
                        game.downloads
                    );
                }
                println!("\n{} game(s)", games.len());
            }
            OutputFormat::Json => {
                println!("{}", to_json(games));
            }
            OutputFormat::Quiet => {
                for game in games {
                    println!("{}", game.id);
                }
            }
        }
    }

    /// Print the category choices
    pub fn print_categories(&self, categories: &[String]) {
        match self.format {
            OutputFormat::Human | OutputFormat::Quiet => {
                for category in categories {
                    println!("{}", category);
                }
            }
            OutputFormat::Json => {
                println!("{}", to_json(categories));
            }
        }
    }

    /// Print the site configuration record
    pub fn print_site(&self, site: &SiteConfig) {
        match self.format {
            OutputFormat::Human => {
                println!("Site:");
                println!("  site_name:     {}", site.site_name);
                println!("  hero_subtitle: {}", site.hero_subtitle);
                println!("  locker_url:    {}", site.locker_url);
                println!("  ad_key:        {}", site.ad_key().unwrap_or("(not set)"));
            }
            OutputFormat::Json => {
                println!("{}", to_json(site));
            }
            OutputFormat::Quiet => {
                println!("{}", site.site_name);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (suppressed in quiet mode)
    pub fn warning(&self, message: &str) {
        if !self.is_quiet() {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

/// Five-star rendering; filled stars are the rating rounded down
pub fn stars(game: &Game) -> String {
    let filled = game.filled_stars();
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// First eight characters of an identifier
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modzone_core::seed::default_games;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("ünïcødé títle", 8), "ünïcø...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("1"), "1");
        assert_eq!(short_id("0f8fad5b-d9cb-469f-a165-70867728950e"), "0f8fad5b");
    }

    #[test]
    fn test_stars() {
        let mut game = default_games().remove(0);
        game.rating = 4.8;
        assert_eq!(stars(&game), "★★★★☆");
        game.rating = 0.0;
        assert_eq!(stars(&game), "☆☆☆☆☆");
    }
}
