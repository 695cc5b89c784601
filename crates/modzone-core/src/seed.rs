//! Built-in catalog and site configuration used on first run

use crate::models::{Game, Platform, SiteConfig};

#[allow(clippy::too_many_arguments)]
fn game(
    id: &str,
    title: &str,
    description: &str,
    image: &str,
    rating: f64,
    downloads: &str,
    platform: Platform,
    category: &str,
    tags: &[&str],
) -> Game {
    Game {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        rating,
        downloads: downloads.to_string(),
        platform,
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

/// The catalog shipped with a fresh install
pub fn default_games() -> Vec<Game> {
    vec![
        game(
            "1",
            "Clash Royale Mod",
            "Unlimited Gems, Gold, and Max Level Cards instantly.",
            "https://picsum.photos/id/10/200/200",
            4.8,
            "368K",
            Platform::Both,
            "Strategy",
            &["Strategy", "Mod Menu"],
        ),
        game(
            "2",
            "Zooba Mod Menu",
            "Wallhack, Speed Boost, and No Cooldown unlocked.",
            "https://picsum.photos/id/20/200/200",
            4.7,
            "408K",
            Platform::Android,
            "Action",
            &["Action", "Battle Royale"],
        ),
        game(
            "3",
            "Minecraft PE Mod",
            "God Mode, Unlocked Skins, and Texture Packs included.",
            "https://picsum.photos/id/30/200/200",
            4.9,
            "1.2M",
            Platform::Both,
            "Sandbox",
            &["Creative", "Survival"],
        ),
        game(
            "4",
            "Among Us Mod",
            "Always Imposter, No Kill Cooldown, See Ghosts.",
            "https://picsum.photos/id/40/200/200",
            4.5,
            "469K",
            Platform::Android,
            "Strategy",
            &["Multiplayer"],
        ),
        game(
            "5",
            "eFootball 2024 Mod",
            "Unlimited Coins and GP. All players unlocked.",
            "https://picsum.photos/id/50/200/200",
            4.6,
            "332K",
            Platform::Both,
            "Sports",
            &["Sports", "Football"],
        ),
        game(
            "6",
            "Red Dead Mobile",
            "Unofficial mobile port optimized for high-end devices.",
            "https://picsum.photos/id/60/200/200",
            4.8,
            "457K",
            Platform::Ios,
            "Action",
            &["Open World"],
        ),
    ]
}

/// The site configuration shipped with a fresh install
pub fn default_site_config() -> SiteConfig {
    SiteConfig {
        site_name: "MODZONE".to_string(),
        hero_subtitle: "GAME MODS APK".to_string(),
        locker_url: "https://www.google.com".to_string(),
        adsterra_key: String::new(),
    }
}
