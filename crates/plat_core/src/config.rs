//! Game tuning and window configuration.
//!
//! Every field has a default, so a config file only needs to list the values
//! it overrides. With no file at all the defaults reproduce the stock game:
//! an 800x600 window at 60 ticks per second.

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub window_title: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Horizontal run speed in pixels per tick.
    pub player_speed: i32,
    pub gravity: f32,
    /// Ticks each animation frame stays on screen.
    pub animation_delay: u32,
    pub block_size: i32,
    /// Distance from either viewport edge at which the camera starts to scroll.
    pub scroll_area_width: i32,
    pub starting_lives: u32,
    pub game_over_delay_ms: u64,
    pub asset_root: String,
    pub background: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_title: "Super Mario Bros Inspired Platformer Game".to_string(),
            width: 800,
            height: 600,
            fps: 60,
            player_speed: 7,
            gravity: 1.0,
            animation_delay: 3,
            block_size: 96,
            scroll_area_width: 200,
            starting_lives: 3,
            game_over_delay_ms: 2000,
            asset_root: "gameDetails".to_string(),
            background: "Pink.png".to_string(),
        }
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path` when it exists, otherwise fall back to the built-in defaults.
pub fn load_config_or_default(path: &Path) -> Result<GameConfig, String> {
    if !path.exists() {
        log::info!(
            "No config at '{}', using built-in defaults",
            path.display()
        );
        return Ok(GameConfig::default());
    }
    load_config_from_path(path)
}

pub fn validate_config(config: &GameConfig) -> Result<(), String> {
    if config.width == 0 || config.height == 0 {
        return Err("Config validation failed: width and height must be > 0".to_string());
    }
    if config.fps == 0 {
        return Err("Config validation failed: fps must be > 0".to_string());
    }
    if config.block_size <= 0 {
        return Err("Config validation failed: block_size must be > 0".to_string());
    }
    if config.player_speed <= 0 {
        return Err("Config validation failed: player_speed must be > 0".to_string());
    }
    if config.starting_lives == 0 {
        return Err("Config validation failed: starting_lives must be > 0".to_string());
    }
    if config.scroll_area_width < 0 || config.scroll_area_width as u32 * 2 > config.width {
        return Err(format!(
            "Config validation failed: scroll_area_width {} does not fit a {}px wide window",
            config.scroll_area_width, config.width
        ));
    }
    Ok(())
}
