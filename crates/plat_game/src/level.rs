use plat_core::config::GameConfig;
use plat_core::geometry::Rect;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Static placement data for one level. Entities are built from it once at
/// level start and never added or removed during play.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LevelLayout {
    pub player: Rect,
    #[serde(default)]
    pub floor: Option<FloorRun>,
    #[serde(default)]
    pub blocks: Vec<BlockPlacement>,
    #[serde(default)]
    pub fires: Vec<FirePlacement>,
    #[serde(default)]
    pub checkpoints: Vec<Rect>,
}

/// A row of blocks at height `y`, one per tile index in `from_tile..to_tile`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FloorRun {
    pub y: i32,
    pub from_tile: i32,
    pub to_tile: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct BlockPlacement {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FirePlacement {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_fire_width")]
    pub w: i32,
    #[serde(default = "default_fire_height")]
    pub h: i32,
    #[serde(default = "default_fire_on")]
    pub on: bool,
}

impl LevelLayout {
    /// The stock level for a window of `config.width` x `config.height`.
    pub fn default_for(config: &GameConfig) -> Self {
        let width = config.width as i32;
        let height = config.height as i32;
        let block = config.block_size;

        Self {
            player: Rect::new(100, 100, 50, 50),
            floor: Some(FloorRun {
                y: height - block,
                from_tile: (-width).div_euclid(block),
                to_tile: (width * 2).div_euclid(block),
            }),
            blocks: vec![
                BlockPlacement {
                    x: 0,
                    y: height - block * 2,
                },
                BlockPlacement {
                    x: block * 3,
                    y: height - block * 4,
                },
            ],
            fires: vec![FirePlacement {
                x: 100,
                y: height - block - 64,
                w: default_fire_width(),
                h: default_fire_height(),
                on: true,
            }],
            checkpoints: vec![Rect::new(width * 2 - 50, height - block * 2, 50, 50)],
        }
    }

    /// Top-left corners of every block in build order: floor first, then the
    /// free-standing blocks.
    pub fn block_positions(&self, block_size: i32) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        if let Some(floor) = &self.floor {
            for i in floor.from_tile..floor.to_tile {
                out.push((i * block_size, floor.y));
            }
        }
        out.extend(self.blocks.iter().map(|b| (b.x, b.y)));
        out
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelLayout, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level file {}: {e}", path.display()))?;
    let level: LevelLayout = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

/// Load `path` when it exists, otherwise build the stock level.
pub fn load_level_or_default(path: &Path, config: &GameConfig) -> Result<LevelLayout, String> {
    if !path.exists() {
        log::info!(
            "No level at '{}', using the built-in layout",
            path.display()
        );
        return Ok(LevelLayout::default_for(config));
    }
    load_level_from_path(path)
}

fn validate_level(level: &LevelLayout) -> Result<(), String> {
    if level.player.w <= 0 || level.player.h <= 0 {
        return Err("Level validation failed: player size must be > 0".to_string());
    }
    if let Some(floor) = &level.floor {
        if floor.from_tile > floor.to_tile {
            return Err(format!(
                "Level validation failed: floor from_tile {} is past to_tile {}",
                floor.from_tile, floor.to_tile
            ));
        }
    }
    for fire in &level.fires {
        if fire.w <= 0 || fire.h <= 0 {
            return Err(format!(
                "Level validation failed: fire at ({}, {}) has no area",
                fire.x, fire.y
            ));
        }
    }
    for checkpoint in &level.checkpoints {
        if checkpoint.w <= 0 || checkpoint.h <= 0 {
            return Err(format!(
                "Level validation failed: checkpoint at ({}, {}) has no area",
                checkpoint.x, checkpoint.y
            ));
        }
    }
    if level.floor.is_none() && level.blocks.is_empty() {
        log::warn!("Level has no floor and no blocks. The player will fall forever.");
    }
    Ok(())
}

const fn default_fire_width() -> i32 {
    16
}

const fn default_fire_height() -> i32 {
    32
}

const fn default_fire_on() -> bool {
    true
}
