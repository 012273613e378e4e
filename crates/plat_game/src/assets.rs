//! Sprite sheet loading and the immutable asset registry.
//!
//! Sheets are horizontal strips of equally sized frames. Every frame is cut
//! out, scaled 2x with nearest-neighbour sampling and registered under the
//! file stem of its sheet (`idle.png` -> `idle`, or `idle_left` / `idle_right`
//! for direction-aware sheets).
//!
//! Missing or unreadable files never abort the game: the registry swaps in
//! flat-colored placeholders and logs a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::IVec2;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use plat_core::animation::AnimationSet;
use plat_core::config::GameConfig;
use plat_core::sprite::Sprite;

pub const PLAYER_SHEET_DIR: (&str, &str) = ("MainCharacters", "PinkMan");
pub const PLAYER_FRAME_SIZE: (u32, u32) = (32, 32);
pub const FIRE_SHEET_DIR: (&str, &str) = ("Traps", "Fire");
pub const FIRE_FRAME_SIZE: (u32, u32) = (16, 32);

/// Left edge of the grass tile inside `Terrain/Terrain.png`.
const TERRAIN_TILE_ORIGIN: (u32, u32) = (96, 0);
const SCALE: u32 = 2;

/// Player sequences the state machine can ask for.
pub const PLAYER_ANIMATIONS: [&str; 6] = ["idle", "run", "jump", "double_jump", "fall", "hit"];
pub const FIRE_ANIMATIONS: [&str; 2] = ["off", "on"];

/// Everything the world draws, loaded once at startup.
pub struct AssetRegistry {
    pub player: Arc<AnimationSet>,
    pub fire: Arc<AnimationSet>,
    pub block: Sprite,
    pub background: Sprite,
}

impl AssetRegistry {
    /// Load all sheets under `config.asset_root`, substituting placeholders
    /// for anything that fails.
    pub fn load(config: &GameConfig) -> Self {
        let root = PathBuf::from(&config.asset_root);
        let fallback = Self::placeholder(config);

        let player = match load_sprite_sheets(
            &root,
            PLAYER_SHEET_DIR.0,
            PLAYER_SHEET_DIR.1,
            PLAYER_FRAME_SIZE.0,
            PLAYER_FRAME_SIZE.1,
            true,
        ) {
            Ok(mut set) => {
                fill_missing(&mut set, &fallback.player, "player");
                set
            }
            Err(err) => {
                log::warn!("{err}. Using placeholder player sprites.");
                (*fallback.player).clone()
            }
        };

        let fire = match load_sprite_sheets(
            &root,
            FIRE_SHEET_DIR.0,
            FIRE_SHEET_DIR.1,
            FIRE_FRAME_SIZE.0,
            FIRE_FRAME_SIZE.1,
            false,
        ) {
            Ok(mut set) => {
                fill_missing(&mut set, &fallback.fire, "fire");
                set
            }
            Err(err) => {
                log::warn!("{err}. Using placeholder fire sprites.");
                (*fallback.fire).clone()
            }
        };

        let block = load_block(&root, config.block_size.max(1) as u32).unwrap_or_else(|err| {
            log::warn!("{err}. Using placeholder block.");
            fallback.block.clone()
        });

        let background = load_background(&root, &config.background).unwrap_or_else(|err| {
            log::warn!("{err}. Using placeholder background.");
            fallback.background.clone()
        });

        log::info!(
            "Assets loaded from '{}': {} player sequences, {} fire sequences",
            root.display(),
            player.len(),
            fire.len()
        );

        Self {
            player: Arc::new(player),
            fire: Arc::new(fire),
            block,
            background,
        }
    }

    /// Flat-colored stand-ins with the same frame sizes as the real sheets.
    pub fn placeholder(config: &GameConfig) -> Self {
        let (pw, ph) = (PLAYER_FRAME_SIZE.0 * SCALE, PLAYER_FRAME_SIZE.1 * SCALE);
        let mut player = AnimationSet::new();
        for name in PLAYER_ANIMATIONS {
            let color = match name {
                "hit" => [255, 255, 255, 255],
                _ => [255, 105, 180, 255],
            };
            player.insert_directional(name, vec![Sprite::solid(pw, ph, color)]);
        }

        let (fw, fh) = (FIRE_FRAME_SIZE.0 * SCALE, FIRE_FRAME_SIZE.1 * SCALE);
        let mut fire = AnimationSet::new();
        fire.insert("off", vec![Sprite::solid(fw, fh, [120, 120, 120, 255])]);
        fire.insert(
            "on",
            vec![
                Sprite::solid(fw, fh, [255, 120, 0, 255]),
                Sprite::solid(fw, fh, [255, 200, 0, 255]),
            ],
        );

        let size = config.block_size.max(1) as u32;
        Self {
            player: Arc::new(player),
            fire: Arc::new(fire),
            block: Sprite::solid(size, size, [139, 90, 43, 255]),
            background: Sprite::solid(64, 64, [255, 214, 230, 255]),
        }
    }
}

fn fill_missing(set: &mut AnimationSet, fallback: &AnimationSet, kind: &str) {
    let names: Vec<String> = fallback.names().map(str::to_string).collect();
    for name in names {
        if set.contains(&name) {
            continue;
        }
        if let Some(frames) = fallback.sequence(&name) {
            log::warn!("No '{name}' sequence in {kind} sheets, using placeholder");
            set.insert(&name, frames.to_vec());
        }
    }
}

/// Read every PNG in `root/dir1/dir2` and slice it into `width` x `height`
/// frames scaled 2x. Files are visited in name order.
pub fn load_sprite_sheets(
    root: &Path,
    dir1: &str,
    dir2: &str,
    width: u32,
    height: u32,
    directional: bool,
) -> Result<AnimationSet, String> {
    if width == 0 || height == 0 {
        return Err(format!(
            "Invalid frame size {}x{} for sheets in {dir1}/{dir2}",
            width, height
        ));
    }
    let dir = root.join(dir1).join(dir2);
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map_err(|e| format!("Failed to read sprite dir '{}': {e}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("png"))
        .collect();
    files.sort();

    let mut set = AnimationSet::new();
    for path in files {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let sheet = open_rgba(&path)?;
        let frames = slice_strip(&sheet, width, height);
        if frames.is_empty() {
            log::warn!(
                "Sheet '{}' is narrower than one {}px frame, skipped",
                path.display(),
                width
            );
            continue;
        }
        if directional {
            set.insert_directional(stem, frames);
        } else {
            set.insert(stem, frames);
        }
    }
    Ok(set)
}

/// The terrain tile at `(96, 0)`: a `size` square cut from the sheet, scaled
/// 2x, of which the top-left `size` square is kept.
pub fn load_block(root: &Path, size: u32) -> Result<Sprite, String> {
    let path = root.join("Terrain").join("Terrain.png");
    let sheet = open_rgba(&path)?;
    let (x, y) = TERRAIN_TILE_ORIGIN;
    let tile = cut(&sheet, x, y, size, size);
    let scaled = scale(&tile);
    let block = imageops::crop_imm(&scaled, 0, 0, size, size).to_image();
    Ok(Sprite::from_image(block))
}

pub fn load_background(root: &Path, name: &str) -> Result<Sprite, String> {
    let path = root.join("Background").join(name);
    Ok(Sprite::from_image(open_rgba(&path)?))
}

/// Top-left corners of background tiles covering a `width` x `height` view.
pub fn background_tiles(tile_width: u32, tile_height: u32, width: u32, height: u32) -> Vec<IVec2> {
    let tw = tile_width.max(1);
    let th = tile_height.max(1);
    let mut tiles = Vec::new();
    for i in 0..=(width / tw) {
        for j in 0..=(height / th) {
            tiles.push(IVec2::new((i * tw) as i32, (j * th) as i32));
        }
    }
    tiles
}

fn open_rgba(path: &Path) -> Result<RgbaImage, String> {
    Ok(image::open(path)
        .map_err(|e| format!("Failed to open '{}': {e}", path.display()))?
        .to_rgba8())
}

fn slice_strip(sheet: &RgbaImage, width: u32, height: u32) -> Vec<Sprite> {
    (0..sheet.width() / width)
        .map(|i| Sprite::from_image(scale(&cut(sheet, i * width, 0, width, height))))
        .collect()
}

/// Copy a `width` x `height` window onto a transparent canvas. Parts of the
/// window outside the sheet stay transparent.
fn cut(sheet: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
    let mut frame = RgbaImage::new(width, height);
    if x < sheet.width() && y < sheet.height() {
        let w = width.min(sheet.width() - x);
        let h = height.min(sheet.height() - y);
        let region = imageops::crop_imm(sheet, x, y, w, h).to_image();
        imageops::replace(&mut frame, &region, 0, 0);
    }
    frame
}

fn scale(frame: &RgbaImage) -> RgbaImage {
    imageops::resize(
        frame,
        frame.width() * SCALE,
        frame.height() * SCALE,
        FilterType::Nearest,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "plat_assets_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    /// A strip of `frames` 2x1 frames; frame `i` has red channel `i * 10`
    /// and only its left pixel is opaque.
    fn write_strip(path: &Path, frames: u32) {
        let mut img = RgbaImage::new(frames * 2, 1);
        for i in 0..frames {
            img.put_pixel(i * 2, 0, Rgba([(i * 10) as u8, 0, 0, 255]));
        }
        img.save(path).expect("write strip png");
    }

    #[test]
    fn sheets_are_sliced_scaled_and_named_by_stem() {
        let root = temp_dir_path("sheets");
        let dir = root.join("Traps").join("Fire");
        fs::create_dir_all(&dir).expect("create sheet dir");
        write_strip(&dir.join("on.png"), 3);
        write_strip(&dir.join("off.png"), 1);
        fs::write(dir.join("notes.txt"), "not a sheet").expect("write stray file");

        let set = load_sprite_sheets(&root, "Traps", "Fire", 2, 1, false).expect("sheets load");
        assert_eq!(set.len(), 2);
        let on = set.sequence("on").expect("on sequence");
        assert_eq!(on.len(), 3);
        assert_eq!((on[0].width(), on[0].height()), (4, 2));
        assert_eq!(on[2].pixel(0, 0), Some([20, 0, 0, 255]));
        assert_eq!(on[2].pixel(1, 1), Some([20, 0, 0, 255]));
        assert_eq!(on[2].pixel(2, 0).map(|p| p[3]), Some(0));
        assert_eq!(set.sequence("off").map(<[Sprite]>::len), Some(1));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn directional_sheets_register_mirrored_left_frames() {
        let root = temp_dir_path("directional");
        let dir = root.join("MainCharacters").join("PinkMan");
        fs::create_dir_all(&dir).expect("create sheet dir");
        write_strip(&dir.join("run.png"), 2);

        let set = load_sprite_sheets(&root, "MainCharacters", "PinkMan", 2, 1, true)
            .expect("sheets load");
        let right = set.sequence("run_right").expect("right frames");
        let left = set.sequence("run_left").expect("left frames");
        assert!(!set.contains("run"));
        assert_eq!(right[1].pixel(0, 0), Some([10, 0, 0, 255]));
        assert_eq!(left[1].pixel(3, 0), Some([10, 0, 0, 255]));
        assert_eq!(left[1].pixel(0, 0).map(|p| p[3]), Some(0));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_sheet_dir_is_an_error() {
        let root = temp_dir_path("missing");
        let err = load_sprite_sheets(&root, "Nope", "Nothing", 32, 32, true)
            .expect_err("missing dir should fail");
        assert!(err.contains("Failed to read sprite dir"));
    }

    #[test]
    fn block_is_cut_at_terrain_origin() {
        let root = temp_dir_path("terrain");
        let dir = root.join("Terrain");
        fs::create_dir_all(&dir).expect("create terrain dir");
        let mut sheet = RgbaImage::from_pixel(104, 8, Rgba([0, 0, 255, 255]));
        sheet.put_pixel(96, 0, Rgba([255, 0, 0, 255]));
        sheet.put_pixel(97, 0, Rgba([0, 255, 0, 255]));
        sheet.save(dir.join("Terrain.png")).expect("write terrain png");

        let block = load_block(&root, 4).expect("block loads");
        assert_eq!((block.width(), block.height()), (4, 4));
        assert_eq!(block.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(block.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(block.pixel(2, 0), Some([0, 255, 0, 255]));
        assert_eq!(block.pixel(3, 3), Some([0, 0, 255, 255]));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn background_tiles_cover_the_view() {
        let tiles = background_tiles(64, 64, 800, 600);
        assert_eq!(tiles.len(), 13 * 10);
        assert!(tiles.contains(&IVec2::new(768, 576)));
        assert_eq!(tiles[0], IVec2::ZERO);
    }

    #[test]
    fn placeholder_covers_every_state() {
        let config = GameConfig::default();
        let assets = AssetRegistry::placeholder(&config);
        for name in PLAYER_ANIMATIONS {
            assert!(assets.player.contains(&format!("{name}_left")), "{name}_left");
            assert!(assets.player.contains(&format!("{name}_right")), "{name}_right");
        }
        for name in FIRE_ANIMATIONS {
            assert!(assets.fire.contains(name), "{name}");
        }
        assert_eq!(assets.block.width(), 96);
    }

    #[test]
    fn load_falls_back_when_asset_root_is_missing() {
        let config = GameConfig {
            asset_root: temp_dir_path("no_root").to_string_lossy().to_string(),
            ..GameConfig::default()
        };
        let assets = AssetRegistry::load(&config);
        let idle = assets
            .player
            .frame("idle_left", 0, 3)
            .expect("placeholder idle frame");
        assert_eq!((idle.width(), idle.height()), (64, 64));
        assert_eq!(assets.background.width(), 64);
    }
}
