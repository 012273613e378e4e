use crate::world::FrameInput;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub jump: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// One `FrameInput` per tick. A jump is a key press, so it only lands on
    /// the first tick of a repeated frame.
    pub fn expanded_inputs(&self) -> Vec<FrameInput> {
        let mut out = Vec::new();
        for frame in &self.frames {
            for i in 0..frame.repeat.max(1) {
                out.push(FrameInput {
                    left: frame.left,
                    right: frame.right,
                    jump: frame.jump && i == 0,
                });
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetRegistry;
    use crate::level::LevelLayout;
    use crate::world::World;
    use plat_core::config::GameConfig;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "plat_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "right": true, "repeat": 3 },
                { "jump": true, "repeat": 2 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let expanded = replay.expanded_inputs();
        assert_eq!(expanded.len(), 5);
        assert!(expanded[..3].iter().all(|f| f.right && !f.jump));
        assert!(expanded[3].jump);
        assert!(!expanded[4].jump);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_replay_is_rejected() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");

        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_run_is_deterministic() {
        let path = temp_file_path("deterministic");
        fs::write(
            &path,
            r#"{
              "frames": [
                { "repeat": 90 },
                { "right": true, "repeat": 60 },
                { "right": true, "jump": true, "repeat": 8 },
                { "right": true, "jump": true, "repeat": 30 },
                { "left": true, "repeat": 120 },
                { "left": true, "right": true, "repeat": 20 }
              ]
            }"#,
        )
        .expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        let inputs = replay.expanded_inputs();
        let config = GameConfig::default();
        let level = LevelLayout::default_for(&config);
        let assets = AssetRegistry::placeholder(&config);

        let mut run_a = World::from_level(&config, &level, &assets);
        let mut run_b = World::from_level(&config, &level, &assets);
        for input in &inputs {
            run_a.advance(*input);
            run_a.scroll_camera();
        }
        for input in &inputs {
            run_b.advance(*input);
            run_b.scroll_camera();
        }

        assert_eq!(run_a.player.rect, run_b.player.rect);
        assert_eq!(run_a.player.velocity, run_b.player.velocity);
        assert_eq!(run_a.player.lives, run_b.player.lives);
        assert_eq!(run_a.player.jump_count, run_b.player.jump_count);
        assert_eq!(run_a.camera.offset_x, run_b.camera.offset_x);
        assert_eq!(run_a.status(), run_b.status());
        assert_eq!(run_a.tick_count(), run_b.tick_count());

        let _ = fs::remove_file(path);
    }
}
