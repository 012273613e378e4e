//! Level state and the per-tick update.
//!
//! `advance()` runs one simulation tick in a fixed order:
//!
//!   1. honor a jump request while fewer than two jumps are used
//!   2. integrate the player (gravity ramp, displacement, hit timer, sprite)
//!   3. advance object animations
//!   4. probe left and right, apply held movement that is not blocked
//!   5. vertical collision resolution
//!   6. hazard damage from every contact of steps 4 and 5
//!   7. checkpoint overlap
//!
//! Drawing and the camera update happen afterwards, driven by the main loop.
//! Once the game is over `advance()` returns immediately and nothing moves.

use std::fmt;

use glam::IVec2;
use plat_core::config::GameConfig;
use plat_core::geometry::Rect;
use plat_core::sprite::Sprite;
use plat_render::Canvas;

use crate::assets::AssetRegistry;
use crate::camera::ScrollCamera;
use crate::collision::{probe_horizontal, resolve_vertical, touching_checkpoint};
use crate::entities::{Block, Checkpoint, Fire, Object};
use crate::level::LevelLayout;
use crate::player::{HitResult, Player, Tuning, MAX_JUMPS};

/// Input for one tick. `jump` is edge-triggered; `left` and `right` are held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    LivesExhausted,
    CheckpointReached,
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LivesExhausted => f.write_str("no lives left"),
            Self::CheckpointReached => f.write_str("checkpoint reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver(GameOverReason),
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

pub struct World {
    pub player: Player,
    pub objects: Vec<Object>,
    pub camera: ScrollCamera,
    status: GameStatus,
    tick_count: u64,
    tuning: Tuning,
}

impl World {
    /// Build every entity of `level` once. Objects keep the layout's order:
    /// floor, blocks, fires, checkpoints.
    pub fn from_level(config: &GameConfig, level: &LevelLayout, assets: &AssetRegistry) -> Self {
        let tuning = Tuning::from_config(config);
        let mut objects = Vec::new();

        for (x, y) in level.block_positions(config.block_size) {
            objects.push(Object::Block(Block::new(x, y, &assets.block)));
        }
        for placement in &level.fires {
            let mut fire = Fire::new(
                Rect::new(placement.x, placement.y, placement.w, placement.h),
                assets.fire.clone(),
            );
            if placement.on {
                fire.on();
            }
            objects.push(Object::Fire(fire));
        }
        for rect in &level.checkpoints {
            objects.push(Object::Checkpoint(Checkpoint::new(*rect)));
        }

        log::info!(
            "Level built: {} objects, player at ({}, {})",
            objects.len(),
            level.player.x,
            level.player.y
        );

        Self {
            player: Player::new(
                level.player,
                config.starting_lives,
                assets.player.clone(),
                tuning,
            ),
            objects,
            camera: ScrollCamera::new(config.width as i32, config.scroll_area_width),
            status: GameStatus::Playing,
            tick_count: 0,
            tuning,
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Simulation ticks run so far. Stops counting once the game is over.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance(&mut self, input: FrameInput) -> GameStatus {
        if self.status.is_over() {
            return self.status;
        }

        if input.jump && self.player.jump_count < MAX_JUMPS {
            self.player.jump();
        }

        self.player.tick();
        for obj in &mut self.objects {
            obj.tick();
        }

        let contacts = self.handle_move(input);
        for index in contacts {
            if !self.objects[index].is_hazard() {
                continue;
            }
            if self.player.make_hit() == HitResult::Destroyed {
                self.status = GameStatus::GameOver(GameOverReason::LivesExhausted);
            }
        }

        if !self.status.is_over() && touching_checkpoint(&self.player.rect, &self.objects) {
            self.status = GameStatus::GameOver(GameOverReason::CheckpointReached);
        }

        self.tick_count += 1;
        self.status
    }

    /// Gate held movement on the side probes, then resolve vertical overlap.
    /// Returns every object touched, in probe-left, probe-right, vertical
    /// order.
    fn handle_move(&mut self, input: FrameInput) -> Vec<usize> {
        let speed = self.tuning.speed;
        self.player.velocity.x = 0.0;
        let blocked_left = probe_horizontal(&self.player, &self.objects, -speed * 2);
        let blocked_right = probe_horizontal(&self.player, &self.objects, speed * 2);

        if input.left && blocked_left.is_none() {
            self.player.move_left(speed);
        }
        if input.right && blocked_right.is_none() {
            self.player.move_right(speed);
        }

        let dy = self.player.velocity.y;
        let vertical = resolve_vertical(&mut self.player, &self.objects, dy);

        blocked_left
            .into_iter()
            .chain(blocked_right)
            .chain(vertical)
            .collect()
    }

    /// Move the camera after the frame is drawn. Frozen once the game is over.
    pub fn scroll_camera(&mut self) {
        if self.status.is_over() {
            return;
        }
        self.camera
            .follow(&self.player.rect, self.player.velocity.x as i32);
    }

    /// Background tiles first (not scrolled), then objects, then the player.
    pub fn draw(&self, canvas: &mut Canvas, background: &Sprite, tiles: &[IVec2]) {
        for tile in tiles {
            canvas.blit(background, *tile);
        }
        for obj in &self.objects {
            canvas.blit(obj.sprite(), self.camera.to_screen(obj.rect()));
        }
        canvas.blit(
            self.player.sprite(),
            self.camera.to_screen(&self.player.rect),
        );
    }
}
