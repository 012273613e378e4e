//! The player character: motion integration, damage and the animation state
//! machine.
//!
//! Velocities are in pixels per tick. The position is whole pixels; each tick
//! moves it by the velocity truncated toward zero.

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use plat_core::animation::{directional_name, AnimationSet, Direction};
use plat_core::config::GameConfig;
use plat_core::geometry::Rect;
use plat_core::mask::Mask;
use plat_core::sprite::Sprite;

pub const MAX_JUMPS: u8 = 2;

/// Per-tick physics and animation constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub fps: u32,
    pub gravity: f32,
    pub speed: i32,
    pub animation_delay: u32,
}

impl Tuning {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            fps: config.fps.max(1),
            gravity: config.gravity,
            speed: config.player_speed,
            animation_delay: config.animation_delay.max(1),
        }
    }

    /// Ticks a hit keeps the player invulnerable.
    pub fn hit_window(&self) -> u32 {
        self.fps * 2
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Run,
    Jump,
    DoubleJump,
    Fall,
    Hit,
}

impl AnimationState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::DoubleJump => "double_jump",
            Self::Fall => "fall",
            Self::Hit => "hit",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a hazard contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// Still inside the previous hit's window.
    Ignored,
    Damaged,
    /// The last life was lost.
    Destroyed,
}

pub struct Player {
    pub rect: Rect,
    pub velocity: Vec2,
    pub direction: Direction,
    pub jump_count: u8,
    pub fall_count: u32,
    pub hit: bool,
    pub hit_count: u32,
    pub lives: u32,
    pub animation_count: u32,
    sprite: Sprite,
    sprites: Arc<AnimationSet>,
    tuning: Tuning,
}

impl Player {
    pub fn new(rect: Rect, lives: u32, sprites: Arc<AnimationSet>, tuning: Tuning) -> Self {
        let direction = Direction::default();
        let sprite = sprites
            .frame(
                &directional_name(AnimationState::Idle.name(), direction),
                0,
                tuning.animation_delay,
            )
            .cloned()
            .unwrap_or_else(|| {
                Sprite::solid(rect.w.max(1) as u32, rect.h.max(1) as u32, [255, 0, 0, 255])
            });

        Self {
            rect,
            velocity: Vec2::ZERO,
            direction,
            jump_count: 0,
            fall_count: 0,
            hit: false,
            hit_count: 0,
            lives,
            animation_count: 0,
            sprite,
            sprites,
            tuning,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn mask(&self) -> &Mask {
        self.sprite.mask()
    }

    pub fn jump(&mut self) {
        self.velocity.y = -self.tuning.gravity * 8.0;
        self.animation_count = 0;
        self.jump_count += 1;
        if self.jump_count == 1 {
            self.fall_count = 0;
        }
    }

    pub fn move_left(&mut self, speed: i32) {
        self.velocity.x = -(speed as f32);
        self.face(Direction::Left);
    }

    pub fn move_right(&mut self, speed: i32) {
        self.velocity.x = speed as f32;
        self.face(Direction::Right);
    }

    fn face(&mut self, direction: Direction) {
        if self.direction != direction {
            self.direction = direction;
            self.animation_count = 0;
        }
    }

    /// One integration step: gravity ramp, displacement, hit timer, sprite.
    pub fn tick(&mut self) {
        let fps = self.tuning.fps as f32;
        self.velocity.y += (self.fall_count as f32 / fps * self.tuning.gravity).min(1.0);
        self.displace();

        if self.hit {
            self.hit_count += 1;
        }
        if self.hit_count > self.tuning.hit_window() {
            self.hit = false;
            self.hit_count = 0;
        }

        self.fall_count += 1;
        self.update_sprite();
    }

    /// Position plus velocity, truncated toward zero to whole pixels.
    fn displace(&mut self) {
        self.rect.x = (self.rect.x as f32 + self.velocity.x) as i32;
        self.rect.y = (self.rect.y as f32 + self.velocity.y) as i32;
    }

    pub fn landed(&mut self) {
        self.fall_count = 0;
        self.velocity.y = 0.0;
        self.jump_count = 0;
    }

    pub fn hit_head(&mut self) {
        self.velocity.y = -self.velocity.y;
    }

    pub fn make_hit(&mut self) -> HitResult {
        if self.hit {
            return HitResult::Ignored;
        }
        self.hit = true;
        self.hit_count = 0;
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Player hit, {} lives left", self.lives);
        if self.lives == 0 {
            HitResult::Destroyed
        } else {
            HitResult::Damaged
        }
    }

    pub fn animation_state(&self) -> AnimationState {
        if self.hit {
            AnimationState::Hit
        } else if self.velocity.y < 0.0 {
            match self.jump_count {
                1 => AnimationState::Jump,
                2 => AnimationState::DoubleJump,
                _ => AnimationState::Idle,
            }
        } else if self.velocity.y > self.tuning.gravity * 2.0 {
            AnimationState::Fall
        } else if self.velocity.x != 0.0 {
            AnimationState::Run
        } else {
            AnimationState::Idle
        }
    }

    /// Pick the frame for the current state and advance the frame counter.
    /// The rectangle keeps its top-left corner and takes the frame's size.
    pub fn update_sprite(&mut self) {
        let name = directional_name(self.animation_state().name(), self.direction);
        match self
            .sprites
            .frame(&name, self.animation_count, self.tuning.animation_delay)
        {
            Some(frame) => {
                self.sprite = frame.clone();
                self.rect.w = frame.width() as i32;
                self.rect.h = frame.height() as i32;
            }
            None => log::trace!("No frames for '{name}', keeping current sprite"),
        }
        self.animation_count += 1;
    }
}
