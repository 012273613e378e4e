//! Level objects the player collides with.

use std::sync::Arc;

use plat_core::animation::{frame_index, AnimationSet};
use plat_core::geometry::Rect;
use plat_core::mask::Mask;
use plat_core::sprite::Sprite;

pub const CHECKPOINT_COLOR: [u8; 4] = [200, 150, 255, 255];
const FIRE_ANIMATION_DELAY: u32 = 3;

pub struct Block {
    pub rect: Rect,
    sprite: Sprite,
}

impl Block {
    pub fn new(x: i32, y: i32, sprite: &Sprite) -> Self {
        Self {
            rect: Rect::new(x, y, sprite.width() as i32, sprite.height() as i32),
            sprite: sprite.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireState {
    Off,
    On,
}

impl FireState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }
}

/// Animated hazard. Touching it costs the player a life.
pub struct Fire {
    pub rect: Rect,
    state: FireState,
    animation_count: u32,
    sprite: Sprite,
    sprites: Arc<AnimationSet>,
}

impl Fire {
    pub fn new(rect: Rect, sprites: Arc<AnimationSet>) -> Self {
        let sprite = sprites
            .frame(FireState::Off.name(), 0, FIRE_ANIMATION_DELAY)
            .cloned()
            .unwrap_or_else(|| {
                Sprite::solid(rect.w.max(1) as u32, rect.h.max(1) as u32, [255, 120, 0, 255])
            });
        Self {
            rect,
            state: FireState::Off,
            animation_count: 0,
            sprite,
            sprites,
        }
    }

    pub fn on(&mut self) {
        self.state = FireState::On;
    }

    /// Show the next frame. The counter wraps once `counter / 3` passes the
    /// sequence length.
    pub fn tick(&mut self) {
        let Some(frames) = self.sprites.sequence(self.state.name()) else {
            return;
        };
        let len = frames.len();
        let frame = &frames[frame_index(self.animation_count, FIRE_ANIMATION_DELAY, len)];
        self.sprite = frame.clone();
        self.rect.w = frame.width() as i32;
        self.rect.h = frame.height() as i32;
        self.animation_count += 1;

        if (self.animation_count / FIRE_ANIMATION_DELAY) as usize > len {
            self.animation_count = 0;
        }
    }
}

/// End-of-level marker. Not solid; the world tests it with plain rectangle
/// overlap.
pub struct Checkpoint {
    pub rect: Rect,
    sprite: Sprite,
}

impl Checkpoint {
    pub fn new(rect: Rect) -> Self {
        let sprite = Sprite::solid(rect.w.max(0) as u32, rect.h.max(0) as u32, CHECKPOINT_COLOR);
        Self { rect, sprite }
    }
}

pub enum Object {
    Block(Block),
    Fire(Fire),
    Checkpoint(Checkpoint),
}

impl Object {
    pub fn rect(&self) -> &Rect {
        match self {
            Self::Block(b) => &b.rect,
            Self::Fire(f) => &f.rect,
            Self::Checkpoint(c) => &c.rect,
        }
    }

    pub fn sprite(&self) -> &Sprite {
        match self {
            Self::Block(b) => &b.sprite,
            Self::Fire(f) => &f.sprite,
            Self::Checkpoint(c) => &c.sprite,
        }
    }

    pub fn mask(&self) -> &Mask {
        self.sprite().mask()
    }

    /// Solid objects block movement and take part in mask collision.
    pub fn is_solid(&self) -> bool {
        !matches!(self, Self::Checkpoint(_))
    }

    pub fn is_hazard(&self) -> bool {
        matches!(self, Self::Fire(_))
    }

    pub fn is_checkpoint(&self) -> bool {
        matches!(self, Self::Checkpoint(_))
    }

    pub fn tick(&mut self) {
        if let Self::Fire(fire) = self {
            fire.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire_sprites() -> Arc<AnimationSet> {
        let mut set = AnimationSet::new();
        set.insert("off", vec![Sprite::solid(32, 64, [90, 90, 90, 255])]);
        set.insert(
            "on",
            vec![
                Sprite::solid(32, 64, [255, 0, 0, 255]),
                Sprite::solid(32, 64, [255, 128, 0, 255]),
            ],
        );
        Arc::new(set)
    }

    #[test]
    fn fire_starts_off_and_adopts_frame_size_on_tick() {
        let mut fire = Fire::new(Rect::new(100, 440, 16, 32), fire_sprites());
        assert_eq!(fire.state, FireState::Off);
        assert_eq!(fire.rect, Rect::new(100, 440, 16, 32));

        fire.on();
        assert_eq!(fire.state, FireState::On);
        fire.tick();
        assert_eq!(fire.rect, Rect::new(100, 440, 32, 64));
        assert_eq!(fire.sprite.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn fire_counter_resets_after_passing_sequence_length() {
        let mut fire = Fire::new(Rect::new(0, 0, 16, 32), fire_sprites());
        fire.on();
        let mut counters = Vec::new();
        let mut greens = Vec::new();
        for _ in 0..10 {
            fire.tick();
            counters.push(fire.animation_count);
            greens.push(fire.sprite.pixel(0, 0).map(|p| p[1]));
        }
        // Counter reaches 9 (9 / 3 = 3 > 2 frames) and wraps to 0.
        assert_eq!(counters, vec![1, 2, 3, 4, 5, 6, 7, 8, 0, 1]);
        assert_eq!(
            greens,
            vec![
                Some(0),
                Some(0),
                Some(0),
                Some(128),
                Some(128),
                Some(128),
                Some(0),
                Some(0),
                Some(0),
                Some(0)
            ]
        );
    }

    #[test]
    fn only_checkpoints_are_passable() {
        let block = Object::Block(Block::new(0, 0, &Sprite::solid(96, 96, [0, 0, 0, 255])));
        let fire = Object::Fire(Fire::new(Rect::new(0, 0, 16, 32), fire_sprites()));
        let checkpoint = Object::Checkpoint(Checkpoint::new(Rect::new(0, 0, 50, 50)));

        assert!(block.is_solid() && !block.is_hazard());
        assert!(fire.is_solid() && fire.is_hazard());
        assert!(!checkpoint.is_solid() && checkpoint.is_checkpoint());
        assert_eq!(checkpoint.sprite().pixel(10, 10), Some(CHECKPOINT_COLOR));
    }
}
