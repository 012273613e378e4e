//! Named frame sequences and counter-driven frame selection.
//!
//! Animations here are tick-based: every update advances an integer frame
//! counter and the displayed frame is `(counter / delay) % len`. There is no
//! per-clip timing and no one-shot clips; all sequences loop.
//!
//! Direction-aware sheets are registered twice: `<name>_right` keeps the
//! source order and `<name>_left` holds horizontally mirrored frames.

use std::collections::HashMap;
use std::fmt;

use crate::sprite::Sprite;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Index of the frame to show for a looping sequence.
pub fn frame_index(counter: u32, delay: u32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (counter / delay.max(1)) as usize % len
}

/// Join an animation name and a facing direction, e.g. `run_left`.
pub fn directional_name(name: &str, direction: Direction) -> String {
    format!("{}_{}", name, direction.suffix())
}

/// Frame sequences for one entity kind, keyed by animation name.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    sequences: HashMap<String, Vec<Sprite>>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self {
            sequences: HashMap::new(),
        }
    }

    /// Register a sequence under `name`, replacing any previous one.
    pub fn insert(&mut self, name: &str, frames: Vec<Sprite>) {
        self.sequences.insert(name.to_string(), frames);
    }

    /// Register `<name>_right` as given and `<name>_left` mirrored.
    pub fn insert_directional(&mut self, name: &str, frames: Vec<Sprite>) {
        let mirrored = frames.iter().map(Sprite::flipped_horizontal).collect();
        self.insert(&directional_name(name, Direction::Right), frames);
        self.insert(&directional_name(name, Direction::Left), mirrored);
    }

    pub fn sequence(&self, name: &str) -> Option<&[Sprite]> {
        self.sequences
            .get(name)
            .map(Vec::as_slice)
            .filter(|frames| !frames.is_empty())
    }

    /// Resolve the frame shown for `counter` ticks into a looping sequence.
    pub fn frame(&self, name: &str, counter: u32, delay: u32) -> Option<&Sprite> {
        let frames = self.sequence(name)?;
        frames.get(frame_index(counter, delay, frames.len()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sequence(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }
}
