pub mod hud;

pub use hud::{HudOverlay, HudStats};
