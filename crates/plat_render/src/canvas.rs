//! CPU framebuffer the game composites into before upload.
//!
//! Draws are `(sprite, screen position)` pairs blended with straight alpha
//! ("source over"). Anything outside the canvas is clipped.

use glam::IVec2;
use image::{imageops, Rgba, RgbaImage};
use plat_core::sprite::Sprite;

pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn clear(&mut self, rgba: [u8; 4]) {
        for px in self.image.pixels_mut() {
            *px = Rgba(rgba);
        }
    }

    /// Draw `sprite` with its top-left corner at `pos`.
    pub fn blit(&mut self, sprite: &Sprite, pos: IVec2) {
        imageops::overlay(&mut self.image, sprite.image(), pos.x as i64, pos.y as i64);
    }
}
