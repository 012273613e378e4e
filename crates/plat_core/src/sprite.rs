use std::sync::Arc;

use image::{imageops, Rgba, RgbaImage};

use crate::mask::Mask;

/// An immutable RGBA8 image together with its collision mask.
///
/// Cloning is cheap: pixel data and mask are shared, so animation sequences
/// and entities can hold handles to the same frame.
#[derive(Debug, Clone)]
pub struct Sprite {
    image: Arc<RgbaImage>,
    mask: Arc<Mask>,
}

impl Sprite {
    pub fn from_image(image: RgbaImage) -> Self {
        let mask = Mask::from_rgba(image.width(), image.height(), image.as_raw());
        Self {
            image: Arc::new(image),
            mask: Arc::new(mask),
        }
    }

    /// Wrap tightly packed RGBA8 pixels. Returns an error when the buffer does
    /// not match the requested dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, String> {
        let len = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            format!(
                "Sprite size mismatch: {}x{} needs {} bytes, got {}",
                width,
                height,
                width as usize * height as usize * 4,
                len
            )
        })?;
        Ok(Self::from_image(image))
    }

    /// A single-color rectangle.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::from_image(RgbaImage::from_pixel(width, height, Rgba(rgba)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Mirror the image left-to-right. Used to derive left-facing frames.
    pub fn flipped_horizontal(&self) -> Self {
        Self::from_image(imageops::flip_horizontal(&*self.image))
    }
}
