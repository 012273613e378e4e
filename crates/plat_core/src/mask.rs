//! Per-pixel opacity masks for pixel-accurate collision.
//!
//! A mask is a bit-packed grid with one bit per pixel, one row of `u64`
//! words per image row. Two masks overlap when at least one pixel is set in
//! both after shifting the second by an integer offset.

/// Alpha values strictly above this are treated as solid.
pub const ALPHA_THRESHOLD: u8 = 127;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    fn empty(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    #[cfg(test)]
    pub fn filled(width: u32, height: u32) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                mask.set(x, y, true);
            }
        }
        mask
    }

    /// Build a mask from tightly packed RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let mut mask = Self::empty(width, height);
        for y in 0..height {
            for x in 0..width {
                let alpha_index = ((y * width + x) * 4 + 3) as usize;
                if rgba.get(alpha_index).is_some_and(|&a| a > ALPHA_THRESHOLD) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let word = self.bits[self.word_index(x, y)];
        word & (1u64 << (x % 64)) != 0
    }

    fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = self.word_index(x, y);
        let bit = 1u64 << (x % 64);
        if solid {
            self.bits[index] |= bit;
        } else {
            self.bits[index] &= !bit;
        }
    }

    /// Number of solid pixels.
    #[cfg(test)]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|w| w.count_ones()).sum()
    }

    /// True if any solid pixel of `other`, placed at `offset` relative to this
    /// mask's origin, lands on a solid pixel of this mask.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32) && other.get((x - dx) as u32, (y - dy) as u32) {
                    return true;
                }
            }
        }
        false
    }

    fn word_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.words_per_row + (x / 64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_with_alpha(width: u32, height: u32, solid: &[(u32, u32)]) -> Vec<u8> {
        let mut bytes = vec![0u8; (width * height * 4) as usize];
        for &(x, y) in solid {
            let i = ((y * width + x) * 4) as usize;
            bytes[i..i + 4].copy_from_slice(&[255, 0, 0, 255]);
        }
        bytes
    }

    #[test]
    fn from_rgba_uses_alpha_threshold() {
        let mut bytes = rgba_with_alpha(2, 1, &[]);
        bytes[3] = 127;
        bytes[7] = 128;
        let mask = Mask::from_rgba(2, 1, &bytes);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn filled_mask_spans_word_boundaries() {
        let mask = Mask::filled(70, 3);
        assert_eq!(mask.count(), 210);
        assert!(mask.get(69, 2));
        assert!(!mask.get(70, 2));
    }

    #[test]
    fn overlapping_filled_masks_detect_contact() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(10, 10);
        assert!(a.overlaps(&b, (9, 9)));
        assert!(a.overlaps(&b, (-9, -9)));
        assert!(!a.overlaps(&b, (10, 0)));
        assert!(!a.overlaps(&b, (0, -10)));
    }

    #[test]
    fn transparent_pixels_do_not_collide_even_when_bounds_overlap() {
        // Only the bottom-right pixel of `a` and the top-left pixel of `b`
        // are solid; a one-pixel shift separates them.
        let a = Mask::from_rgba(4, 4, &rgba_with_alpha(4, 4, &[(3, 3)]));
        let b = Mask::from_rgba(4, 4, &rgba_with_alpha(4, 4, &[(0, 0)]));
        assert!(a.overlaps(&b, (3, 3)));
        assert!(!a.overlaps(&b, (2, 3)));
        assert!(!a.overlaps(&b, (1, 1)));
    }
}
