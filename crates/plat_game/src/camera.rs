use glam::IVec2;
use plat_core::geometry::Rect;

/// Side-scrolling camera. Only the horizontal offset moves; it shifts by the
/// player's velocity whenever the player's leading edge enters the scroll
/// area on the side they are travelling toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollCamera {
    pub offset_x: i32,
    pub scroll_area_width: i32,
    pub viewport_width: i32,
}

impl ScrollCamera {
    pub fn new(viewport_width: i32, scroll_area_width: i32) -> Self {
        Self {
            offset_x: 0,
            scroll_area_width,
            viewport_width,
        }
    }

    pub fn follow(&mut self, rect: &Rect, x_vel: i32) {
        let right_edge = rect.right() - self.offset_x;
        let left_edge = rect.left() - self.offset_x;
        if (right_edge >= self.viewport_width - self.scroll_area_width && x_vel > 0)
            || (left_edge <= self.scroll_area_width && x_vel < 0)
        {
            self.offset_x += x_vel;
        }
    }

    pub fn to_screen(&self, rect: &Rect) -> IVec2 {
        rect.top_left() - IVec2::new(self.offset_x, 0)
    }
}
