//! Pixel-mask collision between the player and level objects.
//!
//! Resolution is axis-separated. A horizontal probe shifts a copy of the
//! player rectangle sideways and reports the first solid object its mask
//! touches; the caller uses that to veto input. The vertical pass works on
//! the player's real position after integration, snapping it out of every
//! solid object it overlaps.
//!
//! Checkpoints are not solid. They are matched with plain rectangle overlap.

use plat_core::geometry::Rect;
use plat_core::mask::Mask;

use crate::entities::Object;
use crate::player::Player;

/// True if the opaque pixels of two placed masks intersect.
pub fn collide_mask(a_rect: &Rect, a_mask: &Mask, b_rect: &Rect, b_mask: &Mask) -> bool {
    a_mask.overlaps(b_mask, (b_rect.x - a_rect.x, b_rect.y - a_rect.y))
}

/// Index of the first solid object the player would touch after moving `dx`
/// pixels sideways. The player itself is not moved.
pub fn probe_horizontal(player: &Player, objects: &[Object], dx: i32) -> Option<usize> {
    let probe = player.rect.translated(dx, 0);
    objects.iter().position(|obj| {
        obj.is_solid() && collide_mask(&probe, player.mask(), obj.rect(), obj.mask())
    })
}

/// Push the player out of every solid object it overlaps. `dy` is the
/// vertical velocity that produced the overlap: falling lands on the object's
/// top, rising bumps against its bottom. Returns the indices of all
/// overlapping objects, including those touched with `dy == 0`.
pub fn resolve_vertical(player: &mut Player, objects: &[Object], dy: f32) -> Vec<usize> {
    let mut collided = Vec::new();
    for (index, obj) in objects.iter().enumerate() {
        if !obj.is_solid() {
            continue;
        }
        if !collide_mask(&player.rect, player.mask(), obj.rect(), obj.mask()) {
            continue;
        }
        if dy > 0.0 {
            player.rect.set_bottom(obj.rect().top());
            player.landed();
        } else if dy < 0.0 {
            player.rect.set_top(obj.rect().bottom());
            player.hit_head();
        }
        collided.push(index);
    }
    collided
}

pub fn touching_checkpoint(player_rect: &Rect, objects: &[Object]) -> bool {
    objects
        .iter()
        .any(|obj| obj.is_checkpoint() && player_rect.collides(obj.rect()))
}
