//! Collision checks for projectiles and falling blocks
//!
//! Everything is axis-aligned: blocks are rectangles, the projectile is a
//! point grown by its radius plus a fixed hit padding.

use glam::Vec2;

use crate::consts::*;

/// Check whether a projectile overlaps an answer block
///
/// The block rectangle is grown by the projectile radius plus `HIT_PADDING`
/// so near-misses remain forgiving.
#[inline]
pub fn projectile_hits_block(projectile_pos: Vec2, block_pos: Vec2) -> bool {
    let half_w = BLOCK_WIDTH / 2.0 + PROJECTILE_RADIUS + HIT_PADDING;
    let half_h = BLOCK_HEIGHT / 2.0 + PROJECTILE_RADIUS + HIT_PADDING;
    let d = projectile_pos - block_pos;
    d.x.abs() <= half_w && d.y.abs() <= half_h
}

/// Check whether a block's bottom edge has reached the impact line
#[inline]
pub fn block_reached_impact_line(block_pos: Vec2) -> bool {
    block_pos.y + BLOCK_HEIGHT / 2.0 >= IMPACT_LINE_Y
}

/// Check whether a projectile has left the top of the board
#[inline]
pub fn projectile_off_board(projectile_pos: Vec2) -> bool {
    projectile_pos.y < -PROJECTILE_RADIUS
}
