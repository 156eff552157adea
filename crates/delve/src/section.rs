//! ASCII cross-sections of the generated world

use delve_core::WorldAccess;
use glam::IVec3;

/// Vertical slice through `z`, one row per level from `max_y` down to `min_y`
///
/// Each row is prefixed with its y coordinate. Rows use the block glyphs of the
/// world's registry.
pub fn render_x_slice(world: &dyn WorldAccess, z: i32, min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> String {
    let mut out = String::new();
    for y in (min_y..=max_y).rev() {
        out.push_str(&format!("{:>4} |", y));
        for x in min_x..=max_x {
            let block = world.get_block(IVec3::new(x, y, z));
            out.push(world.blocks().glyph(block.block_id));
        }
        out.push_str("|\n");
    }
    out
}
