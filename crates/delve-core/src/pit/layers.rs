//! Layer builders for pit shafts
//!
//! Every builder places one horizontal layer and returns the position directly
//! above what it built. Builders that place more than one level (traps) return
//! a position further up, and the shaft loop resynchronizes from it with
//! [`auto_correct_index`].

use delve_blocks::{BlockId, BlockState};
use glam::IVec3;

use crate::config::VolcanoParams;
use crate::world::{WorldMutAccess, WorldRng};

/// Cells of the 2x2 ring, relative to its minimum corner
pub const RING_2X2: [IVec3; 4] = [
    IVec3::new(0, 0, 0),
    IVec3::new(1, 0, 0),
    IVec3::new(0, 0, 1),
    IVec3::new(1, 0, 1),
];

/// Single block
pub fn build_layer(world: &mut dyn WorldMutAccess, pos: IVec3, state: BlockState) -> IVec3 {
    world.replace_with_block(pos, state);
    pos + IVec3::Y
}

/// 2x2 ring, used for logs so the shaft cannot be dug around
pub fn build_log_layer(world: &mut dyn WorldMutAccess, pos: IVec3, state: BlockState) -> IVec3 {
    build_ring(world, pos, state);
    pos + IVec3::Y
}

/// Replace the 2x2 ring at `pos` without moving up
pub fn build_ring(world: &mut dyn WorldMutAccess, pos: IVec3, state: BlockState) {
    for offset in RING_2X2 {
        world.replace_with_block(pos + offset, state);
    }
}

/// Square layer of `width` blocks starting `offset` blocks from `pos` on x and z
pub fn build_square_layer(
    world: &mut dyn WorldMutAccess,
    pos: IVec3,
    state: BlockState,
    offset: i32,
    width: i32,
) -> IVec3 {
    let start = pos + IVec3::new(offset, 0, offset);
    for x in start.x..start.x + width {
        for z in start.z..start.z + width {
            world.replace_with_block(IVec3::new(x, pos.y, z), state);
        }
    }
    pos + IVec3::Y
}

/// Disc of cells strictly inside `radius` around `pos`
///
/// With `decor`, every carved cell may turn its outward neighbours into
/// blackstone or lava.
pub fn build_circle_layer(
    world: &mut dyn WorldMutAccess,
    pos: IVec3,
    radius: i32,
    state: BlockState,
    mut decor: Option<(&mut dyn WorldRng, &VolcanoParams)>,
) -> IVec3 {
    let radius_sq = radius * radius;
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            if dx * dx + dz * dz >= radius_sq {
                continue;
            }
            let cell = pos + IVec3::new(dx, 0, dz);
            world.replace_with_block(cell, state);

            if let Some((rng, params)) = decor.as_mut() {
                if dx != 0 {
                    decorate(world, &mut **rng, *params, cell + IVec3::new(dx.signum(), 0, 0));
                }
                if dz != 0 {
                    decorate(world, &mut **rng, *params, cell + IVec3::new(0, 0, dz.signum()));
                }
            }
        }
    }
    pos + IVec3::Y
}

fn decorate(world: &mut dyn WorldMutAccess, rng: &mut dyn WorldRng, params: &VolcanoParams, pos: IVec3) {
    if world.is_air(pos) {
        return;
    }
    if rng.check_probability(params.blackstone_chance) {
        world.set_block(pos, BlockState::new(BlockId::BLACKSTONE));
    } else if rng.check_probability(params.lava_chance) {
        world.set_block(pos, BlockState::new(BlockId::LAVA));
    }
}

/// Next loop index after building at `y`
///
/// When the builder returned something other than the position right above
/// the layer, continue from one below what it returned.
pub fn auto_correct_index(y: i32, next: IVec3, expected: IVec3) -> i32 {
    if next != expected {
        next.y - 1
    } else {
        y
    }
}
