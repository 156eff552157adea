//! Writing a blueprint into the world

use delve_blocks::{BlockId, BlockState};
use glam::IVec3;

use crate::world::WorldMutAccess;

use super::markers::MarkerMap;
use super::placement::Placement;
use super::template::{BlueprintTemplate, PlacedTemplate};

/// Stamp `template` at `placement`
///
/// Cells holding the map's null block are not placed, so the world keeps
/// whatever was there. Marker placeholders are restored to their gameplay
/// block and directional blocks are rotated with the template.
pub fn stamp<'a>(
    world: &mut dyn WorldMutAccess,
    template: &'a BlueprintTemplate,
    placement: Placement,
    marker_map: &MarkerMap,
) -> PlacedTemplate<'a> {
    let null_block = marker_map.null_block();
    let turns = placement.rotation.quarter_turns();

    for (local, state) in template.blocks() {
        if state.block_id == null_block {
            continue;
        }
        let state = match marker_map.kind_for(state.block_id) {
            Some(kind) => match kind.restore(*state) {
                Some(restored) => restored,
                None => continue,
            },
            None => *state,
        };
        world.set_block(placement.to_world(*local), state.rotated_cw(turns));
    }

    log::debug!(
        "Stamped {}x{}x{} template at {} ({})",
        placement.rotated_size.x,
        placement.rotated_size.y,
        placement.rotated_size.z,
        placement.anchor,
        placement.rotation
    );

    PlacedTemplate { template, placement }
}

/// Fill air directly beneath the footprint with dirt
///
/// Returns the number of blocks placed.
pub fn fill_below(world: &mut dyn WorldMutAccess, footprint_origin: IVec3, rotated_size: IVec3) -> usize {
    let y = footprint_origin.y - 1;
    let mut filled = 0;
    for x in 0..rotated_size.x {
        for z in 0..rotated_size.z {
            let pos = IVec3::new(footprint_origin.x + x, y, footprint_origin.z + z);
            if world.is_air(pos) {
                world.set_block(pos, BlockState::new(BlockId::DIRT));
                filled += 1;
            }
        }
    }
    filled
}
