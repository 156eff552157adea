//! World access traits for generator-world interaction
//!
//! Generators only see the world through these traits, so any host storage
//! (the in-memory `VoxelWorld`, a chunk cache, a test double) can be plugged in.

use delve_blocks::{BlockEntity, BlockState, Blocks};
use glam::IVec3;

/// Read-only access to world state
pub trait WorldAccess {
    /// Get block at world coordinates (air outside the loaded area)
    fn get_block(&self, pos: IVec3) -> BlockState;

    /// Get block registry
    fn blocks(&self) -> &Blocks;

    /// Lowest buildable Y (inclusive)
    fn min_height(&self) -> i32;

    /// Highest buildable Y (exclusive)
    fn max_height(&self) -> i32;

    /// Block entity at world coordinates, if any
    fn block_entity(&self, pos: IVec3) -> Option<&BlockEntity>;

    fn is_height_valid(&self, y: i32) -> bool {
        y >= self.min_height() && y < self.max_height()
    }

    fn is_air(&self, pos: IVec3) -> bool {
        self.get_block(pos).is_air()
    }

    fn is_solid(&self, pos: IVec3) -> bool {
        self.blocks().is_solid(self.get_block(pos).block_id)
    }

    /// First non-solid position above the highest solid block of the column
    fn surface_pos(&self, x: i32, z: i32) -> IVec3 {
        let mut y = self.max_height() - 1;
        while y >= self.min_height() {
            if self.is_solid(IVec3::new(x, y, z)) {
                return IVec3::new(x, y + 1, z);
            }
            y -= 1;
        }
        IVec3::new(x, self.min_height(), z)
    }

    /// Percentage (0-100) of solid blocks in the `size_x` by `size_z` layer starting at `origin`
    fn solid_percentage(&self, origin: IVec3, size_x: i32, size_z: i32) -> f32 {
        layer_percentage(origin, size_x, size_z, |pos| self.is_solid(pos))
    }

    /// Percentage (0-100) of air blocks in the `size_x` by `size_z` layer starting at `origin`
    fn air_percentage(&self, origin: IVec3, size_x: i32, size_z: i32) -> f32 {
        layer_percentage(origin, size_x, size_z, |pos| self.is_air(pos))
    }

    /// Solid-ground check for a footprint laid on the layer at `origin`
    fn is_solid_base(&self, origin: IVec3, size_x: i32, size_z: i32, percent_required: f32) -> bool {
        self.solid_percentage(origin, size_x, size_z) >= percent_required
    }

    /// Clearance check for a footprint laid on the layer at `origin`
    fn is_air_base(&self, origin: IVec3, size_x: i32, size_z: i32, percent_required: f32) -> bool {
        self.air_percentage(origin, size_x, size_z) >= percent_required
    }
}

/// Mutable access to world for placing generated blocks
pub trait WorldMutAccess: WorldAccess {
    /// Set block at world coordinates; creates or clears block entities as needed
    fn set_block(&mut self, pos: IVec3, state: BlockState);

    /// Mutable block entity at world coordinates, if any
    fn block_entity_mut(&mut self, pos: IVec3) -> Option<&mut BlockEntity>;

    /// Replace a non-air block; existing air is left untouched
    ///
    /// Returns whether the block was placed.
    fn replace_with_block(&mut self, pos: IVec3, state: BlockState) -> bool {
        if self.is_air(pos) {
            return false;
        }
        self.set_block(pos, state);
        true
    }
}

fn layer_percentage(
    origin: IVec3,
    size_x: i32,
    size_z: i32,
    mut predicate: impl FnMut(IVec3) -> bool,
) -> f32 {
    if size_x <= 0 || size_z <= 0 {
        return 0.0;
    }

    let mut hits = 0;
    for dz in 0..size_z {
        for dx in 0..size_x {
            if predicate(origin + IVec3::new(dx, 0, dz)) {
                hits += 1;
            }
        }
    }

    hits as f32 * 100.0 / (size_x * size_z) as f32
}
