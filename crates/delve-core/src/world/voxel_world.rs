//! In-memory chunked voxel world
//!
//! Reference implementation of `WorldAccess`/`WorldMutAccess` used by the
//! headless tool and the tests. Chunks are allocated lazily on first write.

use ahash::AHashMap;
use delve_blocks::{BlockEntity, BlockState, Blocks};
use glam::IVec3;

use super::access::{WorldAccess, WorldMutAccess};
use super::chunk::Chunk;

/// Default lowest buildable Y
pub const DEFAULT_MIN_HEIGHT: i32 = 0;
/// Default highest buildable Y (exclusive)
pub const DEFAULT_MAX_HEIGHT: i32 = 256;

pub struct VoxelWorld {
    /// Loaded chunks, keyed by chunk coordinates
    chunks: AHashMap<IVec3, Chunk>,
    block_entities: AHashMap<IVec3, BlockEntity>,
    blocks: Blocks,
    min_height: i32,
    max_height: i32,
}

impl VoxelWorld {
    pub fn new(min_height: i32, max_height: i32) -> Self {
        Self {
            chunks: AHashMap::new(),
            block_entities: AHashMap::new(),
            blocks: Blocks::new(),
            min_height,
            max_height,
        }
    }

    /// Fill the inclusive box `from..=to` with a block
    pub fn fill(&mut self, from: IVec3, to: IVec3, state: BlockState) {
        let min = from.min(to);
        let max = from.max(to);
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set_block(IVec3::new(x, y, z), state);
                }
            }
        }
    }

    /// Count blocks of the given ID inside the inclusive box `from..=to`
    pub fn count_blocks(&self, from: IVec3, to: IVec3, block_id: u16) -> usize {
        let min = from.min(to);
        let max = from.max(to);
        let mut count = 0;
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    if self.get_block(IVec3::new(x, y, z)).block_id == block_id {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Positions of every block entity, sorted for stable output
    pub fn block_entity_positions(&self) -> Vec<IVec3> {
        let mut positions: Vec<IVec3> = self.block_entities.keys().copied().collect();
        positions.sort_by_key(|p| (p.y, p.z, p.x));
        positions
    }

    /// Number of allocated chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl Default for VoxelWorld {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HEIGHT, DEFAULT_MAX_HEIGHT)
    }
}

impl WorldAccess for VoxelWorld {
    fn get_block(&self, pos: IVec3) -> BlockState {
        let (chunk_pos, x, y, z) = Chunk::split(pos);
        self.chunks
            .get(&chunk_pos)
            .map(|chunk| chunk.get(x, y, z))
            .unwrap_or(BlockState::AIR)
    }

    fn blocks(&self) -> &Blocks {
        &self.blocks
    }

    fn min_height(&self) -> i32 {
        self.min_height
    }

    fn max_height(&self) -> i32 {
        self.max_height
    }

    fn block_entity(&self, pos: IVec3) -> Option<&BlockEntity> {
        self.block_entities.get(&pos)
    }
}

impl WorldMutAccess for VoxelWorld {
    fn set_block(&mut self, pos: IVec3, state: BlockState) {
        if !self.is_height_valid(pos.y) {
            return;
        }

        let (chunk_pos, x, y, z) = Chunk::split(pos);
        if state.is_air() && !self.chunks.contains_key(&chunk_pos) {
            return;
        }

        let previous = self.get_block(pos);
        self.chunks
            .entry(chunk_pos)
            .or_insert_with(|| Chunk::new(chunk_pos))
            .set(x, y, z, state);

        if previous.block_id != state.block_id {
            self.block_entities.remove(&pos);
            if let Some(entity) = BlockEntity::for_block(state.block_id) {
                self.block_entities.insert(pos, entity);
            }
        }
    }

    fn block_entity_mut(&mut self, pos: IVec3) -> Option<&mut BlockEntity> {
        self.block_entities.get_mut(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_blocks::BlockId;

    #[test]
    fn test_unloaded_is_air() {
        let world = VoxelWorld::default();
        assert!(world.is_air(IVec3::new(100, 64, -100)));
        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_set_block_outside_height_ignored() {
        let mut world = VoxelWorld::new(0, 64);
        world.set_block(IVec3::new(0, 64, 0), BlockState::new(BlockId::STONE));
        world.set_block(IVec3::new(0, -1, 0), BlockState::new(BlockId::STONE));
        assert_eq!(world.chunk_count(), 0);
        assert!(!world.is_height_valid(64));
        assert!(world.is_height_valid(63));
    }

    #[test]
    fn test_block_entity_lifecycle() {
        let mut world = VoxelWorld::default();
        let pos = IVec3::new(3, 10, 3);

        world.set_block(pos, BlockState::new(BlockId::SPAWNER));
        assert!(matches!(
            world.block_entity(pos),
            Some(BlockEntity::Spawner(_))
        ));

        world.set_block(pos, BlockState::new(BlockId::STONE));
        assert!(world.block_entity(pos).is_none());
    }

    #[test]
    fn test_replace_with_block_skips_air() {
        let mut world = VoxelWorld::default();
        let stone = IVec3::new(0, 5, 0);
        let air = IVec3::new(0, 6, 0);
        world.set_block(stone, BlockState::new(BlockId::STONE));

        assert!(world.replace_with_block(stone, BlockState::new(BlockId::SAND)));
        assert!(!world.replace_with_block(air, BlockState::new(BlockId::SAND)));
        assert_eq!(world.get_block(stone).block_id, BlockId::SAND);
        assert!(world.is_air(air));
    }

    #[test]
    fn test_surface_pos() {
        let mut world = VoxelWorld::default();
        world.fill(
            IVec3::new(0, 0, 0),
            IVec3::new(3, 40, 3),
            BlockState::new(BlockId::STONE),
        );
        assert_eq!(world.surface_pos(1, 1), IVec3::new(1, 41, 1));
        assert_eq!(world.surface_pos(10, 10), IVec3::new(10, 0, 10));
    }

    #[test]
    fn test_layer_percentages() {
        let mut world = VoxelWorld::default();
        world.fill(
            IVec3::new(0, 10, 0),
            IVec3::new(3, 10, 1),
            BlockState::new(BlockId::STONE),
        );

        // 4x4 layer with 8 of 16 solid
        let origin = IVec3::new(0, 10, 0);
        assert_eq!(world.solid_percentage(origin, 4, 4), 50.0);
        assert_eq!(world.air_percentage(origin, 4, 4), 50.0);
        assert!(world.is_solid_base(origin, 4, 4, 50.0));
        assert!(!world.is_solid_base(origin, 4, 4, 75.0));
        assert_eq!(world.solid_percentage(origin, 0, 4), 0.0);
    }

    #[test]
    fn test_count_blocks() {
        let mut world = VoxelWorld::default();
        world.fill(
            IVec3::new(0, 0, 0),
            IVec3::new(1, 1, 1),
            BlockState::new(BlockId::SAND),
        );
        assert_eq!(
            world.count_blocks(IVec3::ZERO, IVec3::new(5, 5, 5), BlockId::SAND),
            8
        );
    }
}
