//! Chunk - 16x16x16 cube of block states

use delve_blocks::BlockState;
use glam::IVec3;
use serde::{Deserialize, Serialize};

pub const CHUNK_SIZE: usize = 16;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// A 16x16x16 region of the world
#[derive(Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk coordinates (in chunk space, not block space)
    pub pos: IVec3,

    /// Block data, index = (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
    blocks: Vec<BlockState>,

    /// Number of non-air blocks
    solid_count: usize,
}

impl Chunk {
    pub fn new(pos: IVec3) -> Self {
        Self {
            pos,
            blocks: vec![BlockState::AIR; CHUNK_VOLUME],
            solid_count: 0,
        }
    }

    fn index(x: usize, y: usize, z: usize) -> usize {
        (y * CHUNK_SIZE + z) * CHUNK_SIZE + x
    }

    /// Get block at chunk-local coordinates
    pub fn get(&self, x: usize, y: usize, z: usize) -> BlockState {
        self.blocks[Self::index(x, y, z)]
    }

    /// Set block at chunk-local coordinates
    pub fn set(&mut self, x: usize, y: usize, z: usize, state: BlockState) {
        let idx = Self::index(x, y, z);
        let was_air = self.blocks[idx].is_air();
        match (was_air, state.is_air()) {
            (true, false) => self.solid_count += 1,
            (false, true) => self.solid_count -= 1,
            _ => {}
        }
        self.blocks[idx] = state;
    }

    /// True if every block in the chunk is air
    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    /// Split a world position into (chunk position, local x, y, z)
    pub fn split(world: IVec3) -> (IVec3, usize, usize, usize) {
        let size = CHUNK_SIZE as i32;
        let chunk = IVec3::new(
            world.x.div_euclid(size),
            world.y.div_euclid(size),
            world.z.div_euclid(size),
        );
        (
            chunk,
            world.x.rem_euclid(size) as usize,
            world.y.rem_euclid(size) as usize,
            world.z.rem_euclid(size) as usize,
        )
    }
}
