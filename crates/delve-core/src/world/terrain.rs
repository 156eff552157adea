//! Noise terrain for the reference world
//!
//! Produces a bedrock floor, stone body, a dirt band and a grass top, with
//! optional noise caves under the dirt. Good enough to exercise the pit and
//! structure generators on uneven ground.

use delve_blocks::{BlockId, BlockState};
use fastnoise_lite::{FastNoiseLite, NoiseType};

use glam::IVec3;

use crate::config::TerrainParams;

use super::access::WorldMutAccess;

pub struct TerrainGenerator {
    params: TerrainParams,
    height_noise: FastNoiseLite,
    cave_noise: FastNoiseLite,
}

impl TerrainGenerator {
    pub fn new(seed: u64, params: &TerrainParams) -> Self {
        let mut height_noise = FastNoiseLite::with_seed(seed as i32);
        height_noise.set_noise_type(Some(NoiseType::OpenSimplex2));

        let mut cave_noise = FastNoiseLite::with_seed((seed as i32).wrapping_add(1));
        cave_noise.set_noise_type(Some(NoiseType::OpenSimplex2));

        Self {
            params: params.clone(),
            height_noise,
            cave_noise,
        }
    }

    /// Y of the topmost (grass) block of a column
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let f = self.params.frequency;
        let n = self.height_noise.get_noise_2d(x as f32 * f, z as f32 * f);
        self.params.base_height + (n * self.params.amplitude).round() as i32
    }

    fn is_cave(&self, pos: IVec3) -> bool {
        let f = self.params.cave_frequency;
        let n = self
            .cave_noise
            .get_noise_3d(pos.x as f32 * f, pos.y as f32 * f, pos.z as f32 * f);
        n > self.params.cave_threshold
    }

    /// Fill the columns in the inclusive rectangle `min..=max` (x, z)
    pub fn fill(&self, world: &mut dyn WorldMutAccess, min_x: i32, min_z: i32, max_x: i32, max_z: i32) {
        let floor = world.min_height();
        let ceiling = world.max_height() - 1;

        for x in min_x..=max_x {
            for z in min_z..=max_z {
                let top = self.height_at(x, z).clamp(floor + 1, ceiling);
                let dirt_from = top - self.params.dirt_depth;

                for y in floor..=top {
                    let pos = IVec3::new(x, y, z);
                    let block = if y == floor {
                        BlockId::BEDROCK
                    } else if y == top {
                        BlockId::GRASS_BLOCK
                    } else if y >= dirt_from {
                        BlockId::DIRT
                    } else if self.params.caves && y > floor + 4 && self.is_cave(pos) {
                        continue;
                    } else {
                        BlockId::STONE
                    };
                    world.set_block(pos, BlockState::new(block));
                }
            }
        }

        log::debug!(
            "Filled terrain ({}, {})..=({}, {})",
            min_x,
            min_z,
            max_x,
            max_z
        );
    }
}
