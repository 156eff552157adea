//! World abstraction: accessor traits, random source and the reference voxel world

mod access;
mod chunk;
mod rng_trait;
mod terrain;
mod voxel_world;

pub use access::{WorldAccess, WorldMutAccess};
pub use chunk::{Chunk, CHUNK_SIZE};
pub use rng_trait::WorldRng;
pub use terrain::TerrainGenerator;
pub use voxel_world::{VoxelWorld, DEFAULT_MAX_HEIGHT, DEFAULT_MIN_HEIGHT};
