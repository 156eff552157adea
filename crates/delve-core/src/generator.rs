//! Shared generator context and result payloads

use delve_blocks::BlockState;
use glam::IVec3;

use crate::mobs::MobSource;
use crate::structure::{MarkerHit, MarkerScan, Rotation};
use crate::world::{WorldMutAccess, WorldRng};

/// Everything a generator needs from its host for one call
pub struct GenContext<'a> {
    pub world: &'a mut dyn WorldMutAccess,
    pub rng: &'a mut dyn WorldRng,
    pub mobs: &'a dyn MobSource,
}

impl<'a> GenContext<'a> {
    pub fn new(world: &'a mut dyn WorldMutAccess, rng: &'a mut dyn WorldRng, mobs: &'a dyn MobSource) -> Self {
        Self { world, rng, mobs }
    }
}

/// Result of a pit generator: where the chest goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChestGeneratorData {
    /// Spawn position after cavern relocation
    pub spawn_coords: IVec3,
    pub chest_coords: IVec3,
    /// Chest block to place, if the generator chose one
    pub chest_state: Option<BlockState>,
}

impl ChestGeneratorData {
    pub fn at(spawn: IVec3) -> Self {
        Self {
            spawn_coords: spawn,
            chest_coords: spawn,
            chest_state: None,
        }
    }
}

/// Result of a structure generator
#[derive(Debug, Clone)]
pub struct TemplateGeneratorData {
    /// Identity of the stamped template
    pub identity: String,
    /// World position the entrance opening was aligned to
    pub spawn_coords: IVec3,
    pub footprint_origin: IVec3,
    pub rotation: Rotation,
    pub rotated_size: IVec3,
    /// Selected chest marker (boss chests win over regular chests)
    pub chest: Option<MarkerHit>,
    pub markers: MarkerScan,
}

impl TemplateGeneratorData {
    pub fn chest_coords(&self) -> Option<IVec3> {
        self.chest.map(|hit| hit.pos)
    }

    pub fn chest_state(&self) -> Option<BlockState> {
        self.chest.map(|hit| hit.state)
    }
}
