//! Block entities: per-block data for chests and spawners

use crate::BlockId;
use serde::{Deserialize, Serialize};

/// Built-in mob IDs used by spawners
pub struct MobId;

impl MobId {
    pub const ZOMBIE: &'static str = "zombie";
    pub const SKELETON: &'static str = "skeleton";
    pub const SPIDER: &'static str = "spider";
    pub const CAVE_SPIDER: &'static str = "cave_spider";
    pub const CREEPER: &'static str = "creeper";
    pub const HUSK: &'static str = "husk";
    pub const STRAY: &'static str = "stray";
    pub const PIG: &'static str = "pig";
    /// Rare elite mob that may replace a dungeon mob
    pub const VINDICATOR: &'static str = "vindicator";
}

/// Vanilla spawner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnerData {
    pub mob: String,
}

/// Spawner that releases a burst of mobs once a player comes within range
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProximitySpawnerData {
    pub mob: String,
    /// Minimum number of mobs per burst
    pub min_mobs: u32,
    /// Maximum number of mobs per burst
    pub max_mobs: u32,
    /// Trigger radius in blocks
    pub proximity: f64,
}

impl Default for ProximitySpawnerData {
    fn default() -> Self {
        Self {
            mob: MobId::ZOMBIE.to_string(),
            min_mobs: 1,
            max_mobs: 1,
            proximity: 8.0,
        }
    }
}

/// Data attached to a block that carries a block entity
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BlockEntity {
    /// Container; loot is filled by the host
    Chest,
    Spawner(SpawnerData),
    ProximitySpawner(ProximitySpawnerData),
}

impl BlockEntity {
    /// Fresh block entity for a newly placed block, if the block carries one
    pub fn for_block(block_id: u16) -> Option<Self> {
        match block_id {
            BlockId::CHEST | BlockId::ENDER_CHEST => Some(BlockEntity::Chest),
            BlockId::SPAWNER => Some(BlockEntity::Spawner(SpawnerData {
                mob: MobId::PIG.to_string(),
            })),
            BlockId::PROXIMITY_SPAWNER => {
                Some(BlockEntity::ProximitySpawner(ProximitySpawnerData::default()))
            }
            _ => None,
        }
    }

    pub fn as_spawner_mut(&mut self) -> Option<&mut SpawnerData> {
        match self {
            BlockEntity::Spawner(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_proximity_spawner_mut(&mut self) -> Option<&mut ProximitySpawnerData> {
        match self {
            BlockEntity::ProximitySpawner(data) => Some(data),
            _ => None,
        }
    }
}
