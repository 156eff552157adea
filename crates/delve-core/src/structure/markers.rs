//! Blueprint markers: placeholder blocks that become chests, spawners and anchors
//!
//! At load time every marker placeholder is recorded per kind. At stamp time
//! placeholders are restored to gameplay blocks, and `MarkerProcessor` turns
//! the recorded positions into world coordinates, picks the chest and
//! configures spawners.

use ahash::AHashMap;
use delve_blocks::{BlockEntity, BlockId, BlockState};
use glam::IVec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::{ProximityParams, SpawnerParams};
use crate::error::GenError;
use crate::mobs::MobSource;
use crate::world::{WorldMutAccess, WorldRng};

use super::template::PlacedTemplate;

/// Kinds of marker placeholder a blueprint can contain
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Chest,
    BossChest,
    Spawner,
    ProximitySpawner,
    Entrance,
    Offset,
    /// Cells that are never placed, keeping whatever the world has there
    Null,
}

impl MarkerKind {
    /// Kinds recorded by the load-time scan (the null marker is only honoured while stamping)
    pub const SCANNED: [MarkerKind; 6] = [
        MarkerKind::Chest,
        MarkerKind::BossChest,
        MarkerKind::Spawner,
        MarkerKind::Entrance,
        MarkerKind::Offset,
        MarkerKind::ProximitySpawner,
    ];

    /// Gameplay block a placeholder of this kind is stamped as (None = not placed)
    pub fn restore(self, placeholder: BlockState) -> Option<BlockState> {
        let block_id = match self {
            MarkerKind::Chest | MarkerKind::BossChest => BlockId::CHEST,
            MarkerKind::Spawner => BlockId::SPAWNER,
            MarkerKind::ProximitySpawner => BlockId::PROXIMITY_SPAWNER,
            MarkerKind::Entrance | MarkerKind::Offset => BlockId::AIR,
            MarkerKind::Null => return None,
        };
        Some(BlockState {
            block_id,
            facing: placeholder.facing,
        })
    }
}

/// Which placeholder block stands for which marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMap {
    entries: [(MarkerKind, u16); 7],
}

impl MarkerMap {
    /// Map for structures built in open air
    pub fn standard() -> Self {
        Self {
            entries: [
                (MarkerKind::Chest, BlockId::CHEST),
                (MarkerKind::BossChest, BlockId::ENDER_CHEST),
                (MarkerKind::Spawner, BlockId::SPAWNER),
                (MarkerKind::Entrance, BlockId::GOLD_BLOCK),
                (MarkerKind::Offset, BlockId::REDSTONE_BLOCK),
                (MarkerKind::ProximitySpawner, BlockId::IRON_BLOCK),
                (MarkerKind::Null, BlockId::BEDROCK),
            ],
        }
    }

    /// Map for submerged structures: air cells are skipped so water stays in place
    pub fn water() -> Self {
        let mut map = Self::standard();
        map.set(MarkerKind::Null, BlockId::AIR);
        map
    }

    pub fn set(&mut self, kind: MarkerKind, block_id: u16) {
        for entry in self.entries.iter_mut() {
            if entry.0 == kind {
                entry.1 = block_id;
            }
        }
    }

    pub fn placeholder(&self, kind: MarkerKind) -> u16 {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
            .unwrap_or(BlockId::AIR)
    }

    /// Block that marks "do not place"
    pub fn null_block(&self) -> u16 {
        self.placeholder(MarkerKind::Null)
    }

    /// Scanned marker kind represented by a block, if any
    pub fn kind_for(&self, block_id: u16) -> Option<MarkerKind> {
        MarkerKind::SCANNED
            .iter()
            .copied()
            .find(|kind| self.placeholder(*kind) == block_id)
    }
}

impl Default for MarkerMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Blocks substituted while a blueprint is loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementMap {
    replacements: Vec<(u16, u16)>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self {
            replacements: Vec::new(),
        }
    }

    pub fn with(mut self, from: u16, to: u16) -> Self {
        self.replacements.push((from, to));
        self
    }

    pub fn apply(&self, state: BlockState) -> BlockState {
        self.replacements
            .iter()
            .find(|(from, _)| *from == state.block_id)
            .map(|(_, to)| BlockState {
                block_id: *to,
                facing: state.facing,
            })
            .unwrap_or(state)
    }
}

impl Default for ReplacementMap {
    fn default() -> Self {
        Self::new()
            .with(BlockId::WHITE_WOOL, BlockId::AIR)
            .with(BlockId::BLACK_STAINED_GLASS, BlockId::SPAWNER)
    }
}

/// One marker found in a placed blueprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerHit {
    /// World position
    pub pos: IVec3,
    /// Placeholder state with its facing rotated into world space
    pub state: BlockState,
}

/// World positions of every scanned marker, grouped by kind
#[derive(Debug, Clone, Default)]
pub struct MarkerScan {
    hits: AHashMap<MarkerKind, SmallVec<[MarkerHit; 4]>>,
}

impl MarkerScan {
    /// Markers of one kind (empty when the blueprint has none)
    pub fn get(&self, kind: MarkerKind) -> &[MarkerHit] {
        self.hits.get(&kind).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn positions(&self, kind: MarkerKind) -> Vec<IVec3> {
        self.get(kind).iter().map(|hit| hit.pos).collect()
    }

    pub fn push(&mut self, kind: MarkerKind, hit: MarkerHit) {
        self.hits.entry(kind).or_default().push(hit);
    }

    pub fn total(&self) -> usize {
        self.hits.values().map(|v| v.len()).sum()
    }
}

/// Post-processing of stamped blueprints
pub struct MarkerProcessor;

impl MarkerProcessor {
    /// Collect world coordinates of every marker in a placed blueprint
    pub fn scan(placed: &PlacedTemplate<'_>) -> MarkerScan {
        let mut scan = MarkerScan::default();
        let turns = placed.placement.rotation.quarter_turns();
        for kind in MarkerKind::SCANNED {
            for marker in placed.template.markers(kind) {
                scan.push(
                    kind,
                    MarkerHit {
                        pos: placed.placement.to_world(marker.pos),
                        state: marker.state.rotated_cw(turns),
                    },
                );
            }
        }
        scan
    }

    /// Pick the structure's chest: a boss chest if any exist, else a regular chest
    pub fn select_chest(scan: &MarkerScan, rng: &mut dyn WorldRng) -> Option<MarkerHit> {
        for kind in [MarkerKind::BossChest, MarkerKind::Chest] {
            let hits = scan.get(kind);
            if !hits.is_empty() {
                return Some(hits[rng.gen_index(hits.len())]);
            }
        }
        None
    }

    /// Turn spawner markers into vanilla spawners with a random dungeon mob
    pub fn build_vanilla_spawners(
        world: &mut dyn WorldMutAccess,
        rng: &mut dyn WorldRng,
        mobs: &dyn MobSource,
        hits: &[MarkerHit],
        spawners: &SpawnerParams,
    ) -> Result<usize, GenError> {
        for hit in hits {
            world.set_block(hit.pos, BlockState::new(BlockId::SPAWNER));
            let mob = pick_mob(rng, mobs, spawners);

            let Some(data) = world
                .block_entity_mut(hit.pos)
                .and_then(BlockEntity::as_spawner_mut)
            else {
                world.set_block(hit.pos, BlockState::AIR);
                return Err(GenError::BlockEntityMissing(hit.pos));
            };
            if let Some(mob) = mob {
                log::debug!("Placed spawner for {} at {}", mob, hit.pos);
                data.mob = mob;
            }
        }
        Ok(hits.len())
    }

    /// Turn proximity markers into one-shot proximity spawners
    pub fn build_proximity_spawners(
        world: &mut dyn WorldMutAccess,
        rng: &mut dyn WorldRng,
        mobs: &dyn MobSource,
        hits: &[MarkerHit],
        params: &ProximityParams,
        spawners: &SpawnerParams,
    ) -> Result<usize, GenError> {
        for hit in hits {
            let mob = pick_mob(rng, mobs, spawners);
            place_proximity_spawner(world, hit.pos, mob, params)?;
        }
        Ok(hits.len())
    }
}

/// Place a single proximity spawner and configure it
///
/// A spawner whose block entity cannot be found is rolled back to air.
pub fn place_proximity_spawner(
    world: &mut dyn WorldMutAccess,
    pos: IVec3,
    mob: Option<String>,
    params: &ProximityParams,
) -> Result<(), GenError> {
    world.set_block(pos, BlockState::new(BlockId::PROXIMITY_SPAWNER));

    let Some(data) = world
        .block_entity_mut(pos)
        .and_then(BlockEntity::as_proximity_spawner_mut)
    else {
        world.set_block(pos, BlockState::AIR);
        return Err(GenError::BlockEntityMissing(pos));
    };

    if let Some(mob) = mob {
        data.mob = mob;
    }
    data.min_mobs = params.min_mobs;
    data.max_mobs = params.max_mobs;
    data.proximity = params.proximity;
    log::debug!("Placed proximity spawner for {} at {}", data.mob, pos);
    Ok(())
}

fn pick_mob(rng: &mut dyn WorldRng, mobs: &dyn MobSource, spawners: &SpawnerParams) -> Option<String> {
    let mob = mobs.random_dungeon_mob(rng);
    if rng.check_probability(spawners.elite_chance) {
        return Some(spawners.elite_mob.clone());
    }
    mob
}
