//! Generation parameters
//!
//! Everything here deserializes from RON with `#[serde(default)]` on every
//! section, so a config file only needs the values it changes:
//!
//! ```ron
//! (
//!     pit: (min_surface_to_spawn_distance: 12),
//!     spawners: (elite_chance: 0.1),
//! )
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use delve_blocks::MobId;
use serde::{Deserialize, Serialize};

use crate::structure::{StructMeta, StructureCategory, StructureType};

/// Complete generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenConfig {
    #[serde(default)]
    pub terrain: TerrainParams,

    #[serde(default)]
    pub pit: PitParams,

    #[serde(default)]
    pub structures: StructureParams,

    #[serde(default)]
    pub spawners: SpawnerParams,

    /// Per-template metadata (offsets, biome lists, depth range)
    #[serde(default)]
    pub metas: Vec<StructMeta>,
}

impl GenConfig {
    pub fn from_ron_str(source: &str) -> Result<Self> {
        ron::from_str(source).context("Failed to parse generation config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_ron_str(&source).with_context(|| format!("Invalid config {}", path.display()))
    }
}

/// Noise terrain for the reference world
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Average surface height
    pub base_height: i32,
    /// Maximum deviation from `base_height`
    pub amplitude: f32,
    pub frequency: f32,
    /// Dirt blocks between grass and stone
    pub dirt_depth: i32,
    /// Carve noise caves below the dirt layer
    pub caves: bool,
    /// Noise value above which a cell becomes cave air
    pub cave_threshold: f32,
    pub cave_frequency: f32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_height: 64,
            amplitude: 12.0,
            frequency: 0.01,
            dirt_depth: 3,
            caves: true,
            cave_threshold: 0.6,
            cave_frequency: 0.04,
        }
    }
}

/// Pit shaft construction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PitParams {
    /// Levels above the spawn reserved for the base layers
    pub offset_y: i32,
    /// Levels below the surface reserved for the entrance dressing
    pub surface_offset_y: i32,
    /// Minimum surface-to-spawn distance for the standard variants
    pub min_surface_to_spawn_distance: i32,
    /// How far to search upwards for a cavern ceiling
    pub cavern_search_limit: i32,
    /// Minimum blocks between the TNT trap and the surface
    pub tnt_min_clearance: i32,
    pub volcano: VolcanoParams,
    pub mob_trap: MobTrapParams,
}

impl Default for PitParams {
    fn default() -> Self {
        Self {
            offset_y: 4,
            surface_offset_y: 6,
            min_surface_to_spawn_distance: 10,
            cavern_search_limit: 50,
            tnt_min_clearance: 4,
            volcano: VolcanoParams::default(),
            mob_trap: MobTrapParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolcanoParams {
    pub min_radius: i32,
    pub max_radius: i32,
    pub min_distance: i32,
    /// Chance that a chamber wall block turns into blackstone
    pub blackstone_chance: f32,
    /// Chance that a non-blackstone wall block turns into lava
    pub lava_chance: f32,
}

impl Default for VolcanoParams {
    fn default() -> Self {
        Self {
            min_radius: 4,
            max_radius: 8,
            min_distance: 15,
            blackstone_chance: 0.3,
            lava_chance: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MobTrapParams {
    pub min_mobs: u32,
    pub max_mobs: u32,
    /// Trigger radius of the spawner west of the chest
    pub west_proximity: f64,
    /// Trigger radius of the spawner east of the chest
    pub east_proximity: f64,
}

impl Default for MobTrapParams {
    fn default() -> Self {
        Self {
            min_mobs: 2,
            max_mobs: 4,
            west_proximity: 5.0,
            east_proximity: 5.5,
        }
    }
}

/// Vanilla spawner mob settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerParams {
    /// Chance that a spawner gets the elite mob instead of a dungeon mob
    pub elite_chance: f32,
    pub elite_mob: String,
}

impl Default for SpawnerParams {
    fn default() -> Self {
        Self {
            elite_chance: 0.2,
            elite_mob: MobId::VINDICATOR.to_string(),
        }
    }
}

/// Proximity spawner settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityParams {
    pub min_mobs: u32,
    pub max_mobs: u32,
    /// Trigger radius in blocks
    pub proximity: f64,
}

impl Default for ProximityParams {
    fn default() -> Self {
        Self {
            min_mobs: 1,
            max_mobs: 2,
            proximity: 5.0,
        }
    }
}

/// Settings for one structure site
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteParams {
    pub category: StructureCategory,
    pub kind: StructureType,
    /// Percentage of solid blocks required beneath the footprint
    pub required_base: f32,
    /// Percentage of air required at the footprint's ground layer (None = unchecked)
    pub required_air: Option<f32>,
    /// Placement attempts; each retry lowers the structure by one block
    pub base_attempts: u32,
    pub random_rotation: bool,
    /// Fail when the placed structure has no chest marker
    pub chest_required: bool,
    pub proximity: ProximityParams,
    /// Fill air gaps beneath the footprint with dirt
    pub fill_below: bool,
    /// Use the water marker map (air cells are not placed)
    pub submerged: bool,
}

impl SiteParams {
    pub fn surface_ruin() -> Self {
        Self {
            category: StructureCategory::Terranean,
            kind: StructureType::Ruin,
            required_base: 75.0,
            required_air: Some(50.0),
            base_attempts: 3,
            random_rotation: false,
            chest_required: true,
            proximity: ProximityParams {
                min_mobs: 1,
                max_mobs: 2,
                proximity: 5.0,
            },
            fill_below: true,
            submerged: false,
        }
    }

    pub fn surface_marker() -> Self {
        Self {
            category: StructureCategory::Terranean,
            kind: StructureType::Marker,
            required_base: 70.0,
            required_air: None,
            base_attempts: 1,
            random_rotation: true,
            chest_required: false,
            proximity: ProximityParams {
                min_mobs: 1,
                max_mobs: 2,
                proximity: 10.0,
            },
            fill_below: false,
            submerged: false,
        }
    }
}

impl Default for SiteParams {
    fn default() -> Self {
        Self::surface_ruin()
    }
}

/// Per-site structure settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureParams {
    pub ruin: SiteParams,
    pub marker: SiteParams,
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            ruin: SiteParams::surface_ruin(),
            marker: SiteParams::surface_marker(),
        }
    }
}
