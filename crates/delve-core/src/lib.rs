//! Delve core: procedural pit and structure generation
//!
//! - `pit`: vertical shafts between a buried chest and the surface
//! - `structure`: template registry, placement math, stamping and markers
//! - `palette`: weighted random block selection
//! - `world`: accessor traits, random source and an in-memory reference world

pub mod config;
pub mod error;
pub mod generator;
pub mod mobs;
pub mod palette;
pub mod pit;
pub mod structure;
pub mod world;

pub use config::GenConfig;
pub use error::{GenError, RegistryError};
pub use generator::{ChestGeneratorData, GenContext, TemplateGeneratorData};
pub use mobs::{DungeonMobs, MobSource};
pub use palette::WeightedPalette;
pub use pit::{PitGenerator, PitVariant};
pub use structure::{StructureGenerator, StructureSite, TemplateRegistry};
pub use world::{VoxelWorld, WorldAccess, WorldMutAccess, WorldRng};
