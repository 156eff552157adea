//! Block data for Delve
//!
//! This crate provides the foundational data types shared by the generators:
//! - Block definitions (BlockId, BlockDef, Blocks)
//! - Block kinds and flags (BlockKind, BlockFlags)
//! - Block states with orientation (BlockState, Facing)
//! - Block entities for chests and spawners (BlockEntity, MobId)

mod block_entity;
mod block_state;
mod blocks;

pub use block_entity::{BlockEntity, MobId, ProximitySpawnerData, SpawnerData};
pub use block_state::{BlockState, Facing};
pub use blocks::{BlockDef, BlockFlags, BlockId, BlockKind, Blocks};
