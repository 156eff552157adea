//! Block definitions and registry

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Built-in block IDs
pub struct BlockId;

impl BlockId {
    // Terrain
    pub const AIR: u16 = 0;
    pub const STONE: u16 = 1;
    pub const DIRT: u16 = 2;
    pub const GRASS_BLOCK: u16 = 3;
    pub const SAND: u16 = 4;
    pub const GRAVEL: u16 = 5;
    pub const COBBLESTONE: u16 = 6;
    pub const BEDROCK: u16 = 7;
    pub const OBSIDIAN: u16 = 8;
    pub const BLACKSTONE: u16 = 9;

    // Liquids
    pub const WATER: u16 = 10;
    pub const LAVA: u16 = 11;

    // Building blocks
    pub const OAK_LOG: u16 = 12;
    pub const OAK_PLANKS: u16 = 13;
    pub const OAK_LEAVES: u16 = 14;
    pub const MOSSY_COBBLESTONE: u16 = 15;
    pub const STONE_BRICKS: u16 = 16;
    pub const CRACKED_STONE_BRICKS: u16 = 17;

    // Traps
    pub const TNT: u16 = 18;
    pub const OAK_PRESSURE_PLATE: u16 = 19;

    // Containers and spawners
    pub const CHEST: u16 = 20;
    pub const ENDER_CHEST: u16 = 21;
    pub const SPAWNER: u16 = 22;
    pub const PROXIMITY_SPAWNER: u16 = 23;

    // Blueprint marker placeholders
    pub const GOLD_BLOCK: u16 = 24;
    pub const REDSTONE_BLOCK: u16 = 25;
    pub const IRON_BLOCK: u16 = 26;
    pub const WHITE_WOOL: u16 = 27;
    pub const BLACK_STAINED_GLASS: u16 = 28;
}

/// How a block behaves physically
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// Full cube that supports other blocks
    Solid,
    /// Falls when unsupported (sand, gravel)
    Powder,
    /// Flows (water, lava)
    Liquid,
    /// Empty space
    Gas,
    /// Thin fixture that does not fill its cell (pressure plates)
    Fixture,
}

bitflags! {
    /// Per-block generation properties
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BlockFlags: u16 {
        /// Counts towards solid-ground checks
        const SOLID = 1 << 0;
        /// May be overwritten by generated layers without a check
        const REPLACEABLE = 1 << 1;
        /// Carries a block entity (chest contents, spawner data)
        const BLOCK_ENTITY = 1 << 2;
        /// Log blocks are placed as 2x2 rings in pit shafts
        const LOG = 1 << 3;
        /// Used as a blueprint marker placeholder
        const MARKER = 1 << 4;
        /// Rotates its facing with the structure
        const DIRECTIONAL = 1 << 5;
    }
}

/// Definition of a block's properties
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockDef {
    pub id: u16,
    pub name: String,
    pub kind: BlockKind,
    pub flags: BlockFlags,

    /// Character used in blueprint layers and cross-section dumps
    pub glyph: char,
}

impl Default for BlockDef {
    fn default() -> Self {
        Self {
            id: 0,
            name: "unknown".to_string(),
            kind: BlockKind::Solid,
            flags: BlockFlags::SOLID,
            glyph: '?',
        }
    }
}

/// Registry of all blocks
pub struct Blocks {
    blocks: Vec<BlockDef>,
}

impl Blocks {
    pub fn new() -> Self {
        let mut blocks = Self { blocks: Vec::new() };
        blocks.register_defaults();
        blocks
    }

    fn register_defaults(&mut self) {
        let solid = BlockFlags::SOLID;

        self.register(BlockDef {
            id: BlockId::AIR,
            name: "air".to_string(),
            kind: BlockKind::Gas,
            flags: BlockFlags::REPLACEABLE,
            glyph: ' ',
        });

        // TERRAIN
        self.simple(BlockId::STONE, "stone", '#');
        self.simple(BlockId::DIRT, "dirt", 'd');
        self.simple(BlockId::GRASS_BLOCK, "grass_block", '"');
        self.register(BlockDef {
            id: BlockId::SAND,
            name: "sand".to_string(),
            kind: BlockKind::Powder,
            flags: solid,
            glyph: '.',
        });
        self.register(BlockDef {
            id: BlockId::GRAVEL,
            name: "gravel".to_string(),
            kind: BlockKind::Powder,
            flags: solid,
            glyph: ':',
        });
        self.simple(BlockId::COBBLESTONE, "cobblestone", 'c');
        self.simple(BlockId::BEDROCK, "bedrock", 'B');
        self.simple(BlockId::OBSIDIAN, "obsidian", 'o');
        self.simple(BlockId::BLACKSTONE, "blackstone", 'b');

        // LIQUIDS
        self.register(BlockDef {
            id: BlockId::WATER,
            name: "water".to_string(),
            kind: BlockKind::Liquid,
            flags: BlockFlags::REPLACEABLE,
            glyph: 'w',
        });
        self.register(BlockDef {
            id: BlockId::LAVA,
            name: "lava".to_string(),
            kind: BlockKind::Liquid,
            flags: BlockFlags::REPLACEABLE,
            glyph: '~',
        });

        // BUILDING BLOCKS
        self.register(BlockDef {
            id: BlockId::OAK_LOG,
            name: "oak_log".to_string(),
            kind: BlockKind::Solid,
            flags: solid | BlockFlags::LOG,
            glyph: 'L',
        });
        self.simple(BlockId::OAK_PLANKS, "oak_planks", '=');
        self.simple(BlockId::OAK_LEAVES, "oak_leaves", '*');
        self.simple(BlockId::MOSSY_COBBLESTONE, "mossy_cobblestone", 'm');
        self.simple(BlockId::STONE_BRICKS, "stone_bricks", 'k');
        self.simple(BlockId::CRACKED_STONE_BRICKS, "cracked_stone_bricks", 'K');

        // TRAPS
        self.simple(BlockId::TNT, "tnt", 'T');
        self.register(BlockDef {
            id: BlockId::OAK_PRESSURE_PLATE,
            name: "oak_pressure_plate".to_string(),
            kind: BlockKind::Fixture,
            flags: BlockFlags::empty(),
            glyph: '_',
        });

        // CONTAINERS AND SPAWNERS
        self.register(BlockDef {
            id: BlockId::CHEST,
            name: "chest".to_string(),
            kind: BlockKind::Solid,
            flags: solid | BlockFlags::BLOCK_ENTITY | BlockFlags::DIRECTIONAL,
            glyph: 'C',
        });
        self.register(BlockDef {
            id: BlockId::ENDER_CHEST,
            name: "ender_chest".to_string(),
            kind: BlockKind::Solid,
            flags: solid | BlockFlags::BLOCK_ENTITY | BlockFlags::DIRECTIONAL,
            glyph: 'E',
        });
        self.register(BlockDef {
            id: BlockId::SPAWNER,
            name: "spawner".to_string(),
            kind: BlockKind::Solid,
            flags: solid | BlockFlags::BLOCK_ENTITY,
            glyph: 'S',
        });
        self.register(BlockDef {
            id: BlockId::PROXIMITY_SPAWNER,
            name: "proximity_spawner".to_string(),
            kind: BlockKind::Solid,
            flags: solid | BlockFlags::BLOCK_ENTITY,
            glyph: 'P',
        });

        // MARKER PLACEHOLDERS
        for (id, name, glyph) in [
            (BlockId::GOLD_BLOCK, "gold_block", 'G'),
            (BlockId::REDSTONE_BLOCK, "redstone_block", 'R'),
            (BlockId::IRON_BLOCK, "iron_block", 'I'),
            (BlockId::WHITE_WOOL, "white_wool", 'W'),
            (BlockId::BLACK_STAINED_GLASS, "black_stained_glass", 'g'),
        ] {
            self.register(BlockDef {
                id,
                name: name.to_string(),
                kind: BlockKind::Solid,
                flags: solid | BlockFlags::MARKER,
                glyph,
            });
        }
    }

    fn simple(&mut self, id: u16, name: &str, glyph: char) {
        self.register(BlockDef {
            id,
            name: name.to_string(),
            glyph,
            ..Default::default()
        });
    }

    fn register(&mut self, block: BlockDef) {
        let id = block.id as usize;

        if self.blocks.len() <= id {
            self.blocks.resize(id + 1, BlockDef::default());
        }

        self.blocks[id] = block;
    }

    /// Get block definition by ID (unknown IDs resolve to air)
    pub fn get(&self, id: u16) -> &BlockDef {
        self.blocks
            .get(id as usize)
            .unwrap_or(&self.blocks[0])
    }

    /// Look up a block ID by its registry name
    pub fn by_name(&self, name: &str) -> Option<u16> {
        self.blocks.iter().find(|b| b.name == name).map(|b| b.id)
    }

    pub fn name(&self, id: u16) -> &str {
        &self.get(id).name
    }

    pub fn glyph(&self, id: u16) -> char {
        self.get(id).glyph
    }

    pub fn is_solid(&self, id: u16) -> bool {
        self.get(id).flags.contains(BlockFlags::SOLID)
    }

    pub fn is_replaceable(&self, id: u16) -> bool {
        self.get(id).flags.contains(BlockFlags::REPLACEABLE)
    }

    pub fn has_block_entity(&self, id: u16) -> bool {
        self.get(id).flags.contains(BlockFlags::BLOCK_ENTITY)
    }

    pub fn is_log(&self, id: u16) -> bool {
        self.get(id).flags.contains(BlockFlags::LOG)
    }

    pub fn is_directional(&self, id: u16) -> bool {
        self.get(id).flags.contains(BlockFlags::DIRECTIONAL)
    }

    /// Number of registered block IDs
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Default for Blocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_registered() {
        let blocks = Blocks::new();
        for id in 0..=BlockId::BLACK_STAINED_GLASS {
            assert_eq!(blocks.get(id).id, id, "block {} missing", id);
            assert_ne!(blocks.get(id).name, "unknown");
        }
    }

    #[test]
    fn test_by_name_round_trip() {
        let blocks = Blocks::new();
        assert_eq!(blocks.by_name("oak_log"), Some(BlockId::OAK_LOG));
        assert_eq!(blocks.by_name("ender_chest"), Some(BlockId::ENDER_CHEST));
        assert_eq!(blocks.by_name("no_such_block"), None);
    }

    #[test]
    fn test_flags() {
        let blocks = Blocks::new();

        assert!(!blocks.is_solid(BlockId::AIR));
        assert!(blocks.is_solid(BlockId::STONE));
        assert!(blocks.is_solid(BlockId::SAND));
        assert!(!blocks.is_solid(BlockId::LAVA));
        assert!(!blocks.is_solid(BlockId::OAK_PRESSURE_PLATE));

        assert!(blocks.is_log(BlockId::OAK_LOG));
        assert!(!blocks.is_log(BlockId::OAK_PLANKS));

        assert!(blocks.has_block_entity(BlockId::CHEST));
        assert!(blocks.has_block_entity(BlockId::PROXIMITY_SPAWNER));
        assert!(!blocks.has_block_entity(BlockId::TNT));
    }

    #[test]
    fn test_unknown_id_falls_back_to_air() {
        let blocks = Blocks::new();
        assert_eq!(blocks.get(9999).id, BlockId::AIR);
    }

    #[test]
    fn test_glyphs_unique() {
        let blocks = Blocks::new();
        let mut seen = std::collections::HashSet::new();
        for id in 0..blocks.len() as u16 {
            assert!(seen.insert(blocks.glyph(id)), "duplicate glyph for {}", id);
        }
    }
}
