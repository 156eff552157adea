//! Block states: a block ID plus optional orientation

use crate::BlockId;
use serde::{Deserialize, Serialize};

/// Horizontal or vertical facing of a directional block
///
/// +X is east, +Z is south, +Y is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
    Up,
    Down,
}

impl Facing {
    /// Rotate clockwise (seen from above) by the given number of quarter turns
    ///
    /// Vertical facings are unaffected.
    pub fn rotated_cw(self, quarter_turns: u8) -> Self {
        let horizontal = match self {
            Facing::North => 0,
            Facing::East => 1,
            Facing::South => 2,
            Facing::West => 3,
            other => return other,
        };
        match (horizontal + quarter_turns) % 4 {
            0 => Facing::North,
            1 => Facing::East,
            2 => Facing::South,
            _ => Facing::West,
        }
    }

    /// Unit offset (x, y, z) this facing points at
    pub fn offset(self) -> (i32, i32, i32) {
        match self {
            Facing::North => (0, 0, -1),
            Facing::East => (1, 0, 0),
            Facing::South => (0, 0, 1),
            Facing::West => (-1, 0, 0),
            Facing::Up => (0, 1, 0),
            Facing::Down => (0, -1, 0),
        }
    }
}

/// A block as stored in the world or a blueprint
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    pub block_id: u16,
    #[serde(default)]
    pub facing: Option<Facing>,
}

impl BlockState {
    pub const AIR: BlockState = BlockState {
        block_id: BlockId::AIR,
        facing: None,
    };

    pub fn new(block_id: u16) -> Self {
        Self {
            block_id,
            facing: None,
        }
    }

    pub fn with_facing(block_id: u16, facing: Facing) -> Self {
        Self {
            block_id,
            facing: Some(facing),
        }
    }

    pub fn is_air(&self) -> bool {
        self.block_id == BlockId::AIR
    }

    /// Same block with its facing rotated clockwise by `quarter_turns`
    pub fn rotated_cw(self, quarter_turns: u8) -> Self {
        Self {
            block_id: self.block_id,
            facing: self.facing.map(|f| f.rotated_cw(quarter_turns)),
        }
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::AIR
    }
}

impl From<u16> for BlockState {
    fn from(block_id: u16) -> Self {
        Self::new(block_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_full_turn_is_identity() {
        for facing in [Facing::North, Facing::East, Facing::South, Facing::West] {
            assert_eq!(facing.rotated_cw(4), facing);
            assert_eq!(facing.rotated_cw(1).rotated_cw(3), facing);
        }
    }

    #[test]
    fn test_facing_clockwise_order() {
        assert_eq!(Facing::North.rotated_cw(1), Facing::East);
        assert_eq!(Facing::East.rotated_cw(1), Facing::South);
        assert_eq!(Facing::West.rotated_cw(2), Facing::East);
        assert_eq!(Facing::Up.rotated_cw(1), Facing::Up);
    }

    #[test]
    fn test_block_state_rotation_keeps_block() {
        let chest = BlockState::with_facing(BlockId::CHEST, Facing::South);
        let rotated = chest.rotated_cw(3);
        assert_eq!(rotated.block_id, BlockId::CHEST);
        assert_eq!(rotated.facing, Some(Facing::East));

        let stone = BlockState::new(BlockId::STONE).rotated_cw(1);
        assert_eq!(stone.facing, None);
    }

    #[test]
    fn test_block_state_serialization() {
        let state = BlockState::with_facing(BlockId::CHEST, Facing::West);
        let serialized = ron::to_string(&state).expect("Failed to serialize");
        let deserialized: BlockState = ron::from_str(&serialized).expect("Failed to deserialize");
        assert_eq!(state, deserialized);

        // Facing may be omitted
        let plain: BlockState = ron::from_str("(block_id: 1)").expect("Failed to deserialize");
        assert_eq!(plain, BlockState::new(BlockId::STONE));
    }
}
