//! Orthogonal rotations about the vertical axis

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::world::WorldRng;

/// Quarter-turn rotation, clockwise when seen from above (+X east, +Z south)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    CounterClockwise90,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::None,
        Rotation::Clockwise90,
        Rotation::Clockwise180,
        Rotation::CounterClockwise90,
    ];

    /// Number of clockwise quarter turns (0-3)
    pub fn quarter_turns(self) -> u8 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 1,
            Rotation::Clockwise180 => 2,
            Rotation::CounterClockwise90 => 3,
        }
    }

    pub fn from_quarter_turns(turns: i32) -> Self {
        Self::ALL[turns.rem_euclid(4) as usize]
    }

    /// Apply `self`, then `other`
    pub fn compose(self, other: Rotation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() as i32 + other.quarter_turns() as i32)
    }

    pub fn inverse(self) -> Self {
        Self::from_quarter_turns(-(self.quarter_turns() as i32))
    }

    pub fn random(rng: &mut dyn WorldRng) -> Self {
        Self::ALL[rng.gen_index(Self::ALL.len())]
    }

    /// Rotate a template-relative position about the origin column
    pub fn apply(self, pos: IVec3) -> IVec3 {
        match self {
            Rotation::None => pos,
            Rotation::Clockwise90 => IVec3::new(-pos.z, pos.y, pos.x),
            Rotation::Clockwise180 => IVec3::new(-pos.x, pos.y, -pos.z),
            Rotation::CounterClockwise90 => IVec3::new(pos.z, pos.y, -pos.x),
        }
    }

    /// Bounding size after rotation (width and length swap on quarter turns)
    pub fn rotate_size(self, size: IVec3) -> IVec3 {
        match self {
            Rotation::Clockwise90 | Rotation::CounterClockwise90 => {
                IVec3::new(size.z, size.y, size.x)
            }
            _ => size,
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Rotation::None => "none",
            Rotation::Clockwise90 => "cw90",
            Rotation::Clockwise180 => "cw180",
            Rotation::CounterClockwise90 => "ccw90",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_blocks::Facing;

    #[test]
    fn test_compose_is_modular_addition() {
        assert_eq!(
            Rotation::Clockwise90.compose(Rotation::Clockwise90),
            Rotation::Clockwise180
        );
        assert_eq!(
            Rotation::CounterClockwise90.compose(Rotation::Clockwise180),
            Rotation::Clockwise90
        );
        for rotation in Rotation::ALL {
            assert_eq!(rotation.compose(rotation.inverse()), Rotation::None);
        }
    }

    #[test]
    fn test_apply_matches_compose() {
        let pos = IVec3::new(3, 7, -2);
        for a in Rotation::ALL {
            for b in Rotation::ALL {
                assert_eq!(b.apply(a.apply(pos)), a.compose(b).apply(pos));
            }
        }
    }

    #[test]
    fn test_apply_inverse_round_trip() {
        let pos = IVec3::new(5, 1, 9);
        for rotation in Rotation::ALL {
            assert_eq!(rotation.inverse().apply(rotation.apply(pos)), pos);
        }
    }

    #[test]
    fn test_apply_agrees_with_facing_rotation() {
        for rotation in Rotation::ALL {
            for facing in [Facing::North, Facing::East, Facing::South, Facing::West] {
                let (x, y, z) = facing.offset();
                let rotated = rotation.apply(IVec3::new(x, y, z));
                let (fx, fy, fz) = facing.rotated_cw(rotation.quarter_turns()).offset();
                assert_eq!(rotated, IVec3::new(fx, fy, fz));
            }
        }
    }

    #[test]
    fn test_rotate_size() {
        let size = IVec3::new(4, 3, 7);
        assert_eq!(Rotation::None.rotate_size(size), size);
        assert_eq!(Rotation::Clockwise180.rotate_size(size), size);
        assert_eq!(Rotation::Clockwise90.rotate_size(size), IVec3::new(7, 3, 4));
        assert_eq!(
            Rotation::CounterClockwise90.rotate_size(size),
            IVec3::new(7, 3, 4)
        );
    }
}
