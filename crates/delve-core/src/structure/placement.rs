//! Placement resolution: where a rotated blueprint lands in the world
//!
//! Terms used throughout:
//! - **anchor**: world position of the blueprint's local origin after rotation
//! - **footprint origin**: minimum (x, z) corner of the rotated bounding box
//! - **entrance**: local position of the 2x2 entrance opening's minimum corner
//!
//! Entrance alignment puts the minimum corner of the rotated 2x2 opening on the
//! target, so a pit shaft built at the target lines up with the opening.

use glam::IVec3;

use super::rotation::Rotation;

/// Swap width and length for quarter turns
pub fn rotate_footprint(size: IVec3, rotation: Rotation) -> IVec3 {
    rotation.rotate_size(size)
}

/// Correction that moves the rotated opening's minimum corner onto the rotated entrance cell
fn entrance_correction(rotation: Rotation) -> IVec3 {
    match rotation {
        Rotation::None => IVec3::ZERO,
        Rotation::Clockwise90 => IVec3::new(1, 0, 0),
        Rotation::Clockwise180 => IVec3::new(1, 0, 1),
        Rotation::CounterClockwise90 => IVec3::new(0, 0, 1),
    }
}

/// Anchor that places the (already rotated) entrance offset on `target`
///
/// Only x and z are adjusted; the anchor keeps the target's y.
pub fn align_entrance_to_target(target: IVec3, rotated_entrance: IVec3, rotation: Rotation) -> IVec3 {
    target - IVec3::new(rotated_entrance.x, 0, rotated_entrance.z) + entrance_correction(rotation)
}

/// Inverse of [`align_entrance_to_target`]
pub fn target_from_anchor(anchor: IVec3, rotated_entrance: IVec3, rotation: Rotation) -> IVec3 {
    anchor + IVec3::new(rotated_entrance.x, 0, rotated_entrance.z) - entrance_correction(rotation)
}

fn footprint_shift(rotated_size: IVec3, rotation: Rotation) -> IVec3 {
    match rotation {
        Rotation::None => IVec3::ZERO,
        Rotation::Clockwise90 => IVec3::new(-(rotated_size.x - 1), 0, 0),
        Rotation::Clockwise180 => IVec3::new(-(rotated_size.x - 1), 0, -(rotated_size.z - 1)),
        Rotation::CounterClockwise90 => IVec3::new(0, 0, -(rotated_size.z - 1)),
    }
}

/// Minimum corner of the rotated footprint for a given anchor
pub fn standardize_footprint_origin(anchor: IVec3, rotated_size: IVec3, rotation: Rotation) -> IVec3 {
    anchor + footprint_shift(rotated_size, rotation)
}

/// Inverse of [`standardize_footprint_origin`]
pub fn anchor_from_footprint_origin(origin: IVec3, rotated_size: IVec3, rotation: Rotation) -> IVec3 {
    origin - footprint_shift(rotated_size, rotation)
}

/// Fully resolved placement of one blueprint attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rotation: Rotation,
    pub anchor: IVec3,
    pub footprint_origin: IVec3,
    pub rotated_size: IVec3,
}

impl Placement {
    /// Resolve the placement that lines the blueprint's entrance up with `target`
    ///
    /// # Arguments
    /// * `target` - World position the entrance opening should land on
    /// * `entrance` - Unrotated, template-local entrance position
    /// * `size` - Unrotated template size
    /// * `rotation` - Rotation to apply
    pub fn resolve(target: IVec3, entrance: IVec3, size: IVec3, rotation: Rotation) -> Self {
        let rotated_size = rotate_footprint(size, rotation);
        let anchor = align_entrance_to_target(target, rotation.apply(entrance), rotation);
        Self {
            rotation,
            anchor,
            footprint_origin: standardize_footprint_origin(anchor, rotated_size, rotation),
            rotated_size,
        }
    }

    /// Same placement moved down by `dy` blocks
    pub fn lowered(self, dy: i32) -> Self {
        let shift = IVec3::new(0, dy, 0);
        Self {
            anchor: self.anchor - shift,
            footprint_origin: self.footprint_origin - shift,
            ..self
        }
    }

    /// World position of a template-local position under this placement
    pub fn to_world(&self, local: IVec3) -> IVec3 {
        self.anchor + self.rotation.apply(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_footprint() {
        let size = IVec3::new(5, 2, 9);
        assert_eq!(rotate_footprint(size, Rotation::Clockwise90), IVec3::new(9, 2, 5));
        assert_eq!(rotate_footprint(size, Rotation::Clockwise180), size);
    }

    #[test]
    fn test_align_round_trip_all_rotations() {
        let target = IVec3::new(120, 64, -37);
        for rotation in Rotation::ALL {
            for entrance in [IVec3::new(0, 0, 0), IVec3::new(3, 1, 5), IVec3::new(-2, 0, 7)] {
                let rotated = rotation.apply(entrance);
                let anchor = align_entrance_to_target(target, rotated, rotation);
                assert_eq!(target_from_anchor(anchor, rotated, rotation), target);
            }
        }
    }

    #[test]
    fn test_standardize_round_trip_all_rotations() {
        let anchor = IVec3::new(-8, 70, 15);
        for rotation in Rotation::ALL {
            for size in [IVec3::new(1, 1, 1), IVec3::new(6, 4, 3), IVec3::new(11, 2, 2)] {
                let rotated_size = rotate_footprint(size, rotation);
                let origin = standardize_footprint_origin(anchor, rotated_size, rotation);
                assert_eq!(
                    anchor_from_footprint_origin(origin, rotated_size, rotation),
                    anchor
                );
            }
        }
    }

    #[test]
    fn test_rotation_corrections() {
        let target = IVec3::new(10, 0, 10);
        let entrance = IVec3::new(2, 0, 3);
        assert_eq!(
            align_entrance_to_target(target, entrance, Rotation::None),
            IVec3::new(8, 0, 7)
        );
        assert_eq!(
            align_entrance_to_target(target, entrance, Rotation::Clockwise90),
            IVec3::new(9, 0, 7)
        );
        assert_eq!(
            align_entrance_to_target(target, entrance, Rotation::Clockwise180),
            IVec3::new(9, 0, 8)
        );
        assert_eq!(
            align_entrance_to_target(target, entrance, Rotation::CounterClockwise90),
            IVec3::new(8, 0, 8)
        );
    }

    #[test]
    fn test_footprint_covers_every_rotated_cell() {
        let size = IVec3::new(4, 1, 6);
        for rotation in Rotation::ALL {
            let placement = Placement::resolve(IVec3::new(50, 10, 50), IVec3::new(1, 0, 2), size, rotation);
            let min = placement.footprint_origin;
            let max = min + placement.rotated_size - IVec3::ONE;

            for x in 0..size.x {
                for z in 0..size.z {
                    let world = placement.to_world(IVec3::new(x, 0, z));
                    assert!(
                        world.x >= min.x && world.x <= max.x && world.z >= min.z && world.z <= max.z,
                        "{:?}: cell {:?} outside footprint",
                        rotation,
                        world
                    );
                }
            }
        }
    }

    #[test]
    fn test_entrance_opening_lands_on_target() {
        let size = IVec3::new(7, 3, 5);
        let entrance = IVec3::new(2, 0, 1);
        let target = IVec3::new(-30, 64, 12);

        for rotation in Rotation::ALL {
            let placement = Placement::resolve(target, entrance, size, rotation);
            let opening: Vec<IVec3> = [
                IVec3::new(0, 0, 0),
                IVec3::new(1, 0, 0),
                IVec3::new(0, 0, 1),
                IVec3::new(1, 0, 1),
            ]
            .iter()
            .map(|d| placement.to_world(entrance + *d))
            .collect();

            let min_x = opening.iter().map(|p| p.x).min().unwrap();
            let min_z = opening.iter().map(|p| p.z).min().unwrap();
            assert_eq!((min_x, min_z), (target.x, target.z), "{:?}", rotation);
        }
    }

    #[test]
    fn test_lowered() {
        let placement = Placement::resolve(IVec3::new(0, 20, 0), IVec3::ZERO, IVec3::new(3, 3, 3), Rotation::None);
        let lowered = placement.lowered(2);
        assert_eq!(lowered.anchor.y, 18);
        assert_eq!(lowered.footprint_origin.y, 18);
        assert_eq!(lowered.rotated_size, placement.rotated_size);
    }
}
