//! Mob selection for spawners

use delve_blocks::MobId;

use crate::palette::WeightedPalette;
use crate::world::WorldRng;

/// Capability to pick a random dungeon mob
pub trait MobSource {
    /// Random mob ID, or None if the source has nothing to offer
    fn random_dungeon_mob(&self, rng: &mut dyn WorldRng) -> Option<String>;
}

/// Weighted dungeon mob table
#[derive(Debug, Clone)]
pub struct DungeonMobs {
    palette: WeightedPalette<String>,
}

impl DungeonMobs {
    pub fn new(palette: WeightedPalette<String>) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &WeightedPalette<String> {
        &self.palette
    }
}

impl Default for DungeonMobs {
    fn default() -> Self {
        Self::new(
            WeightedPalette::new()
                .with(100, MobId::SKELETON.to_string())
                .with(200, MobId::ZOMBIE.to_string())
                .with(100, MobId::SPIDER.to_string()),
        )
    }
}

impl MobSource for DungeonMobs {
    fn random_dungeon_mob(&self, rng: &mut dyn WorldRng) -> Option<String> {
        self.palette.next(rng).cloned()
    }
}

/// Mob source that always returns the same mob
#[derive(Debug, Clone)]
pub struct FixedMob(pub String);

impl MobSource for FixedMob {
    fn random_dungeon_mob(&self, _rng: &mut dyn WorldRng) -> Option<String> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_default_table_only_dungeon_mobs() {
        let mobs = DungeonMobs::default();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);

        for _ in 0..100 {
            let mob = mobs.random_dungeon_mob(&mut rng).unwrap();
            assert!(
                [MobId::SKELETON, MobId::ZOMBIE, MobId::SPIDER].contains(&mob.as_str()),
                "unexpected mob {}",
                mob
            );
        }
    }

    #[test]
    fn test_empty_table() {
        let mobs = DungeonMobs::new(WeightedPalette::new());
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        assert!(mobs.random_dungeon_mob(&mut rng).is_none());
    }
}
