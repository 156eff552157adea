//! RNG trait abstraction for world generation
//!
//! Generators take `&mut dyn WorldRng` so the host can inject:
//! - a seeded RNG (deterministic generation, tests)
//! - Rust's thread_rng() (interactive tools)

/// Random number generator trait for world generation
pub trait WorldRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Generate random i32 in [min, max] (inclusive); returns `min` when `max <= min`
    fn gen_range_i32(&mut self, min: i32, max: i32) -> i32;

    /// Generate a random index in [0, len); returns 0 for empty collections
    fn gen_index(&mut self, len: usize) -> usize;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }
}

// Blanket implementation for any type implementing rand::Rng
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_range_i32(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        rand::Rng::gen_range(self, min..=max)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        rand::Rng::gen_range(self, 0..len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_world_rng_gen_bool() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        let mut seen_true = false;
        let mut seen_false = false;

        for _ in 0..100 {
            if rng.gen_bool() {
                seen_true = true;
            } else {
                seen_false = true;
            }
        }

        assert!(seen_true);
        assert!(seen_false);
    }

    #[test]
    fn test_world_rng_gen_range_inclusive() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..500 {
            let val = rng.gen_range_i32(4, 8);
            assert!((4..=8).contains(&val));
            seen_min |= val == 4;
            seen_max |= val == 8;
        }

        assert!(seen_min, "lower bound never drawn");
        assert!(seen_max, "upper bound never drawn");
    }

    #[test]
    fn test_world_rng_degenerate_ranges() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);

        assert_eq!(rng.gen_range_i32(3, 3), 3);
        assert_eq!(rng.gen_range_i32(5, 1), 5);
        assert_eq!(rng.gen_index(0), 0);
        assert_eq!(rng.gen_index(1), 0);
    }

    #[test]
    fn test_world_rng_check_probability_bounds() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(12345);

        for _ in 0..100 {
            assert!(rng.check_probability(1.0));
            assert!(!rng.check_probability(0.0));
        }
    }

    #[test]
    fn test_world_rng_through_trait_object() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(99);
        let dyn_rng: &mut dyn WorldRng = &mut rng;

        for _ in 0..100 {
            assert!(dyn_rng.gen_index(6) < 6);
        }
    }

    #[test]
    fn test_world_rng_deterministic() {
        let mut rng1 = Xoshiro256StarStar::seed_from_u64(42);
        let mut rng2 = Xoshiro256StarStar::seed_from_u64(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_i32(0, 1000), rng2.gen_range_i32(0, 1000));
            assert_eq!(rng1.gen_f32(), rng2.gen_f32());
        }
    }
}
