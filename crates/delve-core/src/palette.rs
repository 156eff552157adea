//! Weighted random palettes
//!
//! A palette maps positive weights to tokens (block IDs, mob names). Each draw
//! is independent: the probability of a token is `weight / total_weight`.

use crate::world::WorldRng;

/// Weighted-random collection of tokens
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedPalette<T> {
    entries: Vec<(u32, T)>,
    total_weight: u32,
}

impl<T> WeightedPalette<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0,
        }
    }

    /// Builder-style `add`
    pub fn with(mut self, weight: u32, item: T) -> Self {
        self.add(weight, item);
        self
    }

    /// Add an entry; zero weights and weights that would overflow the total
    /// are ignored
    pub fn add(&mut self, weight: u32, item: T) {
        if weight == 0 {
            log::warn!("Ignoring palette entry with zero weight");
            return;
        }
        let Some(total) = self.total_weight.checked_add(weight) else {
            log::warn!(
                "Ignoring palette entry with weight {}, total would exceed {}",
                weight,
                u32::MAX
            );
            return;
        };
        self.total_weight = total;
        self.entries.push((weight, item));
    }

    /// Draw one token (None only for an empty palette)
    pub fn next(&self, rng: &mut dyn WorldRng) -> Option<&T> {
        if self.entries.is_empty() {
            return None;
        }

        let mut roll = rng.gen_index(self.total_weight as usize) as u32;
        for (weight, item) in &self.entries {
            if roll < *weight {
                return Some(item);
            }
            roll -= weight;
        }

        // Unreachable while total_weight matches the entries
        self.entries.last().map(|(_, item)| item)
    }

    /// Endless sequence of independent draws (empty for an empty palette)
    pub fn iter<'a>(&'a self, rng: &'a mut dyn WorldRng) -> impl Iterator<Item = &'a T> + 'a {
        std::iter::from_fn(move || self.next(rng))
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(u32, T)] {
        &self.entries
    }
}

impl<T> Default for WeightedPalette<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(u32, T)> for WeightedPalette<T> {
    fn from_iter<I: IntoIterator<Item = (u32, T)>>(iter: I) -> Self {
        let mut palette = Self::new();
        for (weight, item) in iter {
            palette.add(weight, item);
        }
        palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_blocks::BlockId;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn standard_palette() -> WeightedPalette<u16> {
        WeightedPalette::new()
            .with(50, BlockId::AIR)
            .with(25, BlockId::SAND)
            .with(15, BlockId::COBBLESTONE)
            .with(15, BlockId::GRAVEL)
    }

    #[test]
    fn test_empty_palette_yields_nothing() {
        let palette: WeightedPalette<u16> = WeightedPalette::new();
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);

        assert!(palette.next(&mut rng).is_none());
        assert_eq!(palette.iter(&mut rng).count(), 0);
    }

    #[test]
    fn test_single_entry_always_selected() {
        let palette = WeightedPalette::new().with(7, BlockId::GRAVEL);
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);

        for _ in 0..200 {
            assert_eq!(palette.next(&mut rng), Some(&BlockId::GRAVEL));
        }
    }

    #[test]
    fn test_zero_weight_ignored() {
        let palette = WeightedPalette::new()
            .with(0, BlockId::TNT)
            .with(3, BlockId::SAND);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.total_weight(), 3);
    }

    #[test]
    fn test_overflowing_weight_ignored() {
        let palette = WeightedPalette::new()
            .with(u32::MAX - 1, BlockId::STONE)
            .with(5, BlockId::TNT)
            .with(1, BlockId::SAND);
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.total_weight(), u32::MAX);

        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        for block in palette.iter(&mut rng).take(50) {
            assert_ne!(*block, BlockId::TNT);
        }
    }

    #[test]
    fn test_sampling_converges_to_weights() {
        let palette = standard_palette();
        let mut rng = Xoshiro256StarStar::seed_from_u64(2024);

        let draws = 105_000;
        let mut counts = std::collections::HashMap::new();
        for block in palette.iter(&mut rng).take(draws) {
            *counts.entry(*block).or_insert(0usize) += 1;
        }

        for (weight, block) in palette.entries() {
            let expected = *weight as f64 / palette.total_weight() as f64;
            let observed = counts.get(block).copied().unwrap_or(0) as f64 / draws as f64;
            assert!(
                (expected - observed).abs() < 0.01,
                "block {} expected {:.3}, observed {:.3}",
                block,
                expected,
                observed
            );
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let palette = standard_palette();

        let mut rng1 = Xoshiro256StarStar::seed_from_u64(77);
        let mut rng2 = Xoshiro256StarStar::seed_from_u64(77);

        let first: Vec<u16> = palette.iter(&mut rng1).take(64).copied().collect();
        let second: Vec<u16> = palette.iter(&mut rng2).take(64).copied().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_from_iterator() {
        let palette: WeightedPalette<&str> = [(1, "a"), (2, "b")].into_iter().collect();
        assert_eq!(palette.total_weight(), 3);
        assert_eq!(palette.entries()[1], (2, "b"));
    }
}
