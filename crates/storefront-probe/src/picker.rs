//! Seeded choice among matched elements.
//!
//! The filter scenario picks one product out of the filtered grid. The draw
//! is reproducible: same seed, same sequence of picks.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Deterministic seed for reproducible draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(u64);

impl Default for Seed {
    fn default() -> Self {
        Self(0x5EED)
    }
}

impl Seed {
    /// Create a seed from a u64 value
    #[must_use]
    pub const fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// Get the raw seed value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Seed for one scenario: the run seed mixed with the scenario id, so
    /// parallel scenarios draw independently of scheduling order
    #[must_use]
    pub fn for_scenario(self, scenario_id: &str) -> Self {
        // FNV-1a over the id
        let hash = scenario_id.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
        });
        Self(self.0 ^ hash)
    }
}

/// xorshift64 generator
#[derive(Debug, Clone)]
pub struct Picker {
    seed: Seed,
    state: u64,
    draws: usize,
}

impl Picker {
    /// Create a picker
    #[must_use]
    pub const fn new(seed: Seed) -> Self {
        // xorshift state must be non-zero
        let state = if seed.0 == 0 { 1 } else { seed.0 };
        Self {
            seed,
            state,
            draws: 0,
        }
    }

    const fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Seed this picker started from
    #[must_use]
    pub const fn seed(&self) -> Seed {
        self.seed
    }

    /// Index in `0..len`, `None` when there is nothing to pick from
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let len_u64 = len as u64;
        let index = usize::try_from(self.next() % len_u64).unwrap_or(0);
        self.draws += 1;
        info!(
            seed = self.seed.value(),
            draw = self.draws,
            index,
            of = len,
            "picked product"
        );
        Some(index)
    }

    /// Pick a reference into `items`
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.pick_index(items.len()).and_then(|i| items.get(i))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Picker::new(Seed::from_u64(42));
        let mut b = Picker::new(Seed::from_u64(42));
        let left: Vec<_> = (0..20).map(|_| a.pick_index(7)).collect();
        let right: Vec<_> = (0..20).map(|_| b.pick_index(7)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_zero_seed_still_advances() {
        let mut picker = Picker::new(Seed::from_u64(0));
        let picks: Vec<_> = (0..10).map(|_| picker.pick_index(1000).unwrap()).collect();
        assert!(picks.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_empty_yields_none() {
        let mut picker = Picker::new(Seed::default());
        assert_eq!(picker.pick_index(0), None);
        let empty: [u8; 0] = [];
        assert!(picker.pick(&empty).is_none());
    }

    #[test]
    fn test_scenario_seed_differs_per_id() {
        let run = Seed::default();
        assert_ne!(
            run.for_scenario("filter-hammer-random-product"),
            run.for_scenario("search-wood")
        );
        assert_eq!(run.for_scenario("x"), run.for_scenario("x"));
    }

    #[test]
    fn test_default_seed() {
        assert_eq!(Seed::default().value(), 0x5EED);
        assert_eq!(Picker::new(Seed::default()).seed(), Seed::default());
    }

    proptest! {
        #[test]
        fn prop_index_in_bounds(seed in any::<u64>(), len in 1usize..500) {
            let mut picker = Picker::new(Seed::from_u64(seed));
            for _ in 0..8 {
                let index = picker.pick_index(len).unwrap();
                prop_assert!(index < len);
            }
        }

        #[test]
        fn prop_pick_returns_member(seed in any::<u64>(), items in proptest::collection::vec(any::<u32>(), 1..50)) {
            let mut picker = Picker::new(Seed::from_u64(seed));
            let picked = picker.pick(&items).unwrap();
            prop_assert!(items.contains(picked));
        }
    }
}
