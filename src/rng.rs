//! Deterministic random stream for battles.
//!
//! A 32-bit linear congruential generator. Every draw the engine, the AI and
//! the hooks take is pulled from one `SeededRng`, so a battle replays exactly
//! when the seed and the call order are the same.

use crate::errors::RngError;
use serde::{Deserialize, Serialize};

const MULTIPLIER: u32 = 1_664_525;
const INCREMENT: u32 = 1_013_904_223;
const MODULUS: f64 = 4_294_967_296.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRng {
    seed: u32,
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { seed, state: seed }
    }

    /// Next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state as f64 / MODULUS
    }

    /// Uniform integer in `[min, max]`, both inclusive.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let span = (max - min + 1) as f64;
        (self.next() * span).floor() as i64 + min
    }

    /// Uniform float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Returns true with probability `chance`. Always draws.
    pub fn chance(&mut self, chance: f64) -> bool {
        self.next() < chance
    }

    /// Uniform pick. Empty slices yield `None` without drawing.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_int(0, items.len() as i64 - 1) as usize;
        items.get(index)
    }

    /// Cumulative-weight scan; rounding residue falls to the last item.
    pub fn weighted_choose<'a, T>(&mut self, table: &'a WeightedTable<T>) -> &'a T {
        let mut remaining = self.next() * table.total;
        for (item, weight) in table.items.iter().zip(&table.weights) {
            remaining -= weight;
            if remaining <= 0.0 {
                return item;
            }
        }
        &table.items[table.items.len() - 1]
    }

    /// In-place Fisher–Yates, walking from the back.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as i64) as usize;
            items.swap(i, j);
        }
    }

    /// Start a fresh stream; later resets rewind to `seed`.
    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
        self.state = seed;
    }

    /// Rewind to the original seed.
    pub fn reset(&mut self) {
        self.state = self.seed;
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl rand::RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        self.state
    }

    fn next_u64(&mut self) -> u64 {
        let high = self.next_u32() as u64;
        let low = self.next_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// Items paired with weights, validated once when built.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedTable<T> {
    items: Vec<T>,
    weights: Vec<f64>,
    total: f64,
}

impl<T> WeightedTable<T> {
    pub fn new(items: Vec<T>, weights: Vec<f64>) -> Result<Self, RngError> {
        if items.len() != weights.len() {
            return Err(RngError::LengthMismatch {
                items: items.len(),
                weights: weights.len(),
            });
        }
        if items.is_empty() {
            return Err(RngError::Empty);
        }
        let total: f64 = weights.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(RngError::NonPositiveTotal(total));
        }
        Ok(Self { items, weights, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::Rng;

    #[test]
    fn first_draw_matches_the_lcg_recurrence() {
        let mut rng = SeededRng::new(0);
        // state = 0 * a + c
        assert_eq!(rng.next(), 1_013_904_223.0 / MODULUS);
        let expected = 1_013_904_223u32.wrapping_mul(MULTIPLIER).wrapping_add(INCREMENT);
        assert_eq!(rng.next(), expected as f64 / MODULUS);
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        let left: Vec<f64> = (0..32).map(|_| a.next()).collect();
        let right: Vec<f64> = (0..32).map(|_| b.next()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn reset_rewinds_to_seed() {
        let mut rng = SeededRng::new(7);
        let first: Vec<f64> = (0..5).map(|_| rng.next()).collect();
        rng.reset();
        let again: Vec<f64> = (0..5).map(|_| rng.next()).collect();
        assert_eq!(first, again);
        assert_eq!(rng.seed(), 7);
    }

    #[test]
    fn reseed_matches_a_fresh_stream() {
        let mut rng = SeededRng::new(7);
        rng.next();
        rng.reseed(99);
        let mut fresh = SeededRng::new(99);
        let reseeded: Vec<f64> = (0..5).map(|_| rng.next()).collect();
        let expected: Vec<f64> = (0..5).map(|_| fresh.next()).collect();
        assert_eq!(reseeded, expected);
        rng.reset();
        assert_eq!(rng.next(), SeededRng::new(99).next());
    }

    #[test]
    fn next_int_stays_inclusive() {
        let mut rng = SeededRng::new(1234);
        for _ in 0..2_000 {
            let value = rng.next_int(3, 6);
            assert!((3..=6).contains(&value));
        }
    }

    #[test]
    fn choose_on_empty_does_not_draw() {
        let mut rng = SeededRng::new(9);
        let empty: [u8; 0] = [];
        assert_eq!(rng.choose(&empty), None);
        let mut fresh = SeededRng::new(9);
        assert_eq!(rng.next(), fresh.next());
    }

    #[test]
    fn weighted_table_rejects_mismatched_inputs() {
        assert_eq!(
            WeightedTable::new(vec!['a', 'b'], vec![1.0]),
            Err(RngError::LengthMismatch { items: 2, weights: 1 })
        );
        assert_eq!(WeightedTable::<char>::new(vec![], vec![]), Err(RngError::Empty));
        assert_eq!(
            WeightedTable::new(vec!['a'], vec![0.0]),
            Err(RngError::NonPositiveTotal(0.0))
        );
    }

    #[test]
    fn zero_weight_items_are_never_picked_before_the_fallback() {
        let table = WeightedTable::new(vec!["never", "always"], vec![0.0, 1.0]).unwrap();
        let mut rng = SeededRng::new(99);
        for _ in 0..200 {
            assert_eq!(*rng.weighted_choose(&table), "always");
        }
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = SeededRng::new(5);
        let mut values: Vec<u32> = (0..10).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn works_as_a_rand_core_source() {
        let mut rng = SeededRng::new(11);
        let roll: u8 = rng.random_range(1..=6);
        assert!((1..=6).contains(&roll));
    }
}
