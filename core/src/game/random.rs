use anyhow::{Context, Result};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

/// Categorical distribution validated once at construction.
#[derive(Debug, Clone)]
pub struct WeightTable {
    index: WeightedIndex<f64>,
    len: usize,
}

impl WeightTable {
    pub fn new(weights: &[f64]) -> Result<Self> {
        let index = WeightedIndex::new(weights)
            .with_context(|| format!("重みテーブルが不正です: {weights:?}"))?;
        Ok(Self {
            index,
            len: weights.len(),
        })
    }

    /// Number of outcomes, zero-weight ones included.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Source of every random draw the yearly update makes.
///
/// Any `rand::Rng` works; the simulation never reaches for a global generator.
pub trait EconomyRng {
    /// Uniform draw from `[low, high)`.
    fn draw_uniform(&mut self, low: f64, high: f64) -> f64;

    /// Uniform draw from `[0, 1)`, compared against probabilities.
    fn draw_unit(&mut self) -> f64;

    /// Index into `table`, chosen proportionally.
    fn draw_weighted(&mut self, table: &WeightTable) -> usize;
}

impl<R: Rng + ?Sized> EconomyRng for R {
    fn draw_uniform(&mut self, low: f64, high: f64) -> f64 {
        self.gen_range(low..high)
    }

    fn draw_unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }

    fn draw_weighted(&mut self, table: &WeightTable) -> usize {
        table.index.sample(self)
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use std::collections::VecDeque;

    use super::{EconomyRng, WeightTable};

    /// Replays queued values. Empty queues fall back to the range midpoint,
    /// a unit draw that never beats a probability, and the last weight.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedRng {
        uniforms: VecDeque<f64>,
        units: VecDeque<f64>,
        picks: VecDeque<usize>,
    }

    impl ScriptedRng {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_uniforms(mut self, values: impl IntoIterator<Item = f64>) -> Self {
            self.uniforms.extend(values);
            self
        }

        pub(crate) fn with_units(mut self, values: impl IntoIterator<Item = f64>) -> Self {
            self.units.extend(values);
            self
        }

        pub(crate) fn with_picks(mut self, values: impl IntoIterator<Item = usize>) -> Self {
            self.picks.extend(values);
            self
        }

        pub(crate) fn pending_units(&self) -> usize {
            self.units.len()
        }
    }

    impl EconomyRng for ScriptedRng {
        fn draw_uniform(&mut self, low: f64, high: f64) -> f64 {
            self.uniforms
                .pop_front()
                .unwrap_or_else(|| (low + high) / 2.0)
        }

        fn draw_unit(&mut self) -> f64 {
            self.units.pop_front().unwrap_or(0.999)
        }

        fn draw_weighted(&mut self, table: &WeightTable) -> usize {
            let last = table.len() - 1;
            self.picks.pop_front().unwrap_or(last).min(last)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn uniform_draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let value = rng.draw_uniform(50.0, 100.0);
            assert!((50.0..100.0).contains(&value));
        }
    }

    #[test]
    fn weighted_draw_never_picks_zero_weight() {
        let table = WeightTable::new(&[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            assert_eq!(rng.draw_weighted(&table), 1);
        }
    }

    #[test]
    fn unusable_weight_tables_are_rejected() {
        assert!(WeightTable::new(&[]).is_err());
        assert!(WeightTable::new(&[0.0, 0.0]).is_err());
        assert!(WeightTable::new(&[0.5, -0.1]).is_err());
        assert!(WeightTable::new(&[0.5, f64::NAN]).is_err());
    }
}
