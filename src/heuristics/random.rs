//! Injectable randomness for the stochastic heuristics.
//!
//! Every `rand::Rng` (for instance a seeded `ChaCha8Rng`) is a [`RandomSource`],
//! so callers pick the generator and tests can pin its seed or script the
//! exact draws.

use rand::Rng;

/// The two kinds of draws the heuristics need
pub trait RandomSource {
    /// Uniform index in `0..bound`; `bound` must be non-zero
    fn index(&mut self, bound: usize) -> usize;

    /// Uniform value in `[0, 1)`
    fn unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn index(&mut self, bound: usize) -> usize {
        self.gen_range(0..bound)
    }

    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws. Panics when a script runs dry.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    indices: std::collections::VecDeque<usize>,
    units: std::collections::VecDeque<f64>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(indices: &[usize], units: &[f64]) -> Self {
        ScriptedSource {
            indices: indices.iter().copied().collect(),
            units: units.iter().copied().collect(),
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.indices.is_empty() && self.units.is_empty()
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn index(&mut self, bound: usize) -> usize {
        let value = self.indices.pop_front().expect("index script exhausted");
        assert!(value < bound, "scripted index {} out of bound {}", value, bound);
        value
    }

    fn unit(&mut self) -> f64 {
        self.units.pop_front().expect("unit script exhausted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_seeded_rng_is_a_source() {
        let mut a = ChaCha8Rng::seed_from_u64(7);
        let mut b = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let i = RandomSource::index(&mut a, 5);
            assert_eq!(i, RandomSource::index(&mut b, 5));
            assert!(i < 5);

            let u = RandomSource::unit(&mut a);
            assert_eq!(u, RandomSource::unit(&mut b));
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_scripted_source() {
        let mut source = ScriptedSource::new(&[1, 0], &[0.25]);
        assert_eq!(source.index(2), 1);
        assert_eq!(source.unit(), 0.25);
        assert_eq!(source.index(2), 0);
        assert!(source.is_exhausted());
    }
}
