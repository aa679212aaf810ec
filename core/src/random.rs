//! Injectable uniform-random source consumed by agent decision logic.

use rand::Rng;

/// Uniform random draws required by the foraging agents.
///
/// Every [`rand::Rng`] implements this trait, so a seeded
/// `rand_chacha::ChaCha8Rng` yields reproducible simulations. Tests may
/// provide scripted implementations to force exact sampling paths.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn unit(&mut self) -> f32;

    /// Uniform float in `[low, high)`. Returns `low` when the range is empty.
    fn between(&mut self, low: f32, high: f32) -> f32;

    /// Uniform integer in `[low, high]`, inclusive on both ends. Returns `low`
    /// when `high <= low`.
    fn index_in(&mut self, low: u32, high: u32) -> u32;

    /// Bernoulli draw that succeeds with probability `probability`.
    ///
    /// Probabilities outside `[0, 1]` are clamped and `NaN` never succeeds.
    fn chance(&mut self, probability: f32) -> bool;

    /// Uniform float in `[-half_width, half_width)`.
    fn symmetric(&mut self, half_width: f32) -> f32 {
        self.between(-half_width, half_width)
    }
}

impl<R> RandomSource for R
where
    R: Rng + ?Sized,
{
    fn unit(&mut self) -> f32 {
        self.gen::<f32>()
    }

    fn between(&mut self, low: f32, high: f32) -> f32 {
        if !(high > low) || !low.is_finite() || !high.is_finite() {
            return low;
        }
        self.gen_range(low..high)
    }

    fn index_in(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn chance(&mut self, probability: f32) -> bool {
        if !(probability > 0.0) {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.gen_bool(f64::from(probability))
    }
}

#[cfg(test)]
mod tests {
    use super::RandomSource;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn draws_stay_within_requested_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..256 {
            let unit = rng.unit();
            assert!((0.0..1.0).contains(&unit));

            let value = rng.between(-2.5, 4.0);
            assert!((-2.5..4.0).contains(&value));

            let index = rng.index_in(3, 9);
            assert!((3..=9).contains(&index));

            let noise = rng.symmetric(0.25);
            assert!((-0.25..0.25).contains(&noise));
        }
    }

    #[test]
    fn degenerate_ranges_collapse_to_lower_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert_eq!(rng.index_in(5, 5), 5);
        assert_eq!(rng.index_in(8, 2), 8);
        assert_eq!(rng.between(1.5, 1.5), 1.5);
        assert_eq!(rng.symmetric(0.0), 0.0);
    }

    #[test]
    fn chance_clamps_probabilities() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..64 {
            assert!(!rng.chance(0.0));
            assert!(!rng.chance(-1.0));
            assert!(!rng.chance(f32::NAN));
            assert!(rng.chance(1.0));
            assert!(rng.chance(3.0));
        }
    }

    #[test]
    fn seeded_sources_are_reproducible() {
        let mut first = ChaCha8Rng::seed_from_u64(0xa11c_e5ed);
        let mut second = ChaCha8Rng::seed_from_u64(0xa11c_e5ed);
        let a: Vec<u32> = (0..32).map(|_| first.index_in(0, 1_000)).collect();
        let b: Vec<u32> = (0..32).map(|_| second.index_in(0, 1_000)).collect();
        assert_eq!(a, b);
    }
}
