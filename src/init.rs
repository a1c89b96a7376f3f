use rand::Rng;

/// A `ParamGen` generates values for the initial state of the network's parameters.
pub trait ParamGen {
    /// Should sample at most `n` parameters.
    ///
    /// # Arguments
    /// * `n` - The upper limit of samples to generate.
    ///
    /// # Returns
    /// An option whether the generator is exhausted.
    fn sample(&mut self, n: usize) -> Option<Vec<f64>>;
}

/// A parameter generator drawing every value independently from `uniform[low, high)`.
///
/// The random number generator is borrowed, so the caller decides how it's seeded.
pub struct RandParamGen<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    low: f64,
    high: f64,
}

impl<'a, R: Rng + ?Sized> RandParamGen<'a, R> {
    /// Creates a new `RandParamGen` over `[low, high)`.
    ///
    /// # Arguments
    /// * `rng` - A random number generator.
    /// * `low` - The inclusive lower limit.
    /// * `high` - The exclusive upper limit, must be greater than `low`.
    pub fn uniform(rng: &'a mut R, low: f64, high: f64) -> Self {
        Self { rng, low, high }
    }

    /// The playground's default initialization, `uniform[-1, 1)`.
    pub fn symmetric(rng: &'a mut R) -> Self {
        Self::uniform(rng, -1., 1.)
    }

    /// Draws a single value, this generator never runs dry.
    pub fn next_value(&mut self) -> f64 {
        self.rng.random_range(self.low..self.high)
    }
}

impl<R: Rng + ?Sized> ParamGen for RandParamGen<'_, R> {
    fn sample(&mut self, n: usize) -> Option<Vec<f64>> {
        Some((0..n).map(|_| self.next_value()).collect())
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn uniform_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut param_gen = RandParamGen::symmetric(&mut rng);
        let sample = param_gen.sample(1000).unwrap();

        assert_eq!(sample.len(), 1000);
        assert!(sample.iter().all(|v| (-1. ..1.).contains(v)));
        assert!(sample.iter().any(|&v| v < 0.));
        assert!(sample.iter().any(|&v| v > 0.));
    }

    #[test]
    fn uniform_is_reproducible() {
        let a = RandParamGen::symmetric(&mut StdRng::seed_from_u64(7)).sample(17);
        let b = RandParamGen::symmetric(&mut StdRng::seed_from_u64(7)).sample(17);

        assert_eq!(a, b);
    }
}
