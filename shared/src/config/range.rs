//! Bounded uniform ranges and the status-conditioned byte size policy.

use rand::distributions::uniform::SampleUniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An inclusive `[min, max]` range sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange<T> {
    /// Lower bound (inclusive).
    pub min: T,
    /// Upper bound (inclusive).
    pub max: T,
}

impl<T> UniformRange<T>
where
    T: SampleUniform + PartialOrd + Copy,
{
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `min <= max`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Returns `true` if `value` lies within the range.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Draws a value uniformly from the range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`; pools are validated before sampling.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        rng.gen_range(self.min..=self.max)
    }
}

/// Response size ranges conditioned on the HTTP status class.
///
/// Error responses are small, redirects smaller still, successful responses
/// span a much wider range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ByteSizePolicy {
    /// Range for status codes `>= 400`.
    pub error: UniformRange<u32>,
    /// Range for `3xx` status codes.
    pub redirect: UniformRange<u32>,
    /// Range for every other status code.
    pub success: UniformRange<u32>,
}

impl ByteSizePolicy {
    /// Returns the range that applies to `status`.
    #[must_use]
    pub const fn range_for(&self, status: u16) -> &UniformRange<u32> {
        if status >= 400 {
            &self.error
        } else if status >= 300 {
            &self.redirect
        } else {
            &self.success
        }
    }

    /// Draws a response size for `status`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, status: u16) -> u32 {
        self.range_for(status).sample(rng)
    }

    /// Returns `true` if every range has `min <= max`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_valid() && self.redirect.is_valid() && self.success.is_valid()
    }
}

impl Default for ByteSizePolicy {
    fn default() -> Self {
        Self {
            error: UniformRange::new(0, 1000),
            redirect: UniformRange::new(0, 500),
            success: UniformRange::new(100, 50_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uniform_range_sample_within_bounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let range = UniformRange::new(0.001, 2.0);

        for _ in 0..1000 {
            let value = range.sample(&mut rng);
            assert!(range.contains(value), "{value} out of range");
        }
    }

    #[test]
    fn test_uniform_range_degenerate() {
        let mut rng = StdRng::seed_from_u64(1);
        let range = UniformRange::new(7_u32, 7);
        assert_eq!(range.sample(&mut rng), 7);
        assert!(range.is_valid());
        assert!(!UniformRange::new(5, 4).is_valid());
    }

    #[test]
    fn test_byte_size_policy_range_selection() {
        let policy = ByteSizePolicy::default();
        assert_eq!(policy.range_for(200), &policy.success);
        assert_eq!(policy.range_for(201), &policy.success);
        assert_eq!(policy.range_for(301), &policy.redirect);
        assert_eq!(policy.range_for(302), &policy.redirect);
        assert_eq!(policy.range_for(400), &policy.error);
        assert_eq!(policy.range_for(503), &policy.error);
    }

    #[test]
    fn test_byte_size_policy_samples_conditioned_on_status() {
        let mut rng = StdRng::seed_from_u64(42);
        let policy = ByteSizePolicy::default();

        for _ in 0..500 {
            assert!(policy.sample(&mut rng, 404) <= 1000);
            assert!(policy.sample(&mut rng, 302) <= 500);
            let ok = policy.sample(&mut rng, 200);
            assert!((100..=50_000).contains(&ok));
        }
    }

    #[test]
    fn test_byte_size_policy_deserialization() {
        let json = r#"{
            "error": {"min": 0, "max": 10},
            "redirect": {"min": 0, "max": 5},
            "success": {"min": 100, "max": 200}
        }"#;

        let policy: ByteSizePolicy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.error, UniformRange::new(0, 10));
        assert!(policy.is_valid());
    }
}
