//! Latent noise sampling

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Draw `dim` independent standard-normal samples
pub fn sample_noise<R: Rng + ?Sized>(rng: &mut R, dim: usize) -> Vec<f32> {
    (0..dim).map(|_| rng.sample::<f32, _>(StandardNormal)).collect()
}

/// A per-connection RNG seeded from OS entropy
pub fn session_rng() -> StdRng {
    StdRng::from_entropy()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_width() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(sample_noise(&mut rng, 8).len(), 8);
        assert!(sample_noise(&mut rng, 0).is_empty());
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let a = sample_noise(&mut StdRng::seed_from_u64(42), 8);
        let b = sample_noise(&mut StdRng::seed_from_u64(42), 8);
        assert_eq!(a, b);
    }

    #[test]
    fn test_consecutive_draws_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let a = sample_noise(&mut rng, 8);
        let b = sample_noise(&mut rng, 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_distribution_is_roughly_standard() {
        let mut rng = StdRng::seed_from_u64(3);
        let samples = sample_noise(&mut rng, 20_000);
        let n = samples.len() as f64;
        let mean = samples.iter().map(|&v| v as f64).sum::<f64>() / n;
        let var = samples
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((var - 1.0).abs() < 0.05, "variance {var}");
    }

    #[test]
    fn test_independent_session_rngs() {
        let a = sample_noise(&mut session_rng(), 8);
        let b = sample_noise(&mut session_rng(), 8);
        assert_ne!(a, b);
    }
}
