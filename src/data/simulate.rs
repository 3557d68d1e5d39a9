//! Synthetic psychometric data.
//!
//! Proportions come from a named sigmoid; counts are drawn per stimulus level.
//! All randomness goes through a caller-supplied RNG so runs are reproducible
//! from a seed.

use rand::Rng;
use rand_distr::{Beta, Binomial, Distribution};

use crate::data::Block;
use crate::error::{PsignifitError, Result};
use crate::sigmoids::default_sigmoid_by_name;

/// Proportion correct at each stimulus level for the named sigmoid.
pub fn psychometric(
    stimulus_levels: &[f64],
    threshold: f64,
    width: f64,
    gamma: f64,
    lambda: f64,
    sigmoid_name: &str,
) -> Result<Vec<f64>> {
    check_curve_parameters(width, gamma, lambda)?;
    let sigmoid = default_sigmoid_by_name(sigmoid_name)?;
    Ok(sigmoid.psychometric_many(stimulus_levels, threshold, width, gamma, lambda))
}

/// Proportions with overdispersion `eta`.
///
/// Each proportion `p` is replaced by a draw from `Beta(a, b)` with
/// `a = (1/eta^2 - 1) p` and `b = (1/eta^2 - 1) (1 - p)`, which keeps the mean at
/// `p` and scales the binomial variance by `1 + eta^2 (n - 1)`.
#[allow(clippy::too_many_arguments)]
pub fn psychometric_with_eta<R: Rng + ?Sized>(
    stimulus_levels: &[f64],
    threshold: f64,
    width: f64,
    gamma: f64,
    lambda: f64,
    sigmoid_name: &str,
    eta: f64,
    rng: &mut R,
) -> Result<Vec<f64>> {
    if !(eta > 0.0 && eta < 1.0) {
        return Err(PsignifitError::config(format!(
            "Overdispersion eta must be strictly between 0 and 1 ({eta} given)!"
        )));
    }
    let concentration = 1.0 / (eta * eta) - 1.0;

    let psi = psychometric(stimulus_levels, threshold, width, gamma, lambda, sigmoid_name)?;
    psi.into_iter()
        .map(|p| -> Result<f64> {
            // A saturated proportion has a degenerate beta; keep it as is.
            if p <= 0.0 || p >= 1.0 {
                return Ok(p);
            }
            let beta = Beta::new(concentration * p, concentration * (1.0 - p))
                .map_err(|e| PsignifitError::config(format!("Overdispersion distribution error: {e}")))?;
            Ok(beta.sample(&mut *rng))
        })
        .collect()
}

/// One binomial block of `trials` trials per stimulus level.
pub fn simulate_blocks<R: Rng + ?Sized>(
    stimulus_levels: &[f64],
    proportions: &[f64],
    trials: u32,
    rng: &mut R,
) -> Result<Vec<Block>> {
    if stimulus_levels.len() != proportions.len() {
        return Err(PsignifitError::config(format!(
            "Got {} stimulus levels but {} proportions.",
            stimulus_levels.len(),
            proportions.len()
        )));
    }
    if trials == 0 {
        return Err(PsignifitError::config("Trials per block must be > 0."));
    }

    stimulus_levels
        .iter()
        .zip(proportions)
        .map(|(&level, &p)| -> Result<Block> {
            let binomial = Binomial::new(u64::from(trials), p.clamp(0.0, 1.0))
                .map_err(|e| PsignifitError::config(format!("Binomial distribution error: {e}")))?;
            // Never more than `trials`, so the narrowing is lossless.
            let n_correct = binomial.sample(&mut *rng) as u32;
            Ok(Block {
                level,
                n_correct,
                n_trials: trials,
            })
        })
        .collect()
}

fn check_curve_parameters(width: f64, gamma: f64, lambda: f64) -> Result<()> {
    if !(width.is_finite() && width > 0.0) {
        return Err(PsignifitError::config(format!("Width must be > 0 ({width} given).")));
    }
    if !((0.0..1.0).contains(&gamma) && (0.0..1.0).contains(&lambda) && gamma + lambda < 1.0) {
        return Err(PsignifitError::config(format!(
            "Guess and lapse rates must satisfy 0 <= gamma + lambda < 1: got gamma={gamma}, lambda={lambda}."
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    const LEVELS: [f64; 5] = [0.1, 0.3, 0.5, 0.7, 0.9];

    #[test]
    fn psychometric_respects_asymptotes() {
        let psi = psychometric(&LEVELS, 0.5, 0.4, 0.5, 0.02, "logistic").unwrap();
        assert!((psi[2] - (0.5 + 0.48 * 0.5)).abs() < 1e-12);
        for window in psi.windows(2) {
            assert!(window[0] < window[1]);
        }
        for p in psi {
            assert!((0.5..=0.98).contains(&p));
        }
    }

    #[test]
    fn psychometric_rejects_bad_names_and_rates() {
        assert!(psychometric(&LEVELS, 0.5, 0.4, 0.0, 0.0, "sigmoid").is_err());
        assert!(psychometric(&LEVELS, 0.5, 0.4, 0.6, 0.5, "norm").is_err());
        assert!(psychometric(&LEVELS, 0.5, 0.0, 0.0, 0.0, "norm").is_err());
    }

    #[test]
    fn overdispersion_keeps_the_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let levels = vec![0.5; 4000];
        let noisy = psychometric_with_eta(&levels, 0.5, 1.0, 0.0, 0.0, "norm", 0.2, &mut rng).unwrap();
        let mean = noisy.iter().sum::<f64>() / noisy.len() as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean={mean}");
        let spread = noisy.iter().map(|p| (p - 0.5).powi(2)).sum::<f64>() / noisy.len() as f64;
        // Beta variance is p (1 - p) eta^2 = 0.01.
        assert!((spread - 0.01).abs() < 0.002, "variance={spread}");
    }

    #[test]
    fn overdispersion_is_seeded() {
        let a = psychometric_with_eta(&LEVELS, 0.5, 0.4, 0.0, 0.0, "gumbel", 0.3, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = psychometric_with_eta(&LEVELS, 0.5, 0.4, 0.0, 0.0, "gumbel", 0.3, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a, b);
        assert!(psychometric_with_eta(&LEVELS, 0.5, 0.4, 0.0, 0.0, "gumbel", 1.0, &mut StdRng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn simulated_counts_stay_within_trials() {
        let mut rng = StdRng::seed_from_u64(42);
        let psi = psychometric(&LEVELS, 0.5, 0.4, 0.0, 0.0, "norm").unwrap();
        let blocks = simulate_blocks(&LEVELS, &psi, 50, &mut rng).unwrap();
        assert_eq!(blocks.len(), LEVELS.len());
        for (block, level) in blocks.iter().zip(LEVELS) {
            assert_eq!(block.level, level);
            assert_eq!(block.n_trials, 50);
            assert!(block.n_correct <= 50);
        }

        let certain = simulate_blocks(&[0.0, 1.0], &[0.0, 1.0], 10, &mut rng).unwrap();
        assert_eq!(certain[0].n_correct, 0);
        assert_eq!(certain[1].n_correct, 10);
    }

    #[test]
    fn simulate_rejects_mismatched_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(simulate_blocks(&LEVELS, &[0.5], 10, &mut rng).is_err());
        assert!(simulate_blocks(&[0.5], &[0.5], 0, &mut rng).is_err());
    }
}
