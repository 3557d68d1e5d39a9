//! Standard-form distribution functions behind the sigmoid shapes.
//!
//! Every shape is a location/scale family `F((x - loc) / scale)`. This module only
//! knows the standard member (`loc = 0`, `scale = 1`) of each family:
//!
//! - cumulative distribution `F(z)`
//! - quantile `F⁻¹(p)`
//! - density `f(z) = F'(z)`
//!
//! Numerical notes:
//! - Tails near 1 are written with `exp_m1` / `ln_1p` so that forward and inverse
//!   stay dual to ~1e-12 even where `1 - F(z)` is tiny.
//! - Nothing here panics or rejects input: saturated tails return exactly 0 or 1,
//!   and quantiles of 0 or 1 return infinities.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::{erfc, erfc_inv};

/// `1 / sqrt(2π)`.
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / SQRT_2)
}

pub fn normal_quantile(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}

pub fn normal_pdf(z: f64) -> f64 {
    FRAC_1_SQRT_2PI * (-0.5 * z * z).exp()
}

pub fn logistic_cdf(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

pub fn logistic_quantile(p: f64) -> f64 {
    p.ln() - (-p).ln_1p()
}

pub fn logistic_pdf(z: f64) -> f64 {
    // Symmetric, so evaluate on the side where exp() cannot overflow.
    let e = (-z.abs()).exp();
    e / ((1.0 + e) * (1.0 + e))
}

/// Minimum-type Gumbel: `F(z) = 1 - exp(-exp(z))`, long left tail.
pub fn gumbel_cdf(z: f64) -> f64 {
    -(-z.exp()).exp_m1()
}

pub fn gumbel_quantile(p: f64) -> f64 {
    (-(-p).ln_1p()).ln()
}

pub fn gumbel_pdf(z: f64) -> f64 {
    (z - z.exp()).exp()
}

/// Maximum-type Gumbel: `F(z) = exp(-exp(-z))`, long right tail.
pub fn reverse_gumbel_cdf(z: f64) -> f64 {
    (-(-z).exp()).exp()
}

pub fn reverse_gumbel_quantile(p: f64) -> f64 {
    -(-p.ln()).ln()
}

pub fn reverse_gumbel_pdf(z: f64) -> f64 {
    (-z - (-z).exp()).exp()
}

/// Student t with one degree of freedom (Cauchy), the heavy-tailed shape.
pub fn cauchy_cdf(z: f64) -> f64 {
    0.5 + z.atan() / PI
}

pub fn cauchy_quantile(p: f64) -> f64 {
    (PI * (p - 0.5)).tan()
}

pub fn cauchy_pdf(z: f64) -> f64 {
    1.0 / (PI * (1.0 + z * z))
}

#[cfg(test)]
mod tests {
    use super::*;

    type Family = (fn(f64) -> f64, fn(f64) -> f64, fn(f64) -> f64);

    const FAMILIES: [Family; 5] = [
        (normal_cdf, normal_quantile, normal_pdf),
        (logistic_cdf, logistic_quantile, logistic_pdf),
        (gumbel_cdf, gumbel_quantile, gumbel_pdf),
        (reverse_gumbel_cdf, reverse_gumbel_quantile, reverse_gumbel_pdf),
        (cauchy_cdf, cauchy_quantile, cauchy_pdf),
    ];

    #[test]
    fn quantile_inverts_cdf() {
        for (cdf, quantile, _) in FAMILIES {
            // The Gumbel upper tail saturates fastest (1 - F ≈ 5e-6 at z = 2.5).
            for i in 0..=110 {
                let z = -3.0 + 0.05 * i as f64;
                let back = quantile(cdf(z));
                assert!((back - z).abs() < 1e-9, "z={z}, back={back}");
            }
        }
    }

    #[test]
    fn density_matches_finite_difference() {
        let h = 1e-5;
        for (cdf, _, pdf) in FAMILIES {
            for &z in &[-2.0, -0.5, 0.0, 0.7, 2.5] {
                let numeric = (cdf(z + h) - cdf(z - h)) / (2.0 * h);
                assert!((numeric - pdf(z)).abs() < 1e-7, "z={z}");
            }
        }
    }

    #[test]
    fn known_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-15);
        assert!((normal_quantile(0.975) - 1.959_963_984_540_054).abs() < 1e-12);
        assert!((logistic_quantile(0.5)).abs() < 1e-15);
        assert!((cauchy_cdf(1.0) - 0.75).abs() < 1e-15);
    }

    #[test]
    fn saturated_tails_do_not_panic() {
        for (cdf, _, pdf) in FAMILIES {
            for &z in &[-1e3, 1e3, f64::MAX, -f64::MAX] {
                let p = cdf(z);
                assert!((0.0..=1.0).contains(&p));
                assert!(pdf(z) >= 0.0);
            }
        }
    }
}
