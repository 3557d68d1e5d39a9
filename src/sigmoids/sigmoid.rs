//! Sigmoid evaluation in the threshold / width parameterization.
//!
//! A sigmoid is a location/scale family `F((x - loc) / scale)` (see
//! [`crate::math::standard`]), but callers never see `loc` and `scale`. They pass:
//!
//! - `threshold`: the stimulus level where the curve equals `PC`
//!   (`1 - PC` for a negative sigmoid)
//! - `width`: the distance between the stimulus levels where the curve equals
//!   `alpha` and `1 - alpha`
//!
//! which convert exactly to the native parameters:
//!
//! ```text
//! scale = width / (F⁻¹(1 - alpha) - F⁻¹(alpha))
//! loc   = threshold - F⁻¹(PC) * scale
//! ```
//!
//! Evaluation works on the standardized value `z = (x - threshold) / scale + F⁻¹(PC)`
//! so forward and inverse are algebraic mirrors of each other.
//!
//! All shapes live on a linear stimulus axis and accept every real stimulus level.
//! `Weibull` is the Gumbel shape on that axis; a classical Weibull fit is obtained by
//! passing log-transformed stimulus levels.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PsignifitError, Result};
use crate::math::standard as std_form;

/// Shape family of a sigmoid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigmoidKind {
    Gaussian,
    Logistic,
    Gumbel,
    ReverseGumbel,
    Weibull,
    Student,
}

impl SigmoidKind {
    pub const ALL: [SigmoidKind; 6] = [
        SigmoidKind::Gaussian,
        SigmoidKind::Logistic,
        SigmoidKind::Gumbel,
        SigmoidKind::ReverseGumbel,
        SigmoidKind::Weibull,
        SigmoidKind::Student,
    ];

    /// Primary registry name (without the `neg_` prefix).
    pub fn canonical_name(self) -> &'static str {
        match self {
            SigmoidKind::Gaussian => "norm",
            SigmoidKind::Logistic => "logistic",
            SigmoidKind::Gumbel => "gumbel",
            SigmoidKind::ReverseGumbel => "rgumbel",
            SigmoidKind::Weibull => "weibull",
            SigmoidKind::Student => "tdist",
        }
    }

    pub fn cdf(self, z: f64) -> f64 {
        match self {
            SigmoidKind::Gaussian => std_form::normal_cdf(z),
            SigmoidKind::Logistic => std_form::logistic_cdf(z),
            SigmoidKind::Gumbel | SigmoidKind::Weibull => std_form::gumbel_cdf(z),
            SigmoidKind::ReverseGumbel => std_form::reverse_gumbel_cdf(z),
            SigmoidKind::Student => std_form::cauchy_cdf(z),
        }
    }

    pub fn quantile(self, p: f64) -> f64 {
        match self {
            SigmoidKind::Gaussian => std_form::normal_quantile(p),
            SigmoidKind::Logistic => std_form::logistic_quantile(p),
            SigmoidKind::Gumbel | SigmoidKind::Weibull => std_form::gumbel_quantile(p),
            SigmoidKind::ReverseGumbel => std_form::reverse_gumbel_quantile(p),
            SigmoidKind::Student => std_form::cauchy_quantile(p),
        }
    }

    pub fn density(self, z: f64) -> f64 {
        match self {
            SigmoidKind::Gaussian => std_form::normal_pdf(z),
            SigmoidKind::Logistic => std_form::logistic_pdf(z),
            SigmoidKind::Gumbel | SigmoidKind::Weibull => std_form::gumbel_pdf(z),
            SigmoidKind::ReverseGumbel => std_form::reverse_gumbel_pdf(z),
            SigmoidKind::Student => std_form::cauchy_pdf(z),
        }
    }
}

/// A sigmoid shape configured with its threshold level `PC` and width level `alpha`.
///
/// Values are cheap to copy; a configuration hands out a fresh one per request
/// instead of sharing a mutable instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSigmoid")]
pub struct Sigmoid {
    kind: SigmoidKind,
    #[serde(rename = "PC")]
    pc: f64,
    alpha: f64,
    negative: bool,
}

#[derive(Deserialize)]
struct RawSigmoid {
    kind: SigmoidKind,
    #[serde(rename = "PC")]
    pc: f64,
    alpha: f64,
    #[serde(default)]
    negative: bool,
}

impl TryFrom<RawSigmoid> for Sigmoid {
    type Error = PsignifitError;

    fn try_from(raw: RawSigmoid) -> Result<Self> {
        Sigmoid::new(raw.kind, raw.pc, raw.alpha, raw.negative)
    }
}

impl Sigmoid {
    pub const DEFAULT_PC: f64 = 0.5;
    pub const DEFAULT_ALPHA: f64 = 0.05;

    /// Build a sigmoid.
    ///
    /// `pc` must lie in `(0, 1)`; `alpha` in `(0, 1)` but not `0.5`, where the
    /// alpha and `1 - alpha` levels coincide and no width can be defined.
    pub fn new(kind: SigmoidKind, pc: f64, alpha: f64, negative: bool) -> Result<Self> {
        if !(pc > 0.0 && pc < 1.0) {
            return Err(PsignifitError::config(format!(
                "Sigmoid PC must be strictly between 0 and 1 ({pc} given)!"
            )));
        }
        if !(alpha > 0.0 && alpha < 1.0) || alpha == 0.5 {
            return Err(PsignifitError::config(format!(
                "Sigmoid alpha must be strictly between 0 and 1 and differ from 0.5 ({alpha} given)!"
            )));
        }
        Ok(Self {
            kind,
            pc,
            alpha,
            negative,
        })
    }

    pub fn kind(&self) -> SigmoidKind {
        self.kind
    }

    pub fn pc(&self) -> f64 {
        self.pc
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Decreasing variant.
    pub fn negative(&self) -> bool {
        self.negative
    }

    /// Registry name, e.g. `norm` or `neg_gumbel`.
    pub fn name(&self) -> String {
        if self.negative {
            format!("neg_{}", self.kind.canonical_name())
        } else {
            self.kind.canonical_name().to_string()
        }
    }

    /// Same shape with different threshold / width levels.
    pub fn with_levels(&self, pc: f64, alpha: f64) -> Result<Self> {
        Sigmoid::new(self.kind, pc, alpha, self.negative)
    }

    /// Native `(location, scale)` for a threshold / width pair.
    pub fn native_parameters(&self, threshold: f64, width: f64) -> (f64, f64) {
        let scale = self.scale(width);
        (threshold - self.kind.quantile(self.pc) * scale, scale)
    }

    fn scale(&self, width: f64) -> f64 {
        let span = self.kind.quantile(1.0 - self.alpha) - self.kind.quantile(self.alpha);
        width / span
    }

    fn standardize(&self, stimulus_level: f64, threshold: f64, width: f64) -> f64 {
        (stimulus_level - threshold) / self.scale(width) + self.kind.quantile(self.pc)
    }

    /// Unscaled curve value in `[0, 1]`.
    pub fn forward(&self, stimulus_level: f64, threshold: f64, width: f64) -> f64 {
        let value = self.kind.cdf(self.standardize(stimulus_level, threshold, width));
        if self.negative { 1.0 - value } else { value }
    }

    /// Guess/lapse adjusted curve `gamma + (1 - gamma - lambda) * forward(x)`.
    pub fn psychometric(
        &self,
        stimulus_level: f64,
        threshold: f64,
        width: f64,
        gamma: f64,
        lambda: f64,
    ) -> f64 {
        gamma + (1.0 - gamma - lambda) * self.forward(stimulus_level, threshold, width)
    }

    /// Exact inverse of [`Sigmoid::forward`].
    ///
    /// Proportions of exactly 0 or 1 map to infinite stimulus levels.
    pub fn inverse(&self, proportion: f64, threshold: f64, width: f64) -> f64 {
        let p = if self.negative { 1.0 - proportion } else { proportion };
        threshold + (self.kind.quantile(p) - self.kind.quantile(self.pc)) * self.scale(width)
    }

    /// Inverse of [`Sigmoid::psychometric`].
    pub fn inverse_scaled(
        &self,
        proportion: f64,
        threshold: f64,
        width: f64,
        gamma: f64,
        lambda: f64,
    ) -> f64 {
        let unscaled = (proportion - gamma) / (1.0 - gamma - lambda);
        self.inverse(unscaled, threshold, width)
    }

    /// Derivative of [`Sigmoid::psychometric`] with respect to the stimulus level.
    pub fn slope(&self, stimulus_level: f64, threshold: f64, width: f64, gamma: f64, lambda: f64) -> f64 {
        let scale = self.scale(width);
        let z = (stimulus_level - threshold) / scale + self.kind.quantile(self.pc);
        let value = (1.0 - gamma - lambda) * self.kind.density(z) / scale;
        if self.negative { -value } else { value }
    }

    pub fn forward_many(&self, stimulus_levels: &[f64], threshold: f64, width: f64) -> Vec<f64> {
        stimulus_levels
            .iter()
            .map(|&x| self.forward(x, threshold, width))
            .collect()
    }

    pub fn psychometric_many(
        &self,
        stimulus_levels: &[f64],
        threshold: f64,
        width: f64,
        gamma: f64,
        lambda: f64,
    ) -> Vec<f64> {
        stimulus_levels
            .iter()
            .map(|&x| self.psychometric(x, threshold, width, gamma, lambda))
            .collect()
    }

    pub fn slope_many(
        &self,
        stimulus_levels: &[f64],
        threshold: f64,
        width: f64,
        gamma: f64,
        lambda: f64,
    ) -> Vec<f64> {
        stimulus_levels
            .iter()
            .map(|&x| self.slope(x, threshold, width, gamma, lambda))
            .collect()
    }
}

impl fmt::Display for Sigmoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (PC={}, alpha={})", self.name(), self.pc, self.alpha)
    }
}
