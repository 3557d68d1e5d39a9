//! Name → sigmoid lookup.
//!
//! Names are case-insensitive. A `neg_` prefix selects the decreasing variant of
//! the shape named after it.

use crate::error::{PsignifitError, Result};
use crate::sigmoids::{Sigmoid, SigmoidKind};

const NEGATIVE_PREFIX: &str = "neg_";

/// Base names and the shape each resolves to.
const BASE_NAMES: [(&str, SigmoidKind); 9] = [
    ("norm", SigmoidKind::Gaussian),
    ("gauss", SigmoidKind::Gaussian),
    ("logistic", SigmoidKind::Logistic),
    ("gumbel", SigmoidKind::Gumbel),
    ("rgumbel", SigmoidKind::ReverseGumbel),
    ("weibull", SigmoidKind::Weibull),
    ("tdist", SigmoidKind::Student),
    ("student", SigmoidKind::Student),
    ("heavytail", SigmoidKind::Student),
];

/// Every name accepted by [`sigmoid_by_name`] (in lower case).
pub const ALL_SIGMOID_NAMES: [&str; 18] = [
    "norm",
    "gauss",
    "logistic",
    "gumbel",
    "rgumbel",
    "weibull",
    "tdist",
    "student",
    "heavytail",
    "neg_norm",
    "neg_gauss",
    "neg_logistic",
    "neg_gumbel",
    "neg_rgumbel",
    "neg_weibull",
    "neg_tdist",
    "neg_student",
    "neg_heavytail",
];

/// Resolve a name to its shape and direction without building a sigmoid.
pub fn resolve_name(name: &str) -> Option<(SigmoidKind, bool)> {
    let lower = name.to_lowercase();
    let (base, negative) = match lower.strip_prefix(NEGATIVE_PREFIX) {
        Some(rest) => (rest, true),
        None => (lower.as_str(), false),
    };
    BASE_NAMES
        .iter()
        .find(|(alias, _)| *alias == base)
        .map(|&(_, kind)| (kind, negative))
}

/// Build the sigmoid registered under `name` with the given threshold / width levels.
pub fn sigmoid_by_name(name: &str, pc: f64, alpha: f64) -> Result<Sigmoid> {
    let Some((kind, negative)) = resolve_name(name) else {
        return Err(PsignifitError::config(format!(
            "Invalid sigmoid name \"{name}\", use one of {ALL_SIGMOID_NAMES:?}"
        )));
    };
    Sigmoid::new(kind, pc, alpha, negative)
}

/// [`sigmoid_by_name`] with the default levels `PC = 0.5`, `alpha = 0.05`.
pub fn default_sigmoid_by_name(name: &str) -> Result<Sigmoid> {
    sigmoid_by_name(name, Sigmoid::DEFAULT_PC, Sigmoid::DEFAULT_ALPHA)
}
