//! Shared domain types.
//!
//! These are the vocabulary both halves of the crate speak: parameter names used
//! as keys in bounds / fixed-parameter / grid mappings, and the enumerated option
//! values of a configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Free parameters of a psychometric function.
///
/// The order of [`Parameter::ALL`] is the order used for grids and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Parameter {
    Threshold,
    Width,
    Lambda,
    Gamma,
    Eta,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::Threshold,
        Parameter::Width,
        Parameter::Lambda,
        Parameter::Gamma,
        Parameter::Eta,
    ];

    /// Key used in configuration mappings.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Threshold => "threshold",
            Parameter::Width => "width",
            Parameter::Lambda => "lambda",
            Parameter::Gamma => "gamma",
            Parameter::Eta => "eta",
        }
    }

    /// `{threshold, width, lambda, gamma, eta}`, for error messages.
    pub fn valid_names() -> String {
        let names: Vec<&str> = Parameter::ALL.iter().map(|p| p.name()).collect();
        format!("{{{}}}", names.join(", "))
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Parameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown parameter {s:?}, expected one of {}", Parameter::valid_names()))
    }
}

/// Experiment design.
///
/// Stored in a configuration by its canonical value (`yes/no`, `nAFC`,
/// `equal asymptote`); the number of alternatives of an N-AFC design lives in a
/// separate option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentType {
    YesNo,
    NAfc,
    EqualAsymptote,
}

impl ExperimentType {
    pub const ALL: [ExperimentType; 3] = [
        ExperimentType::YesNo,
        ExperimentType::NAfc,
        ExperimentType::EqualAsymptote,
    ];

    /// Canonical value stored in the configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            ExperimentType::YesNo => "yes/no",
            ExperimentType::NAfc => "nAFC",
            ExperimentType::EqualAsymptote => "equal asymptote",
        }
    }

    /// Upper-case tag spelling, accepted as an alias on input.
    pub fn tag(self) -> &'static str {
        match self {
            ExperimentType::YesNo => "YES_NO",
            ExperimentType::NAfc => "N_AFC",
            ExperimentType::EqualAsymptote => "EQ_ASYMPTOTE",
        }
    }

    /// Whether the guess rate is pinned by the design rather than fitted.
    pub fn is_forced_choice(self) -> bool {
        !matches!(self, ExperimentType::YesNo)
    }

    /// Resolve a canonical value or tag alias. `<N>AFC` is handled by
    /// [`parse_n_afc`].
    pub fn from_name(value: &str) -> Option<Self> {
        ExperimentType::ALL
            .into_iter()
            .find(|t| t.as_str() == value || t.tag() == value)
    }
}

impl fmt::Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parse the `<N>AFC` shorthand (`2AFC`, `4AFC`, ...) into its choice count.
pub fn parse_n_afc(value: &str) -> Option<u32> {
    let digits = value.strip_suffix("AFC")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// How credible intervals are derived from the posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiMethod {
    Percentiles,
    Project,
}

impl CiMethod {
    pub const ALL: [CiMethod; 2] = [CiMethod::Percentiles, CiMethod::Project];

    pub fn as_str(self) -> &'static str {
        match self {
            CiMethod::Percentiles => "percentiles",
            CiMethod::Project => "project",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        CiMethod::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

/// Which point estimate the inference engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EstimateType {
    #[default]
    #[serde(rename = "MAP")]
    Map,
    #[serde(rename = "mean")]
    Mean,
}

impl EstimateType {
    pub fn as_str(self) -> &'static str {
        match self {
            EstimateType::Map => "MAP",
            EstimateType::Mean => "mean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_names_round_trip() {
        for p in Parameter::ALL {
            assert_eq!(p.name().parse::<Parameter>().unwrap(), p);
        }
        assert!("alpha".parse::<Parameter>().is_err());
    }

    #[test]
    fn n_afc_shorthand() {
        assert_eq!(parse_n_afc("2AFC"), Some(2));
        assert_eq!(parse_n_afc("12AFC"), Some(12));
        assert_eq!(parse_n_afc("AFC"), None);
        assert_eq!(parse_n_afc("nAFC"), None);
        assert_eq!(parse_n_afc("2AFCx"), None);
    }

    #[test]
    fn experiment_type_accepts_tags() {
        assert_eq!(
            ExperimentType::from_name("EQ_ASYMPTOTE"),
            Some(ExperimentType::EqualAsymptote)
        );
        assert_eq!(ExperimentType::from_name("yes/no"), Some(ExperimentType::YesNo));
        assert_eq!(ExperimentType::from_name("maybe"), None);
    }
}
