//! The fitting configuration.
//!
//! A [`Configuration`] is validated once when it is built ([`Configuration::checked`],
//! [`Configuration::from_dict`]). Validation can canonicalize fields (the
//! experiment type) and fill in derived defaults (grid resolutions). Fields stay
//! public: editing them afterwards is allowed, but the edit is only validated when
//! [`Configuration::check_attributes`] is called again.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::checks;
use crate::domain::{EstimateType, ExperimentType, Parameter};
use crate::error::{PsignifitError, Result};
use crate::sigmoids::{Sigmoid, sigmoid_by_name};

/// Sigmoid option: a registry name or a ready-made sigmoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SigmoidSpec {
    Name(String),
    Instance(Sigmoid),
}

impl Default for SigmoidSpec {
    fn default() -> Self {
        SigmoidSpec::Name("norm".to_string())
    }
}

impl From<&str> for SigmoidSpec {
    fn from(name: &str) -> Self {
        SigmoidSpec::Name(name.to_string())
    }
}

impl From<Sigmoid> for SigmoidSpec {
    fn from(sigmoid: Sigmoid) -> Self {
        SigmoidSpec::Instance(sigmoid)
    }
}

impl fmt::Display for SigmoidSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigmoidSpec::Name(name) => f.write_str(name),
            SigmoidSpec::Instance(sigmoid) => write!(f, "{sigmoid}"),
        }
    }
}

/// A valid but statistically unusual option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub field: &'static str,
    pub message: String,
}

impl ConfigWarning {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// All options of a psychometric fit.
///
/// Serialized field names follow the established option names (`CI_method`,
/// `confP`, `thresh_PC`, ...), so persisted settings stay readable by other tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Strength of the beta prior on the lapse / guess rates.
    pub beta_prior: u32,
    #[serde(rename = "CI_method")]
    pub ci_method: String,
    /// Credible-interval levels, widest first.
    #[serde(rename = "confP")]
    pub conf_p: (f64, f64, f64),
    pub estimate_type: EstimateType,
    /// `yes/no`, `nAFC`, `equal asymptote`, or the `<N>AFC` shorthand
    /// (rewritten to `nAFC` during validation).
    pub experiment_type: String,
    /// Number of alternatives; required for `nAFC`.
    pub experiment_choices: Option<u32>,
    /// Parameters held constant during the fit, keyed by parameter name.
    pub fixed_parameters: Option<BTreeMap<String, f64>>,
    pub max_bound_value: f64,
    pub pool_max_blocks: u32,
    pub sigmoid: SigmoidSpec,
    pub stimulus_range: Option<(f64, f64)>,
    #[serde(rename = "thresh_PC")]
    pub thresh_pc: f64,
    pub verbose: bool,
    pub width_alpha: f64,
    pub width_min: Option<f64>,

    // Derived from the experiment type when not given; explicit entries win.
    pub bounds: Option<BTreeMap<String, (f64, f64)>>,
    pub grid_steps: BTreeMap<String, u32>,
    pub steps_moving_bounds: BTreeMap<String, u32>,
}

/// Raw field defaults. Use [`Configuration::checked`] (or
/// [`Configuration::try_default`]) to obtain a validated configuration.
impl Default for Configuration {
    fn default() -> Self {
        Self {
            beta_prior: 10,
            ci_method: "percentiles".to_string(),
            conf_p: (0.95, 0.9, 0.68),
            estimate_type: EstimateType::Map,
            experiment_type: ExperimentType::YesNo.as_str().to_string(),
            experiment_choices: None,
            fixed_parameters: None,
            max_bound_value: 1e-5,
            pool_max_blocks: 25,
            sigmoid: SigmoidSpec::default(),
            stimulus_range: None,
            thresh_pc: 0.5,
            verbose: true,
            width_alpha: 0.05,
            width_min: None,
            bounds: None,
            grid_steps: BTreeMap::new(),
            steps_moving_bounds: BTreeMap::new(),
        }
    }
}

impl Configuration {
    /// Validated configuration with every option at its default.
    pub fn try_default() -> Result<Self> {
        Configuration::default().checked()
    }

    /// Validate (and complete) this configuration.
    ///
    /// Warnings are logged; use [`Configuration::checked_with_warnings`] to get
    /// them back as values.
    pub fn checked(self) -> Result<Self> {
        self.checked_with_warnings().map(|(config, _)| config)
    }

    pub fn checked_with_warnings(mut self) -> Result<(Self, Vec<ConfigWarning>)> {
        let warnings = self.check_attributes()?;
        Ok((self, warnings))
    }

    /// Run every field validator in declaration order, then the cross-field
    /// experiment-type / fixed-parameter check.
    ///
    /// The first failing validator aborts the pass. Validators may rewrite fields
    /// (experiment type canonicalization, default grid steps), so calling this
    /// twice yields the same configuration as calling it once.
    pub fn check_attributes(&mut self) -> Result<Vec<ConfigWarning>> {
        let warnings = checks::run_all(self)?;
        for warning in &warnings {
            log::warn!("{warning}");
        }
        Ok(warnings)
    }

    /// Rebuild a configuration from a plain mapping, as produced by
    /// [`Configuration::as_dict`]. Missing keys take their defaults.
    pub fn from_dict(dict: Map<String, Value>) -> Result<Self> {
        Configuration::from_dict_with_warnings(dict).map(|(config, _)| config)
    }

    pub fn from_dict_with_warnings(dict: Map<String, Value>) -> Result<(Self, Vec<ConfigWarning>)> {
        checks::check_mapping_shapes(&dict)?;
        let config: Configuration = serde_json::from_value(Value::Object(dict))
            .map_err(|e| PsignifitError::config(format!("Invalid configuration mapping: {e}")))?;
        config.checked_with_warnings()
    }

    /// Every field as a plain mapping.
    pub fn as_dict(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(PsignifitError::config(format!(
                "Configuration serialized to a non-mapping value: {other}"
            ))),
        }
    }

    /// Sigmoid for this configuration, set to its `thresh_PC` and `width_alpha`.
    ///
    /// A configured instance is copied, never modified, so the same sigmoid can
    /// back several configurations.
    pub fn make_sigmoid(&self) -> Result<Sigmoid> {
        match &self.sigmoid {
            SigmoidSpec::Name(name) => sigmoid_by_name(name, self.thresh_pc, self.width_alpha),
            SigmoidSpec::Instance(sigmoid) => sigmoid.with_levels(self.thresh_pc, self.width_alpha),
        }
    }

    /// Parsed experiment type. Always succeeds on a validated configuration.
    pub fn experiment(&self) -> Result<ExperimentType> {
        ExperimentType::from_name(&self.experiment_type).ok_or_else(|| {
            PsignifitError::config(format!(
                "Experiment type \"{}\" is not canonical; run check_attributes first",
                self.experiment_type
            ))
        })
    }

    /// Fixed parameter values the inference engine has to use.
    ///
    /// - `nAFC`: gamma is always `1 / experiment_choices`, whatever was fixed.
    /// - `equal asymptote`: a single fixed gamma or lambda also fixes the other.
    pub fn effective_fixed_parameters(&self) -> Result<BTreeMap<Parameter, f64>> {
        let mut fixed = BTreeMap::new();
        for (name, &value) in self.fixed_parameters.iter().flatten() {
            let parameter: Parameter = name.parse().map_err(PsignifitError::config)?;
            fixed.insert(parameter, value);
        }

        match self.experiment()? {
            ExperimentType::NAfc => {
                let choices = self.experiment_choices.ok_or_else(|| {
                    PsignifitError::config("nAFC experiments need experiment_choices")
                })?;
                fixed.insert(Parameter::Gamma, 1.0 / f64::from(choices));
            }
            ExperimentType::EqualAsymptote => {
                let gamma = fixed.get(&Parameter::Gamma).copied();
                let lambda = fixed.get(&Parameter::Lambda).copied();
                match (gamma, lambda) {
                    (Some(g), None) => {
                        fixed.insert(Parameter::Lambda, g);
                    }
                    (None, Some(l)) => {
                        fixed.insert(Parameter::Gamma, l);
                    }
                    _ => {}
                }
            }
            ExperimentType::YesNo => {}
        }
        Ok(fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigmoids::SigmoidKind;

    fn fixed(pairs: &[(&str, f64)]) -> Option<BTreeMap<String, f64>> {
        Some(pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect())
    }

    #[test]
    fn defaults_are_valid() {
        let config = Configuration::try_default().unwrap();
        assert_eq!(config.experiment_type, "yes/no");
        assert_eq!(config.grid_steps["gamma"], 20);
        assert_eq!(config.grid_steps["threshold"], 40);
        assert_eq!(config.steps_moving_bounds["width"], 30);
    }

    #[test]
    fn n_afc_shorthand_is_canonicalized() {
        let config = Configuration {
            experiment_type: "2AFC".to_string(),
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        assert_eq!(config.experiment_choices, Some(2));
        assert_eq!(config.experiment_type, "nAFC");
        assert_eq!(config.grid_steps["gamma"], 1);
        assert_eq!(config.steps_moving_bounds["gamma"], 1);
        assert_eq!(config.steps_moving_bounds["threshold"], 30);
    }

    #[test]
    fn fixed_guess_and_lapse_below_one_pass_silently() {
        let (_, warnings) = Configuration {
            fixed_parameters: fixed(&[("gamma", 0.1), ("lambda", 0.05)]),
            ..Configuration::default()
        }
        .checked_with_warnings()
        .unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
    }

    #[test]
    fn fixed_guess_and_lapse_summing_past_one_fail() {
        let err = Configuration {
            fixed_parameters: fixed(&[("gamma", 0.5), ("lambda", 0.6)]),
            ..Configuration::default()
        }
        .checked()
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("gamma + lambda"));
    }

    #[test]
    fn equal_asymptote_requires_equal_fixed_rates() {
        let err = Configuration {
            experiment_type: "EQ_ASYMPTOTE".to_string(),
            fixed_parameters: fixed(&[("gamma", 0.1), ("lambda", 0.2)]),
            ..Configuration::default()
        }
        .checked()
        .unwrap_err();
        assert!(err.is_configuration());

        let ok = Configuration {
            experiment_type: "equal asymptote".to_string(),
            fixed_parameters: fixed(&[("gamma", 0.1), ("lambda", 0.1)]),
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        assert_eq!(ok.grid_steps["gamma"], 1);
    }

    #[test]
    fn fixed_gamma_under_n_afc_is_overridden_with_warning() {
        let (config, warnings) = Configuration {
            experiment_type: "4AFC".to_string(),
            fixed_parameters: fixed(&[("gamma", 0.3)]),
            ..Configuration::default()
        }
        .checked_with_warnings()
        .unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("Ignoring fixed gamma"));

        let effective = config.effective_fixed_parameters().unwrap();
        assert_eq!(effective[&Parameter::Gamma], 0.25);
    }

    #[test]
    fn equal_asymptote_mirrors_a_single_fixed_rate() {
        let config = Configuration {
            experiment_type: "equal asymptote".to_string(),
            fixed_parameters: fixed(&[("lambda", 0.02)]),
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        let effective = config.effective_fixed_parameters().unwrap();
        assert_eq!(effective[&Parameter::Gamma], 0.02);
        assert_eq!(effective[&Parameter::Lambda], 0.02);
    }

    #[test]
    fn high_rates_warn_without_failing() {
        let (_, warnings) = Configuration {
            fixed_parameters: fixed(&[("gamma", 0.3), ("lambda", 0.25)]),
            ..Configuration::default()
        }
        .checked_with_warnings()
        .unwrap();
        let fields: Vec<&str> = warnings.iter().map(|w| w.field).collect();
        assert_eq!(warnings.len(), 2, "{warnings:?}");
        assert!(fields.contains(&"fixed_parameters"));
        assert!(fields.contains(&"experiment_type"));
    }

    #[test]
    fn partial_grid_steps_are_merged_over_defaults() {
        let config = Configuration {
            experiment_type: "3AFC".to_string(),
            grid_steps: [("threshold".to_string(), 11)].into_iter().collect(),
            steps_moving_bounds: [("eta".to_string(), 5)].into_iter().collect(),
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        assert_eq!(config.grid_steps["threshold"], 11);
        assert_eq!(config.grid_steps["width"], 40);
        assert_eq!(config.grid_steps["gamma"], 1);
        assert_eq!(config.steps_moving_bounds["eta"], 5);
        assert_eq!(config.steps_moving_bounds["width"], 40);
    }

    #[test]
    fn check_attributes_is_idempotent() {
        let mut config = Configuration {
            experiment_type: "2AFC".to_string(),
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        let before = config.clone();
        config.check_attributes().unwrap();
        assert_eq!(config, before);
    }

    #[test]
    fn edits_are_only_validated_on_request() {
        let mut config = Configuration::try_default().unwrap();
        config.width_alpha = 1.5;
        assert!(config.check_attributes().is_err());
    }

    #[test]
    fn first_failing_validator_wins() {
        let err = Configuration {
            ci_method: "bootstrap".to_string(),
            width_alpha: 2.0,
            ..Configuration::default()
        }
        .checked()
        .unwrap_err();
        assert!(err.to_string().contains("CI method"), "{err}");
    }

    #[test]
    fn make_sigmoid_uses_configured_levels() {
        let config = Configuration {
            sigmoid: "neg_logistic".into(),
            thresh_pc: 0.75,
            width_alpha: 0.1,
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        let sigmoid = config.make_sigmoid().unwrap();
        assert_eq!(sigmoid.kind(), SigmoidKind::Logistic);
        assert!(sigmoid.negative());
        assert_eq!(sigmoid.pc(), 0.75);
        assert_eq!(sigmoid.alpha(), 0.1);
    }

    #[test]
    fn configured_instance_is_copied_not_shared() {
        let original = Sigmoid::new(SigmoidKind::Gumbel, 0.5, 0.05, false).unwrap();
        let config = Configuration {
            sigmoid: original.into(),
            thresh_pc: 0.6,
            width_alpha: 0.2,
            ..Configuration::default()
        }
        .checked()
        .unwrap();
        let made = config.make_sigmoid().unwrap();
        assert_eq!(made.pc(), 0.6);
        assert_eq!(made.alpha(), 0.2);
        assert_eq!(original.pc(), 0.5);
        assert_eq!(config.sigmoid, SigmoidSpec::Instance(original));
    }

    #[test]
    fn invalid_sigmoid_name_is_a_configuration_error() {
        let err = Configuration {
            sigmoid: "bogus".into(),
            ..Configuration::default()
        }
        .checked()
        .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("neg_heavytail"));
    }

    #[test]
    fn dict_round_trip() {
        let config = Configuration {
            experiment_type: "3AFC".to_string(),
            fixed_parameters: fixed(&[("lambda", 0.01), ("eta", 0.0)]),
            bounds: Some([("threshold".to_string(), (0.0, 1.0))].into_iter().collect()),
            stimulus_range: Some((0.0, 2.0)),
            conf_p: (0.99, 0.9, 0.5),
            sigmoid: Sigmoid::new(SigmoidKind::Student, 0.4, 0.1, true).unwrap().into(),
            ..Configuration::default()
        }
        .checked()
        .unwrap();

        let dict = config.as_dict().unwrap();
        assert_eq!(dict["confP"], serde_json::json!([0.99, 0.9, 0.5]));
        assert_eq!(dict["experiment_type"], "nAFC");
        assert!(dict.contains_key("thresh_PC"));

        let back = Configuration::from_dict(dict).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn from_dict_fills_missing_keys_with_defaults() {
        let dict = serde_json::json!({"experiment_type": "2AFC", "sigmoid": "weibull"});
        let Value::Object(map) = dict else { unreachable!() };
        let config = Configuration::from_dict(map).unwrap();
        assert_eq!(config.experiment_choices, Some(2));
        assert_eq!(config.ci_method, "percentiles");
        assert_eq!(config.make_sigmoid().unwrap().kind(), SigmoidKind::Weibull);
    }

    #[test]
    fn from_dict_rejects_non_mapping_fixed_parameters() {
        let dict = serde_json::json!({"fixed_parameters": [["gamma", 0.1]]});
        let Value::Object(map) = dict else { unreachable!() };
        let err = Configuration::from_dict(map).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("fixed_parameters must be a dictionary"), "{err}");
    }

    #[test]
    fn from_dict_requires_three_credible_levels() {
        let dict = serde_json::json!({"confP": [0.95, 0.9]});
        let Value::Object(map) = dict else { unreachable!() };
        let err = Configuration::from_dict(map).unwrap_err();
        assert!(err.to_string().contains("confP"), "{err}");
    }

    #[test]
    fn from_dict_rejects_bound_triples() {
        let dict = serde_json::json!({"bounds": {"width": [0.1, 0.5, 0.9]}});
        let Value::Object(map) = dict else { unreachable!() };
        let err = Configuration::from_dict(map).unwrap_err();
        assert!(err.to_string().contains("sequence of 2 items"), "{err}");
    }
}
