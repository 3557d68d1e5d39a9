//! Option validators.
//!
//! Each configuration field may have one validator, registered in [`VALIDATORS`]
//! under the field's serialized name. [`run_all`] walks [`FIELD_NAMES`] in
//! declaration order, runs the validator registered for each field (fields without
//! one are accepted as they are), and finishes with the cross-field check of fixed
//! parameters against the experiment type.
//!
//! A validator either fails with a configuration error, which aborts the pass, or
//! records a [`ConfigWarning`] and lets the pass continue.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::config::{ConfigWarning, Configuration, SigmoidSpec};
use crate::domain::{CiMethod, ExperimentType, Parameter, parse_n_afc};
use crate::error::{PsignifitError, Result};
use crate::sigmoids::default_sigmoid_by_name;

type Check = fn(&mut Configuration, &mut Vec<ConfigWarning>) -> Result<()>;

/// Serialized field names in declaration order.
pub const FIELD_NAMES: [&str; 18] = [
    "beta_prior",
    "CI_method",
    "confP",
    "estimate_type",
    "experiment_type",
    "experiment_choices",
    "fixed_parameters",
    "max_bound_value",
    "pool_max_blocks",
    "sigmoid",
    "stimulus_range",
    "thresh_PC",
    "verbose",
    "width_alpha",
    "width_min",
    "bounds",
    "grid_steps",
    "steps_moving_bounds",
];

const VALIDATORS: [(&str, Check); 16] = [
    ("beta_prior", check_beta_prior),
    ("CI_method", check_ci_method),
    ("confP", check_conf_p),
    ("experiment_type", check_experiment_type),
    ("experiment_choices", check_experiment_choices),
    ("fixed_parameters", check_fixed_parameters),
    ("max_bound_value", check_max_bound_value),
    ("pool_max_blocks", check_pool_max_blocks),
    ("sigmoid", check_sigmoid),
    ("stimulus_range", check_stimulus_range),
    ("thresh_PC", check_thresh_pc),
    ("width_alpha", check_width_alpha),
    ("width_min", check_width_min),
    ("bounds", check_bounds),
    ("grid_steps", check_grid_steps),
    ("steps_moving_bounds", check_steps_moving_bounds),
];

/// Lapse or guess rates above this are legal but rarely seen with human observers.
const UNUSUAL_RATE: f64 = 0.2;

pub fn validator_for(field: &str) -> Option<Check> {
    VALIDATORS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|&(_, check)| check)
}

pub fn run_all(config: &mut Configuration) -> Result<Vec<ConfigWarning>> {
    let mut warnings = Vec::new();
    for field in FIELD_NAMES {
        if let Some(check) = validator_for(field) {
            check(config, &mut warnings)?;
        }
    }
    check_experiment_type_matches_fixed_parameters(config, &mut warnings)?;
    Ok(warnings)
}

fn check_beta_prior(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    if config.beta_prior == 0 {
        return Err(PsignifitError::config("Option beta_prior must be a positive integer (0 given)!"));
    }
    Ok(())
}

fn check_ci_method(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    if CiMethod::from_name(&config.ci_method).is_none() {
        let supported: Vec<&str> = CiMethod::ALL.iter().map(|m| m.as_str()).collect();
        return Err(PsignifitError::config(format!(
            "CI method {} unknown. Supported methods: {supported:?}.",
            config.ci_method
        )));
    }
    Ok(())
}

fn check_conf_p(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    let (a, b, c) = config.conf_p;
    for level in [a, b, c] {
        if !(level > 0.0 && level < 1.0) {
            return Err(PsignifitError::config(format!(
                "Option confP levels must be strictly between 0 and 1 ({level} given)!"
            )));
        }
    }
    Ok(())
}

fn default_grid_steps(experiment: ExperimentType) -> BTreeMap<String, u32> {
    let gamma = if experiment.is_forced_choice() { 1 } else { 20 };
    steps_map([("threshold", 40), ("width", 40), ("lambda", 20), ("gamma", gamma), ("eta", 20)])
}

fn default_steps_moving_bounds(experiment: ExperimentType) -> BTreeMap<String, u32> {
    if experiment.is_forced_choice() {
        steps_map([("threshold", 30), ("width", 40), ("lambda", 10), ("gamma", 1), ("eta", 20)])
    } else {
        steps_map([("threshold", 25), ("width", 30), ("lambda", 10), ("gamma", 10), ("eta", 15)])
    }
}

fn steps_map(entries: [(&str, u32); 5]) -> BTreeMap<String, u32> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Explicit entries of `given` override `defaults`.
fn merge_steps(mut defaults: BTreeMap<String, u32>, given: &BTreeMap<String, u32>) -> BTreeMap<String, u32> {
    defaults.extend(given.iter().map(|(k, &v)| (k.clone(), v)));
    defaults
}

/// Canonicalize the experiment type and derive default grid resolutions.
fn check_experiment_type(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    let experiment = if let Some(choices) = parse_n_afc(&config.experiment_type) {
        log::debug!(
            "experiment type {} read as nAFC with {choices} choices",
            config.experiment_type
        );
        config.experiment_choices = Some(choices);
        ExperimentType::NAfc
    } else if let Some(experiment) = ExperimentType::from_name(&config.experiment_type) {
        experiment
    } else {
        let valid: Vec<&str> = ExperimentType::ALL.iter().map(|t| t.as_str()).collect();
        return Err(PsignifitError::config(format!(
            "Invalid experiment type: \"{}\"\nValid types: {valid:?}, or \"2AFC\", \"3AFC\", etc...",
            config.experiment_type
        )));
    };
    config.experiment_type = experiment.as_str().to_string();

    if experiment == ExperimentType::NAfc && config.experiment_choices.is_none() {
        return Err(PsignifitError::config(
            "For nAFC experiments, expects 'experiment_choices' to be a number, got None.\n\
             Can be specified in the experiment type, e.g. 2AFC, 3AFC, … .",
        ));
    }

    config.grid_steps = merge_steps(default_grid_steps(experiment), &config.grid_steps);
    config.steps_moving_bounds = merge_steps(default_steps_moving_bounds(experiment), &config.steps_moving_bounds);
    log::debug!("grid steps for {experiment}: {:?}", config.grid_steps);
    Ok(())
}

fn check_experiment_choices(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    match config.experiment_choices {
        Some(n) if n < 2 => Err(PsignifitError::config(format!(
            "Option experiment_choices must be at least 2 ({n} given)!"
        ))),
        _ => Ok(()),
    }
}

fn check_parameter_keys<'a>(option: &str, keys: impl IntoIterator<Item = &'a String>) -> Result<()> {
    let keys: Vec<&String> = keys.into_iter().collect();
    if keys.iter().any(|k| k.parse::<Parameter>().is_err()) {
        return Err(PsignifitError::config(format!(
            "Option {option} keys must be in {}. Given {keys:?}!",
            Parameter::valid_names()
        )));
    }
    Ok(())
}

fn check_fixed_parameters(config: &mut Configuration, warnings: &mut Vec<ConfigWarning>) -> Result<()> {
    let Some(fixed) = &config.fixed_parameters else {
        return Ok(());
    };
    check_parameter_keys("fixed_parameters", fixed.keys())?;

    for (name, &value) in fixed {
        let prefix = format!("Fixed parameter {name} must be strictly");
        let suffix = format!(": got {name}={value} instead!");
        if !value.is_finite() {
            return Err(PsignifitError::config(format!("{prefix} finite {suffix}")));
        }
        match name.as_str() {
            "width" if value <= 0.0 => {
                return Err(PsignifitError::config(format!("{prefix} > 0 {suffix}")));
            }
            "eta" if !(0.0..=1.0).contains(&value) => {
                return Err(PsignifitError::config(format!("{prefix} 0 <= eta <= 1 {suffix}")));
            }
            "gamma" | "lambda" if !(0.0..1.0).contains(&value) => {
                return Err(PsignifitError::config(format!("{prefix} 0 <= {name} < 1 {suffix}")));
            }
            _ => {}
        }
        if name == "lambda" && value > UNUSUAL_RATE {
            warnings.push(ConfigWarning::new(
                "fixed_parameters",
                format!(
                    "You have fixed the lapse rate lambda to an unusually high value ({value}). \
                     In typical psychophysical experiments lambda is rarely above 0.2 for human observers."
                ),
            ));
        }
    }

    if let (Some(&gamma), Some(&lambda)) = (fixed.get("gamma"), fixed.get("lambda")) {
        if !(0.0..1.0).contains(&(gamma + lambda)) {
            return Err(PsignifitError::config(format!(
                "For gamma and lambda the condition 0 <= gamma + lambda < 1 must always apply: \
                 got gamma={gamma}, lambda={lambda} instead!"
            )));
        }
    }
    Ok(())
}

fn check_max_bound_value(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    let value = config.max_bound_value;
    if !(value.is_finite() && value > 0.0) {
        return Err(PsignifitError::config(format!(
            "Option max_bound_value must be a positive number ({value} given)!"
        )));
    }
    Ok(())
}

fn check_pool_max_blocks(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    if config.pool_max_blocks == 0 {
        return Err(PsignifitError::config("Option pool_max_blocks must be a positive integer (0 given)!"));
    }
    Ok(())
}

/// Build the named shape once so a bad name fails here, not during the fit.
///
/// Default levels are used; `thresh_PC` and `width_alpha` have their own
/// validators. A configured instance was validated when it was made.
fn check_sigmoid(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    match &config.sigmoid {
        SigmoidSpec::Name(name) => default_sigmoid_by_name(name).map(|_| ()),
        SigmoidSpec::Instance(_) => Ok(()),
    }
}

fn check_stimulus_range(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    if let Some((low, high)) = config.stimulus_range {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(PsignifitError::config(format!(
                "Option stimulus range must be a finite increasing pair ({low}, {high} given)!"
            )));
        }
    }
    Ok(())
}

fn check_thresh_pc(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    let value = config.thresh_pc;
    if !(value > 0.0 && value < 1.0) {
        return Err(PsignifitError::config(format!(
            "Option thresh_PC must be between 0 and 1 ({value} given)!"
        )));
    }
    Ok(())
}

fn check_width_alpha(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    let value = config.width_alpha;
    if !(value > 0.0 && value < 1.0) {
        return Err(PsignifitError::config(format!(
            "Option width_alpha must be between 0 and 1 ({value} given)!"
        )));
    }
    if value == 0.5 {
        return Err(PsignifitError::config(
            "Option width_alpha must differ from 0.5: the width between alpha and 1 - alpha is undefined!",
        ));
    }
    Ok(())
}

fn check_width_min(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    if let Some(value) = config.width_min {
        if !(value.is_finite() && value > 0.0) {
            return Err(PsignifitError::config(format!(
                "Option width_min must be a positive number ({value} given)!"
            )));
        }
    }
    Ok(())
}

fn check_bounds(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    let Some(bounds) = &config.bounds else {
        return Ok(());
    };
    check_parameter_keys("bounds", bounds.keys())?;
    for (name, &(low, high)) in bounds {
        if !(low.is_finite() && high.is_finite() && low <= high) {
            return Err(PsignifitError::config(format!(
                "Bounds for {name} must be finite with low <= high: ({low}, {high}) given!"
            )));
        }
    }
    Ok(())
}

fn check_steps(option: &str, steps: &BTreeMap<String, u32>) -> Result<()> {
    check_parameter_keys(option, steps.keys())?;
    if let Some((name, _)) = steps.iter().find(|(_, n)| **n == 0) {
        return Err(PsignifitError::config(format!(
            "Option {option} must give at least one step per parameter (0 given for {name})!"
        )));
    }
    Ok(())
}

fn check_grid_steps(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    check_steps("grid_steps", &config.grid_steps)
}

fn check_steps_moving_bounds(config: &mut Configuration, _: &mut Vec<ConfigWarning>) -> Result<()> {
    check_steps("steps_moving_bounds", &config.steps_moving_bounds)
}

/// Cross-field check, always run after the per-field validators.
fn check_experiment_type_matches_fixed_parameters(
    config: &mut Configuration,
    warnings: &mut Vec<ConfigWarning>,
) -> Result<()> {
    let Some(fixed) = &config.fixed_parameters else {
        return Ok(());
    };
    let gamma = fixed.get("gamma").copied();
    let lambda = fixed.get("lambda").copied();

    match ExperimentType::from_name(&config.experiment_type) {
        Some(ExperimentType::NAfc) => {
            if let (Some(lambda), Some(choices)) = (lambda, config.experiment_choices) {
                let guess = 1.0 / f64::from(choices);
                if guess + lambda >= 1.0 {
                    return Err(PsignifitError::config(format!(
                        "The lapse rate lambda was fixed to {lambda}, but with {choices} choices gamma is \
                         fixed to {guess}. The condition gamma + lambda < 1 must always apply."
                    )));
                }
            }
            if let Some(gamma) = gamma {
                warnings.push(ConfigWarning::new(
                    "experiment_type",
                    format!(
                        "The parameter gamma was fixed to {gamma}. In nAFC experiments gamma is \
                         automatically fixed to 1/n. Ignoring fixed gamma."
                    ),
                ));
            }
        }
        Some(ExperimentType::EqualAsymptote) => match (gamma, lambda) {
            (Some(gamma), Some(lambda)) if gamma != lambda => {
                return Err(PsignifitError::config(format!(
                    "The parameters lambda {lambda} and gamma {gamma} were fixed to different values. \
                     In equal asymptote experiments gamma and lambda need to be equal."
                )));
            }
            // A single fixed rate is mirrored onto the other one.
            (Some(rate), None) | (None, Some(rate)) if rate >= 0.5 => {
                return Err(PsignifitError::config(format!(
                    "In equal asymptote experiments gamma and lambda are equal, so a fixed rate of {rate} \
                     breaks gamma + lambda < 1. Fix it below 0.5."
                )));
            }
            _ => {}
        },
        Some(ExperimentType::YesNo) => {
            if let Some(gamma) = gamma.filter(|&g| g > UNUSUAL_RATE) {
                warnings.push(ConfigWarning::new(
                    "experiment_type",
                    format!(
                        "You have fixed the guess rate gamma to an unusually high value ({gamma}). \
                         In typical psychophysical experiment of type 'yes/no' gamma is rarely above \
                         0.2 for human observers."
                    ),
                ));
            }
        }
        None => {}
    }
    Ok(())
}

/// Container-shape checks on a plain mapping, before it is deserialized.
///
/// These give option-specific messages for the mistakes deserialization would
/// otherwise report only generically.
pub fn check_mapping_shapes(dict: &Map<String, Value>) -> Result<()> {
    for option in ["fixed_parameters", "bounds", "grid_steps", "steps_moving_bounds"] {
        match dict.get(option) {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(PsignifitError::config(format!(
                    "Option {option} must be a dictionary ({} given)!",
                    json_type_name(other)
                )));
            }
        }
    }

    if let Some(Value::Object(bounds)) = dict.get("bounds") {
        for value in bounds.values() {
            if !matches!(value, Value::Array(items) if items.len() == 2) {
                return Err(PsignifitError::config(format!(
                    "Bounds must be a sequence of 2 items: {value} given!"
                )));
            }
        }
    }

    if let Some(conf_p) = dict.get("confP") {
        if !matches!(conf_p, Value::Array(items) if items.len() == 3) {
            return Err(PsignifitError::config(format!(
                "Option confP must be a sequence of three credible levels: {conf_p} given!"
            )));
        }
    }

    if let Some(range) = dict.get("stimulus_range") {
        if !matches!(range, Value::Null) && !matches!(range, Value::Array(items) if items.len() == 2) {
            return Err(PsignifitError::config(
                "Option stimulus range must be a sequence of two items!",
            ));
        }
    }
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
