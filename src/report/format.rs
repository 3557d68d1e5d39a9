//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the sigmoid/configuration code stays free of presentation concerns
//! - output changes are localized

use crate::config::{ConfigWarning, Configuration};
use crate::data::Block;
use crate::domain::Parameter;
use crate::error::Result;
use crate::grid::Grid;
use crate::sigmoids::{ALL_SIGMOID_NAMES, Sigmoid};

/// Curve parameters for a table of psychometric values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveParams {
    pub threshold: f64,
    pub width: f64,
    pub gamma: f64,
    pub lambda: f64,
}

/// Every registered sigmoid name, one per line.
pub fn format_sigmoid_names() -> String {
    let mut out = String::new();
    for name in ALL_SIGMOID_NAMES {
        out.push_str(name);
        out.push('\n');
    }
    out
}

/// Table of stimulus level, psychometric value and slope.
pub fn format_curve_table(sigmoid: &Sigmoid, params: &CurveParams, levels: &[f64]) -> String {
    let CurveParams {
        threshold,
        width,
        gamma,
        lambda,
    } = *params;

    let mut out = String::new();
    out.push_str(&format!("Sigmoid: {sigmoid}\n"));
    out.push_str(&format!(
        "threshold={threshold} width={width} gamma={gamma} lambda={lambda}\n"
    ));
    let (location, scale) = sigmoid.native_parameters(threshold, width);
    out.push_str(&format!("native: location={location:.6} scale={scale:.6}\n\n"));

    push_row(&mut out, format!("{:>12} {:>12} {:>12}", "level", "psi", "slope"));
    push_row(&mut out, format!("{:-<12} {:-<12} {:-<12}", "", "", ""));
    for &x in levels {
        push_row(
            &mut out,
            format!(
                "{x:>12.4} {:>12.6} {:>12.6}",
                sigmoid.psychometric(x, threshold, width, gamma, lambda),
                sigmoid.slope(x, threshold, width, gamma, lambda),
            ),
        );
    }
    out
}

/// Resolved configuration with its warnings.
///
/// Fails when the configuration was edited after validation into a state whose
/// effective fixed parameters cannot be derived.
pub fn format_config_summary(config: &Configuration, warnings: &[ConfigWarning]) -> Result<String> {
    let mut out = String::new();
    out.push_str("=== psig - configuration ===\n");

    let experiment = match config.experiment_choices {
        Some(n) => format!("{} ({n} choices)", config.experiment_type),
        None => config.experiment_type.clone(),
    };
    out.push_str(&format!("Experiment: {experiment}\n"));

    let sigmoid = match config.make_sigmoid() {
        Ok(sigmoid) => sigmoid.to_string(),
        Err(_) => config.sigmoid.to_string(),
    };
    out.push_str(&format!("Sigmoid: {sigmoid}\n"));
    out.push_str(&format!(
        "Levels: thresh_PC={} width_alpha={}\n",
        config.thresh_pc, config.width_alpha
    ));
    out.push_str(&format!(
        "Estimate: {} | CI: {} at {}\n",
        config.estimate_type.as_str(),
        config.ci_method,
        fmt_vec(&[config.conf_p.0, config.conf_p.1, config.conf_p.2]),
    ));
    if let Some((low, high)) = config.stimulus_range {
        out.push_str(&format!("Stimulus range: [{low}, {high}]\n"));
    }

    out.push_str("\nParameters:\n");
    let fixed = config.effective_fixed_parameters()?;
    for parameter in Parameter::ALL {
        let name = parameter.name();
        let status = match fixed.get(&parameter) {
            Some(value) => format!("fixed at {value}"),
            None => match config.bounds.as_ref().and_then(|b| b.get(name)) {
                Some((low, high)) => format!("bounds [{low}, {high}]"),
                None => "bounds from data".to_string(),
            },
        };
        let steps = config.grid_steps.get(name).copied().unwrap_or_default();
        let moving = config.steps_moving_bounds.get(name).copied().unwrap_or_default();
        push_row(
            &mut out,
            format!("- {name:<10} steps={steps:<3} moving={moving:<3} {status}"),
        );
    }

    if !warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in warnings {
            out.push_str(&format!("! {warning}\n"));
        }
    }
    Ok(out)
}

/// Grid axes as `name: n points [first .. last]`.
pub fn format_grid(grid: &Grid<Parameter>) -> String {
    let mut out = String::new();
    for (parameter, axis) in grid {
        let line = match axis.as_deref() {
            None => format!("{parameter:<10} (no bounds)"),
            Some([single]) => format!("{parameter:<10} 1 point [{single}]"),
            Some(values) => format!(
                "{parameter:<10} {} points [{} .. {}]",
                values.len(),
                values.first().copied().unwrap_or_default(),
                values.last().copied().unwrap_or_default(),
            ),
        };
        push_row(&mut out, line);
    }
    out
}

/// Block table: level, correct, trials, proportion.
pub fn format_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    push_row(
        &mut out,
        format!("{:>12} {:>10} {:>10} {:>10}", "level", "n_correct", "n_trials", "p"),
    );
    push_row(&mut out, format!("{:-<12} {:-<10} {:-<10} {:-<10}", "", "", "", ""));
    for block in blocks {
        let p = block.proportion().map(|p| format!("{p:.4}")).unwrap_or_default();
        push_row(
            &mut out,
            format!(
                "{:>12.4} {:>10} {:>10} {:>10}",
                block.level, block.n_correct, block.n_trials, p
            ),
        );
    }
    out
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sigmoids::default_sigmoid_by_name;

    #[test]
    fn sigmoid_names_are_listed() {
        let out = format_sigmoid_names();
        assert_eq!(out.lines().count(), ALL_SIGMOID_NAMES.len());
        assert!(out.lines().any(|l| l == "neg_weibull"));
    }

    #[test]
    fn curve_table_has_one_row_per_level() {
        let sigmoid = default_sigmoid_by_name("norm").unwrap();
        let params = CurveParams {
            threshold: 0.5,
            width: 0.4,
            gamma: 0.0,
            lambda: 0.0,
        };
        let out = format_curve_table(&sigmoid, &params, &[0.3, 0.5, 0.7]);
        assert!(out.contains("Sigmoid: norm"));
        assert!(out.contains("0.500000"));
        let rows = out.lines().skip_while(|l| !l.starts_with("-")).skip(1).count();
        assert_eq!(rows, 3);
    }

    #[test]
    fn config_summary_shows_fixed_parameters_and_warnings() {
        let (config, warnings) = Configuration {
            experiment_type: "2AFC".to_string(),
            fixed_parameters: Some([("gamma".to_string(), 0.3)].into_iter().collect()),
            ..Configuration::default()
        }
        .checked_with_warnings()
        .unwrap();
        let out = format_config_summary(&config, &warnings).unwrap();
        assert!(out.contains("Experiment: nAFC (2 choices)"));
        assert!(out.contains("gamma      steps=1   moving=1   fixed at 0.5"));
        assert!(out.contains("Warnings:"));
    }

    #[test]
    fn config_summary_reports_unresolvable_fixed_parameters() {
        let mut config = Configuration::try_default().unwrap();
        config.experiment_type = "2AFC".to_string();
        let err = format_config_summary(&config, &[]).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("not canonical"), "{err}");
    }

    #[test]
    fn blocks_table() {
        let out = format_blocks(&[
            Block {
                level: 0.25,
                n_correct: 3,
                n_trials: 4,
            },
            Block {
                level: 0.5,
                n_correct: 0,
                n_trials: 0,
            },
        ]);
        assert!(out.contains("0.7500"));
        assert_eq!(out.lines().count(), 4);
    }
}
