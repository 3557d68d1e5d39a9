//! Parameter grid generation.
//!
//! The posterior is evaluated on a deterministic grid: one axis per parameter,
//! spanning the parameter's bounds. Fixed parameters collapse to a single value;
//! parameters without bounds have no axis.

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::config::Configuration;
use crate::domain::Parameter;
use crate::error::{PsignifitError, Result};

/// One axis per key; `None` where the key has no bounds.
pub type Grid<K> = BTreeMap<K, Option<Vec<f64>>>;

/// Generate `steps` linearly spaced points between `min` and `max` (inclusive).
///
/// A single step yields `[min]`.
pub fn linspace(min: f64, max: f64, steps: usize) -> Result<Vec<f64>> {
    if !(min.is_finite() && max.is_finite() && max >= min) {
        return Err(PsignifitError::config(format!(
            "Invalid grid range: min={min}, max={max} (must be finite and max>=min)."
        )));
    }
    if steps == 0 {
        return Err(PsignifitError::config("Grid steps must be >= 1."));
    }
    if steps == 1 {
        return Ok(vec![min]);
    }

    let step = (max - min) / (steps as f64 - 1.0);
    let mut out = Vec::with_capacity(steps);
    for i in 0..steps - 1 {
        out.push(min + step * i as f64);
    }
    out.push(max);
    Ok(out)
}

/// Grid axes for every key of `bounds`.
///
/// Steps are only looked up for keys whose bounds are a proper interval.
pub fn get_grid<K>(bounds: &BTreeMap<K, Option<(f64, f64)>>, steps: &BTreeMap<K, u32>) -> Result<Grid<K>>
where
    K: Ord + Clone + Display,
{
    let mut grid = BTreeMap::new();
    for (key, bound) in bounds {
        let axis = match *bound {
            None => None,
            Some((low, high)) if low == high => Some(vec![low]),
            Some((low, high)) => {
                let n = steps.get(key).copied().ok_or_else(|| {
                    PsignifitError::config(format!("No grid steps given for bounded parameter {key}."))
                })?;
                Some(linspace(low, high, n as usize)?)
            }
        };
        grid.insert(key.clone(), axis);
    }
    Ok(grid)
}

/// Grid for a validated configuration.
///
/// Effective fixed parameters override any configured bounds.
pub fn config_grid(config: &Configuration) -> Result<Grid<Parameter>> {
    let fixed = config.effective_fixed_parameters()?;
    let mut bounds = BTreeMap::new();
    let mut steps = BTreeMap::new();
    for parameter in Parameter::ALL {
        let name = parameter.name();
        let bound = match fixed.get(&parameter) {
            Some(&value) => Some((value, value)),
            None => config.bounds.as_ref().and_then(|b| b.get(name)).copied(),
        };
        bounds.insert(parameter, bound);
        if let Some(&n) = config.grid_steps.get(name) {
            steps.insert(parameter, n);
        }
    }
    log::debug!("building parameter grid from bounds {bounds:?}");
    get_grid(&bounds, &steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_includes_endpoints() {
        let v = linspace(0.1, 10.0, 5).unwrap();
        assert_eq!(v.len(), 5);
        assert_eq!(v[0], 0.1);
        assert_eq!(v[4], 10.0);
        assert!((v[2] - 5.05).abs() < 1e-12);
        assert_eq!(linspace(3.0, 4.0, 1).unwrap(), vec![3.0]);
        assert!(linspace(1.0, 0.0, 3).is_err());
        assert!(linspace(0.0, 1.0, 0).is_err());
    }

    #[test]
    fn missing_bounds_and_fixed_values() {
        let bounds: BTreeMap<String, Option<(f64, f64)>> = [
            ("none".to_string(), None),
            ("fixed".to_string(), Some((0.5, 0.5))),
            ("normal".to_string(), Some((0.0, 1.0))),
        ]
        .into_iter()
        .collect();
        let steps: BTreeMap<String, u32> = [("none".to_string(), 3), ("normal".to_string(), 15)]
            .into_iter()
            .collect();

        let grid = get_grid(&bounds, &steps).unwrap();
        assert!(grid["none"].is_none());
        assert_eq!(grid["normal"].as_ref().map(Vec::len), Some(15));
        assert_eq!(grid["fixed"], Some(vec![0.5]));
    }

    #[test]
    fn bounded_key_without_steps_fails() {
        let bounds: BTreeMap<&str, Option<(f64, f64)>> = [("width", Some((0.1, 2.0)))].into_iter().collect();
        let err = get_grid(&bounds, &BTreeMap::new()).unwrap_err();
        assert!(err.to_string().contains("width"));
    }

    #[test]
    fn configuration_grid_collapses_fixed_parameters() {
        let config = Configuration {
            experiment_type: "2AFC".to_string(),
            fixed_parameters: Some([("eta".to_string(), 0.0)].into_iter().collect()),
            bounds: Some(
                [
                    ("threshold".to_string(), (0.0, 1.0)),
                    ("width".to_string(), (0.2, 2.0)),
                ]
                .into_iter()
                .collect(),
            ),
            grid_steps: [("threshold".to_string(), 7)].into_iter().collect(),
            ..Configuration::default()
        }
        .checked()
        .unwrap();

        let grid = config_grid(&config).unwrap();
        assert_eq!(grid[&Parameter::Threshold].as_ref().map(Vec::len), Some(7));
        assert_eq!(grid[&Parameter::Width].as_ref().map(Vec::len), Some(40));
        assert_eq!(grid[&Parameter::Gamma], Some(vec![0.5]));
        assert_eq!(grid[&Parameter::Eta], Some(vec![0.0]));
        assert!(grid[&Parameter::Lambda].is_none());
    }
}
