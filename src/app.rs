//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments
//! - dispatches to the sigmoid / configuration / simulation code
//! - prints reports and writes optional files

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{CheckArgs, Command, CurveArgs, EvalArgs, SimulateArgs};
use crate::config::Configuration;
use crate::data::{PoolOptions, pool_blocks, psychometric, psychometric_with_eta, simulate_blocks};
use crate::error::AppError;
use crate::grid::linspace;
use crate::report::CurveParams;
use crate::sigmoids::{Sigmoid, sigmoid_by_name};

/// Entry point for the `psig` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // `psig CONFIG.json` is shorthand for `psig check CONFIG.json`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Sigmoids => {
            print!("{}", crate::report::format_sigmoid_names());
            Ok(())
        }
        Command::Eval(args) => handle_eval(&args),
        Command::Check(args) => handle_check(&args),
        Command::Simulate(args) => handle_simulate(&args),
    }
}

fn handle_eval(args: &EvalArgs) -> Result<(), AppError> {
    let (sigmoid, params) = curve_from_args(&args.curve)?;
    let (default_from, default_to) = span(&sigmoid, &params, 0.01);
    let from = args.from.unwrap_or(default_from);
    let to = args.to.unwrap_or(default_to);
    let levels = linspace(from.min(to), from.max(to), args.steps)?;

    print!("{}", crate::report::format_curve_table(&sigmoid, &params, &levels));
    Ok(())
}

fn handle_check(args: &CheckArgs) -> Result<(), AppError> {
    let dict = crate::io::read_config_dict(&args.config)?;
    let (config, warnings) = Configuration::from_dict_with_warnings(dict)?;

    print!("{}", crate::report::format_config_summary(&config, &warnings)?);
    if args.grid {
        let grid = crate::grid::config_grid(&config)?;
        println!("\nGrid:");
        print!("{}", crate::report::format_grid(&grid));
    }

    if let Some(path) = &args.out {
        crate::io::write_config_json(path, &config)?;
        log::info!("wrote resolved configuration to {}", path.display());
    }
    Ok(())
}

fn handle_simulate(args: &SimulateArgs) -> Result<(), AppError> {
    let (sigmoid, params) = curve_from_args(&args.curve)?;
    if args.repeats == 0 {
        return Err(AppError::new(2, "Repeats must be > 0."));
    }

    let levels = if args.levels.is_empty() {
        let (from, to) = span(&sigmoid, &params, 0.05);
        linspace(from.min(to), from.max(to), 7)?
    } else {
        args.levels.clone()
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut blocks = Vec::with_capacity(levels.len() * args.repeats);
    for _ in 0..args.repeats {
        let proportions = match args.eta {
            Some(eta) => psychometric_with_eta(
                &levels,
                params.threshold,
                params.width,
                params.gamma,
                params.lambda,
                &args.curve.sigmoid,
                eta,
                &mut rng,
            )?,
            None => psychometric(
                &levels,
                params.threshold,
                params.width,
                params.gamma,
                params.lambda,
                &args.curve.sigmoid,
            )?,
        };
        blocks.extend(simulate_blocks(&levels, &proportions, args.trials, &mut rng)?);
    }

    if let Some(max_tol) = args.pool_tol {
        let options = PoolOptions {
            max_tol,
            max_gap: args.max_gap,
            max_length: args.max_length,
        };
        blocks = pool_blocks(&blocks, &options);
    }

    print!("{}", crate::report::format_blocks(&blocks));
    Ok(())
}

fn curve_from_args(args: &CurveArgs) -> Result<(Sigmoid, CurveParams), AppError> {
    let sigmoid = sigmoid_by_name(&args.sigmoid, args.pc, args.alpha)?;
    let params = CurveParams {
        threshold: args.threshold,
        width: args.width,
        gamma: args.gamma,
        lambda: args.lambda,
    };
    if !(params.width.is_finite() && params.width > 0.0) {
        return Err(AppError::new(2, format!("Width must be > 0 ({} given).", params.width)));
    }
    if !(params.gamma >= 0.0 && params.lambda >= 0.0 && params.gamma + params.lambda < 1.0) {
        return Err(AppError::new(
            2,
            format!(
                "Guess and lapse rates must satisfy 0 <= gamma + lambda < 1: got gamma={}, lambda={}.",
                params.gamma, params.lambda
            ),
        ));
    }
    Ok((sigmoid, params))
}

/// Stimulus levels where the unscaled curve reaches `tail` and `1 - tail`.
fn span(sigmoid: &Sigmoid, params: &CurveParams, tail: f64) -> (f64, f64) {
    (
        sigmoid.inverse(tail, params.threshold, params.width),
        sigmoid.inverse(1.0 - tail, params.threshold, params.width),
    )
}

/// Rewrite argv so a bare configuration path runs `check`.
///
/// Rules:
/// - `psig`                -> `psig sigmoids`
/// - `psig FILE.json ...`  -> `psig check FILE.json ...`
/// - anything else         -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("sigmoids".to_string());
        return argv;
    };

    let is_subcommand = matches!(arg1.as_str(), "sigmoids" | "eval" | "check" | "simulate" | "help");
    if !is_subcommand && arg1.ends_with(".json") {
        argv.insert(1, "check".to_string());
    }
    argv
}
