//! Command-line parsing for the `psig` tool.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! sigmoid and configuration code; dispatch lives in `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "psig", version, about = "Psychometric sigmoids and fit configuration")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print every valid sigmoid name.
    Sigmoids,
    /// Tabulate a psychometric function and its slope.
    Eval(EvalArgs),
    /// Load and validate a configuration JSON, printing the resolved options.
    Check(CheckArgs),
    /// Simulate binomial blocks from a psychometric function.
    Simulate(SimulateArgs),
}

/// Curve shape and parameters shared by `eval` and `simulate`.
#[derive(Debug, Args, Clone)]
pub struct CurveArgs {
    /// Sigmoid name (see `psig sigmoids`).
    #[arg(short, long, default_value = "norm")]
    pub sigmoid: String,

    /// Stimulus level at which the unscaled curve reaches `pc`.
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: f64,

    /// Stimulus distance between the `alpha` and `1 - alpha` levels.
    #[arg(short, long)]
    pub width: f64,

    /// Guess rate (lower asymptote).
    #[arg(long, default_value_t = 0.0)]
    pub gamma: f64,

    /// Lapse rate (1 - upper asymptote).
    #[arg(long, default_value_t = 0.0)]
    pub lambda: f64,

    /// Proportion correct at threshold.
    #[arg(long, default_value_t = 0.5)]
    pub pc: f64,

    /// Tail level defining the width.
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,
}

/// Options for `psig eval`.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// First stimulus level (default: where the curve reaches 1%).
    #[arg(long, allow_negative_numbers = true)]
    pub from: Option<f64>,

    /// Last stimulus level (default: where the curve reaches 99%).
    #[arg(long, allow_negative_numbers = true)]
    pub to: Option<f64>,

    /// Number of stimulus levels.
    #[arg(long, default_value_t = 11)]
    pub steps: usize,
}

/// Options for `psig check`.
#[derive(Debug, Args, Clone)]
pub struct CheckArgs {
    /// Configuration JSON file.
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Write the resolved configuration (all options filled in) to this file.
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,

    /// Also print the parameter grid implied by the bounds and grid steps.
    #[arg(long)]
    pub grid: bool,
}

/// Options for `psig simulate`.
#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub curve: CurveArgs,

    /// Overdispersion in (0, 1); omit for plain binomial data.
    #[arg(long)]
    pub eta: Option<f64>,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Stimulus levels, comma separated (default: 7 levels spanning 5%..95%).
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub levels: Vec<f64>,

    /// Trials per block.
    #[arg(long, default_value_t = 50)]
    pub trials: u32,

    /// Number of passes over the stimulus levels.
    #[arg(long, default_value_t = 1)]
    pub repeats: usize,

    /// Pool blocks whose levels differ by at most this much.
    #[arg(long)]
    pub pool_tol: Option<f64>,

    /// Largest number of intervening trials when pooling.
    #[arg(long, requires = "pool_tol")]
    pub max_gap: Option<u64>,

    /// Largest trial span of a pooled block.
    #[arg(long, requires = "pool_tol")]
    pub max_length: Option<u64>,
}
