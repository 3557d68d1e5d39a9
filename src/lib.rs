//! `psignifit-core` library crate.
//!
//! The sigmoid family used to model psychometric functions, the validated
//! configuration of a psychometric fit, and the bridge from one to the other.
//!
//! The binary (`psig`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the sigmoid and configuration types can back an inference engine directly

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod grid;
pub mod io;
pub mod math;
pub mod report;
pub mod sigmoids;

pub use config::{ConfigWarning, Configuration, SigmoidSpec};
pub use error::{PsignifitError, Result};
pub use sigmoids::{ALL_SIGMOID_NAMES, Sigmoid, SigmoidKind, sigmoid_by_name};
