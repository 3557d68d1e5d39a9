//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - psychometric parameter names (`Parameter`)
//! - enumerated configuration values (`ExperimentType`, `CiMethod`, `EstimateType`)

pub mod types;

pub use types::*;
