//! Input/output helpers.
//!
//! - configuration JSON read/write (`config`)

pub mod config;

pub use config::*;
