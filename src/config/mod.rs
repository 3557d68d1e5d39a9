//! Fitting configuration: options, validation, persistence, and the sigmoid bridge.

pub mod checks;
pub mod configuration;

pub use checks::{FIELD_NAMES, check_mapping_shapes};
pub use configuration::*;
