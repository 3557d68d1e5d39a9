//! Mathematical utilities: standard-form distribution functions.

pub mod standard;

pub use standard::*;
