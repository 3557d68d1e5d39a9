//! Reporting utilities: formatted terminal output for the `psig` binary.

pub mod format;

pub use format::*;
