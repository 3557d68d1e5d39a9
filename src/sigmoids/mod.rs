//! Sigmoid shapes for psychometric functions.
//!
//! Shapes are a closed set (`SigmoidKind`); the decreasing variant of each shape is
//! a flag on `Sigmoid`, not a separate type.

pub mod registry;
pub mod sigmoid;

pub use registry::*;
pub use sigmoid::*;
