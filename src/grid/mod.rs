pub mod parameter_grid;

pub use parameter_grid::*;
