//! Psychometric data: simulated blocks and block pooling.

pub mod pool;
pub mod simulate;

pub use pool::{PoolOptions, pool_blocks};
pub use simulate::{psychometric, psychometric_with_eta, simulate_blocks};

/// Trials recorded at one stimulus level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub level: f64,
    pub n_correct: u32,
    pub n_trials: u32,
}

impl Block {
    /// Observed proportion correct; `None` for an empty block.
    pub fn proportion(&self) -> Option<f64> {
        (self.n_trials > 0).then(|| f64::from(self.n_correct) / f64::from(self.n_trials))
    }
}
