//! Pooling of blocks recorded at (nearly) the same stimulus level.
//!
//! Adaptive procedures produce many small blocks around the threshold. Pooling
//! merges blocks whose levels agree within a tolerance, as long as they were not
//! separated by too many trials at other levels.

use crate::data::Block;

/// Limits on which blocks may be merged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolOptions {
    /// Largest level difference to the first block of a pool.
    pub max_tol: f64,
    /// Largest number of intervening trials at other levels; `None` for no limit.
    pub max_gap: Option<u64>,
    /// Largest trial span of a pool, counted from its first block; `None` for no limit.
    pub max_length: Option<u64>,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_tol: 0.0,
            max_gap: None,
            max_length: None,
        }
    }
}

/// Merge blocks in order of appearance.
///
/// Each unpooled block starts a new pool; later blocks join it while their level
/// is within `max_tol` of the starting level. The pooled level is the
/// trial-weighted mean level, counts are summed.
pub fn pool_blocks(data: &[Block], options: &PoolOptions) -> Vec<Block> {
    let mut cumulative = Vec::with_capacity(data.len() + 1);
    cumulative.push(0u64);
    for block in data {
        let last = cumulative[cumulative.len() - 1];
        cumulative.push(last + u64::from(block.n_trials));
    }

    let mut seen = vec![false; data.len()];
    let mut pooled = Vec::new();

    for i in 0..data.len() {
        if seen[i] {
            continue;
        }
        let start_level = data[i].level;
        let mut weighted_level = 0.0;
        let mut n_correct = 0u32;
        let mut n_trials = 0u32;
        let mut gap = 0u64;

        for j in i..data.len() {
            let span = cumulative[j + 1] - cumulative[i];
            if options.max_length.is_some_and(|max| span > max) || options.max_gap.is_some_and(|max| gap > max) {
                break;
            }
            let block = data[j];
            if (block.level - start_level).abs() <= options.max_tol && !seen[j] {
                seen[j] = true;
                gap = 0;
                weighted_level += block.level * f64::from(block.n_trials);
                n_correct += block.n_correct;
                n_trials += block.n_trials;
            } else {
                gap += u64::from(block.n_trials);
            }
        }

        // A pool always holds its first block, unless that block alone exceeds
        // `max_length`; keep such a block on its own.
        if n_trials == 0 && !seen[i] {
            seen[i] = true;
            pooled.push(data[i]);
            continue;
        }
        let level = if n_trials > 0 {
            weighted_level / f64::from(n_trials)
        } else {
            start_level
        };
        pooled.push(Block {
            level,
            n_correct,
            n_trials,
        });
    }

    log::debug!("pooled {} blocks into {}", data.len(), pooled.len());
    pooled
}
