use crate::error::{ForestError, Result};

/// Each member trains on `⌊records / SAMPLE_DIVISOR⌋` records.
pub const SAMPLE_DIVISOR: usize = 3;

#[derive(Clone, Debug)]
pub struct ForestParams {
    num_trees: usize,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ForestParams {
    pub fn new() -> Self {
        Self { num_trees: 1 }
    }

    pub fn set_num_trees(&mut self, num_trees: usize) -> Result<()> {
        if num_trees < 1 {
            return Err(ForestError::InvalidTreeCount { num_trees });
        }
        self.num_trees = num_trees;
        Ok(())
    }

    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Sub-sample size for a base dataset of `records` records.
    pub fn sample_size(&self, records: usize) -> Result<usize> {
        match records / SAMPLE_DIVISOR {
            0 => Err(ForestError::SampleTooSmall { records }),
            size => Ok(size),
        }
    }
}
