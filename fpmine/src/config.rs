//! Configuration structures for fpmine.

use crate::error::{MiningError, Result};
use serde::{Deserialize, Serialize};

/// Default initial slot count for maps and sequences.
pub const DEFAULT_INITIAL_CAPACITY: usize = 8;

/// Default occupancy ratio that triggers growth.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.66;

/// Default minimum support (absolute transaction count).
pub const DEFAULT_MIN_SUPPORT: usize = 2;

/// Sizing knobs shared by `AssociativeMap` and `DynamicSequence`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Initial number of slots. Maps round this up to a power of two.
    pub initial_capacity: usize,
    /// Occupancy ratio above which storage doubles.
    pub load_factor: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<()> {
        if self.initial_capacity == 0 {
            return Err(MiningError::InvalidCapacity(self.initial_capacity));
        }
        // NaN fails both comparisons.
        if !(self.load_factor > 0.0 && self.load_factor < 1.0) {
            return Err(MiningError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}

/// Settings for a mining run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Minimum number of transactions an item set must appear in.
    /// Applied to the initial filter and at every recursion level.
    pub min_support: usize,
    /// Sizing of every map and sequence the miner allocates.
    pub tuning: Tuning,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            tuning: Tuning::default(),
        }
    }
}

impl MinerConfig {
    pub fn with_min_support(min_support: usize) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_min_support(self.min_support)?;
        self.tuning.validate()
    }
}

/// Settings for decoding one-hot encoded rows into transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneHotConfig {
    /// Cell values (case-insensitive) that mark an item as present.
    /// Any cell parsing as a non-zero number is also treated as present.
    pub true_values: Vec<String>,
    /// Skip rows that contain no present item.
    pub drop_empty: bool,
}

impl Default for OneHotConfig {
    fn default() -> Self {
        Self {
            true_values: ["1", "true", "t", "yes", "y"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            drop_empty: true,
        }
    }
}

pub(crate) fn validate_min_support(min_support: usize) -> Result<()> {
    if min_support == 0 {
        return Err(MiningError::InvalidThreshold(min_support));
    }
    Ok(())
}
