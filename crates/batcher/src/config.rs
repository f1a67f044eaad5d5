//! Commit batcher configuration, read once at scheduler start.

use std::time::Duration;

use fvm_shared::econ::TokenAmount;
use sealing_policy::MAX_AGGREGATED_SECTORS;

use crate::error::BatcherError;

/// Batch sizing and timing knobs.
#[derive(Clone, Debug)]
pub struct BatcherConfig {
    /// Hard cap on sectors per aggregate message.
    pub max_commit_batch: usize,

    /// Below this count the timer path gives up on aggregation and submits
    /// sectors individually.
    pub min_commit_batch: usize,

    /// Longest the scheduler idles before considering a flush.
    pub batch_wait: Duration,

    /// Margin subtracted from the earliest sector cutoff, leaving time to
    /// assemble and submit the batch before the proof expires.
    pub batch_slack: Duration,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            max_commit_batch: MAX_AGGREGATED_SECTORS,
            min_commit_batch: 4,
            batch_wait: Duration::from_secs(24 * 60 * 60),
            batch_slack: Duration::from_secs(60 * 60),
        }
    }
}

impl BatcherConfig {
    /// Rejects configurations the scheduler cannot operate under.
    pub fn validate(&self) -> Result<(), BatcherError> {
        if self.min_commit_batch == 0 {
            return Err(BatcherError::Config("min batch size must be positive"));
        }
        if self.min_commit_batch > self.max_commit_batch {
            return Err(BatcherError::Config("min batch size above max"));
        }
        if self.max_commit_batch > MAX_AGGREGATED_SECTORS {
            return Err(BatcherError::Config("max batch size above protocol cap"));
        }
        if self.batch_wait.is_zero() {
            return Err(BatcherError::Config("batch wait must be positive"));
        }
        Ok(())
    }
}

/// Caps on what commit messages may spend on gas.
#[derive(Clone, Debug)]
pub struct FeeConfig {
    /// Per-message cap for individually submitted commits.
    pub max_commit_gas_fee: TokenAmount,

    /// Per-count cap for aggregate commits.
    pub max_commit_batch_gas_fee: BatchFeeConfig,
}

/// Linear per-sector pricing for a batched message.
#[derive(Clone, Debug)]
pub struct BatchFeeConfig {
    pub base: TokenAmount,
    pub per_sector: TokenAmount,
}

impl BatchFeeConfig {
    /// Fee cap for a batch covering `sectors` sectors.
    pub fn fee_for_sectors(&self, sectors: usize) -> TokenAmount {
        self.base.clone() + TokenAmount::from_atto(self.per_sector.atto() * sectors as i64)
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            // 0.05 FIL
            max_commit_gas_fee: TokenAmount::from_nano(50_000_000),
            max_commit_batch_gas_fee: BatchFeeConfig {
                base: TokenAmount::from_atto(0),
                // 0.03 FIL
                per_sector: TokenAmount::from_nano(30_000_000),
            },
        }
    }
}
