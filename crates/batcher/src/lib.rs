//! Deadline-driven aggregation of per-sector commit proofs.
//!
//! Sealed sectors each produce a succinct replication proof whose on-chain
//! submission is far cheaper in bulk. The [`CommitBatcher`] collects proofs
//! from concurrent producers, watches every sector's prove-commit cutoff,
//! and closes a batch when it is full, when the earliest cutoff draws near,
//! or on demand. Full batches go out as one `ProveCommitAggregate` message;
//! undersized ones fall back to individual `ProveCommitSector` messages.

pub mod config;
pub mod error;

mod batcher;
mod close;
mod collateral;
mod cutoff;
mod state;
mod task;

#[cfg(test)]
pub(crate) mod test_utils;

pub use batcher::CommitBatcher;
pub use config::{BatchFeeConfig, BatcherConfig, FeeConfig};
pub use error::BatcherError;
