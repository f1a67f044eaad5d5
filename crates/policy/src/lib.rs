//! Chain policy for the sealing pipeline: prove-commit windows, aggregation
//! bounds, and network fees.

pub mod fees;

use std::time::Duration;

use fvm_shared::clock::ChainEpoch;
use fvm_shared::sector::RegisteredSealProof;
use fvm_shared::version::NetworkVersion;

/// Seconds between consecutive chain epochs.
pub const BLOCK_DELAY_SECS: u64 = 30;

/// Chain epochs in 24 hours.
pub const EPOCHS_IN_DAY: ChainEpoch = 2880;

/// Epochs between a pre-commit landing on chain and the interactive
/// challenge becoming available.
pub const PRE_COMMIT_CHALLENGE_DELAY: ChainEpoch = 150;

/// Smallest sector count the aggregation primitive accepts.
pub const MIN_AGGREGATED_SECTORS: usize = 4;

/// Largest sector count a single aggregate message may carry.
pub const MAX_AGGREGATED_SECTORS: usize = 819;

/// Actor bundle versions, in network deployment order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActorsVersion {
    V0,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
}

impl ActorsVersion {
    /// The actor bundle active at a given network version. Network versions
    /// past the last known bundle map to the latest entry.
    pub fn for_network(nv: NetworkVersion) -> Self {
        match u32::from(nv) {
            0..=3 => Self::V0,
            4..=9 => Self::V2,
            10 | 11 => Self::V3,
            12 => Self::V4,
            13 => Self::V5,
            14 => Self::V6,
            15 => Self::V7,
            _ => Self::V8,
        }
    }
}

/// Longest span, in epochs, between a sector's pre-commit and the deadline
/// for its prove-commit. `None` for unknown proof types.
///
/// The window was widened to thirty days when proof aggregation shipped, so
/// miners could accumulate batches worth aggregating.
pub fn max_prove_commit_duration(
    version: ActorsVersion,
    proof: RegisteredSealProof,
) -> Option<ChainEpoch> {
    if matches!(proof, RegisteredSealProof::Invalid(_)) {
        return None;
    }
    if version < ActorsVersion::V5 {
        Some(EPOCHS_IN_DAY + PRE_COMMIT_CHALLENGE_DELAY)
    } else {
        Some(30 * EPOCHS_IN_DAY)
    }
}

/// Wall-clock duration covered by a span of epochs.
pub fn epochs_to_duration(epochs: ChainEpoch) -> Duration {
    Duration::from_secs(epochs.max(0) as u64 * BLOCK_DELAY_SECS)
}
