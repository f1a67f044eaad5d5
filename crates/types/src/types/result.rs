use std::collections::HashMap;

use cid::Cid;
use fvm_shared::sector::SectorNumber;

/// Outcome of one submitted commit message, fanned out to every listener of
/// every sector the message covered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitBatchResult {
    /// Sectors the batch selected. Sectors dropped before submission stay
    /// listed here (and in `failed_sectors`) so their listeners still learn
    /// the outcome.
    pub sectors: Vec<SectorNumber>,

    /// Identifier of the submitted message; `None` when submission failed
    /// outright.
    pub message: Option<Cid>,

    /// Batch-level failure, if any.
    pub error: Option<String>,

    /// Per-sector reasons for sectors dropped from the batch before
    /// submission.
    pub failed_sectors: HashMap<SectorNumber, String>,
}
