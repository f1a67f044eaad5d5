use fvm_shared::sector::AggregateSealVerifyProofAndInfos;
use thiserror::Error;

/// Proof aggregation backend.
///
/// Aggregation is CPU-bound work done in-process, so the seam is synchronous.
#[cfg_attr(feature = "test-utils", mockall::automock)]
pub trait ProofAggregator: Send + Sync {
    /// Folds per-sector seal proofs into one succinct aggregate.
    ///
    /// `aggregate.infos` and `proofs` must be the same length and jointly
    /// ordered by ascending sector number; `aggregate.seal_proof` applies to
    /// every entry (mixed proof types cannot be aggregated).
    fn aggregate_seal_proofs(
        &self,
        aggregate: AggregateSealVerifyProofAndInfos,
        proofs: &[Vec<u8>],
    ) -> Result<Vec<u8>, ProverError>;
}

/// Errors from the proof aggregation backend.
#[derive(Debug, Error)]
pub enum ProverError {
    #[error("proof aggregation failed: {0}")]
    Aggregation(String),

    #[error(transparent)]
    Other(#[from] eyre::Error),
}
