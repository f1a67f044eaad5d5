use fvm_shared::sector::{RegisteredSealProof, SectorNumber};
use sealing_types::ChainClientError;
use thiserror::Error;

/// Errors surfaced by the [`CommitBatcher`](crate::CommitBatcher) API.
#[derive(Debug, Error)]
pub enum BatcherError {
    /// A chain client call failed.
    #[error(transparent)]
    Client(#[from] ChainClientError),

    /// No pre-commit record on chain for the sector.
    #[error("precommit info for sector {0} not found on chain")]
    PrecommitNotFound(SectorNumber),

    /// The proof type has no known prove-commit window.
    #[error("no max prove-commit duration for seal proof type {0:?}")]
    UnknownProofDuration(RegisteredSealProof),

    /// The miner address is not an ID address.
    #[error("miner address is not an id address")]
    NonIdMinerAddress,

    /// Configuration rejected at startup.
    #[error("invalid batcher config: {0}")]
    Config(&'static str),

    /// The scheduler has stopped; no further batches will be produced.
    #[error("commit batcher is stopped")]
    Stopped,
}
