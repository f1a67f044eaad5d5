//! Shared types and collaborator seams for the storage miner's sealing
//! pipeline.

pub mod messages;
pub mod traits;
pub mod types;

pub use messages::{MinerMethod, ProveCommitAggregateParams, ProveCommitSectorParams};
pub use traits::{
    AddressPurpose, AddressSelector, AddressSelectorError, ChainClient, ChainClientError,
    ProofAggregator, ProverError, TipSetToken,
};
pub use types::{
    AggregateInput, CommitBatchResult, DealSchedule, MinerInfo, PieceDealInfo, SectorInfo,
    SectorPiece, SectorPreCommitInfo, SectorPreCommitOnChainInfo,
};

#[cfg(feature = "test-utils")]
pub use traits::{MockAddressSelector, MockChainClient, MockProofAggregator};
