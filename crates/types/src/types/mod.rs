//! Data model shared across the sealing pipeline.

pub mod precommit;
pub mod result;
pub mod sector;

pub use precommit::{MinerInfo, SectorPreCommitInfo, SectorPreCommitOnChainInfo};
pub use result::CommitBatchResult;
pub use sector::{AggregateInput, DealSchedule, PieceDealInfo, SectorInfo, SectorPiece};
