use fvm_shared::clock::ChainEpoch;
use fvm_shared::deal::DealID;
use fvm_shared::piece::PieceInfo;
use fvm_shared::sector::{AggregateSealVerifyInfo, RegisteredSealProof, SectorNumber};

/// Activation window of a storage deal. The sector carrying the deal must be
/// proven before `start_epoch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DealSchedule {
    pub start_epoch: ChainEpoch,
    pub end_epoch: ChainEpoch,
}

/// On-chain deal backing a piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PieceDealInfo {
    pub deal_id: DealID,
    pub deal_schedule: DealSchedule,
}

/// One piece of sector content, optionally backed by a deal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectorPiece {
    pub piece: PieceInfo,
    pub deal_info: Option<PieceDealInfo>,
}

/// The sealing pipeline's view of a sector offered for commit.
#[derive(Clone, Debug)]
pub struct SectorInfo {
    pub sector_number: SectorNumber,
    pub sector_type: RegisteredSealProof,
    pub pieces: Vec<SectorPiece>,
}

/// One sector's contribution to an aggregated commit: its public
/// verification inputs and the proof bytes to fold in.
#[derive(Clone, Debug)]
pub struct AggregateInput {
    pub seal_proof: RegisteredSealProof,
    pub info: AggregateSealVerifyInfo,
    pub proof: Vec<u8>,
}
