//! Wire parameters for the miner actor's commit methods.
//!
//! Encoding is canonical tuple CBOR with an RLE+ bitfield, produced by the
//! protocol's reference encoders; the bytes must match other implementations
//! exactly.

use fvm_ipld_bitfield::BitField;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::sector::SectorNumber;
use fvm_shared::MethodNum;

/// Exported methods of the miner actor used by the sealing pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum MinerMethod {
    PreCommitSector = 6,
    ProveCommitSector = 7,
    PreCommitSectorBatch = 25,
    ProveCommitAggregate = 26,
}

impl MinerMethod {
    pub fn num(self) -> MethodNum {
        self as MethodNum
    }
}

/// Parameters of a `ProveCommitSector` message.
#[derive(Clone, Debug, Serialize_tuple, Deserialize_tuple)]
pub struct ProveCommitSectorParams {
    pub sector_number: SectorNumber,
    pub proof: RawBytes,
}

/// Parameters of a `ProveCommitAggregate` message.
#[derive(Clone, Debug, Serialize_tuple, Deserialize_tuple)]
pub struct ProveCommitAggregateParams {
    pub sector_numbers: BitField,
    pub aggregate_proof: RawBytes,
}
