//! Test helpers: canned protocol objects and a mocked-collaborator builder.

use std::sync::Arc;

use cid::Cid;
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use fvm_shared::econ::TokenAmount;
use fvm_shared::piece::{PaddedPieceSize, PieceInfo};
use fvm_shared::randomness::Randomness;
use fvm_shared::sector::{AggregateSealVerifyInfo, RegisteredSealProof, SectorNumber};
use fvm_shared::version::NetworkVersion;
use sealing_types::{
    AggregateInput, DealSchedule, MinerInfo, MockAddressSelector, MockChainClient,
    MockProofAggregator, PieceDealInfo, SectorInfo, SectorPiece, SectorPreCommitInfo,
    SectorPreCommitOnChainInfo, TipSetToken,
};

use crate::config::{BatcherConfig, FeeConfig};
use crate::CommitBatcher;

pub(crate) const MINER_ID: u64 = 1000;
pub(crate) const WORKER_ID: u64 = 100;
pub(crate) const HEAD_EPOCH: ChainEpoch = 100;
pub(crate) const AGGREGATE_BYTES: [u8; 96] = [0xab; 96];

pub(crate) fn miner_addr() -> Address {
    Address::new_id(MINER_ID)
}

pub(crate) fn test_cid(tag: &[u8]) -> Cid {
    let mh = cid::multihash::Multihash::wrap(0, tag).unwrap();
    Cid::new_v1(0x55, mh)
}

pub(crate) fn test_input(sector_number: SectorNumber) -> AggregateInput {
    AggregateInput {
        seal_proof: RegisteredSealProof::StackedDRG32GiBV1P1,
        info: AggregateSealVerifyInfo {
            sector_number,
            randomness: Randomness(vec![1; 32]),
            interactive_randomness: Randomness(vec![2; 32]),
            sealed_cid: test_cid(b"sealed"),
            unsealed_cid: test_cid(b"unsealed"),
        },
        proof: sector_number.to_be_bytes().repeat(24),
    }
}

pub(crate) fn test_sector(sector_number: SectorNumber) -> SectorInfo {
    SectorInfo {
        sector_number,
        sector_type: RegisteredSealProof::StackedDRG32GiBV1P1,
        pieces: Vec::new(),
    }
}

/// A sector carrying one deal piece, which pins its cutoff to the deal's
/// start epoch.
pub(crate) fn test_sector_with_deal(
    sector_number: SectorNumber,
    start_epoch: ChainEpoch,
) -> SectorInfo {
    SectorInfo {
        pieces: vec![SectorPiece {
            piece: PieceInfo {
                size: PaddedPieceSize(32 << 30),
                cid: test_cid(b"piece"),
            },
            deal_info: Some(PieceDealInfo {
                deal_id: 1,
                deal_schedule: DealSchedule {
                    start_epoch,
                    end_epoch: start_epoch + 180 * 2880,
                },
            }),
        }],
        ..test_sector(sector_number)
    }
}

pub(crate) fn test_pci(sector_number: SectorNumber) -> SectorPreCommitOnChainInfo {
    SectorPreCommitOnChainInfo {
        info: SectorPreCommitInfo {
            seal_proof: RegisteredSealProof::StackedDRG32GiBV1P1,
            sector_number,
            sealed_cid: test_cid(b"sealed"),
            seal_rand_epoch: 0,
            deal_ids: Vec::new(),
            expiration: 500_000,
        },
        pre_commit_deposit: TokenAmount::from_whole(1),
        pre_commit_epoch: 1,
    }
}

pub(crate) fn test_miner_info() -> MinerInfo {
    MinerInfo {
        owner: Address::new_id(WORKER_ID),
        worker: Address::new_id(WORKER_ID),
        control_addresses: Vec::new(),
    }
}

/// Builder over the three mocked collaborator seams.
///
/// Specific expectations registered through [`with`](Self::with) before the
/// happy-path ones take precedence, since expectations match in declaration
/// order.
pub(crate) struct TestBatcher {
    pub(crate) client: MockChainClient,
    pub(crate) prover: MockProofAggregator,
    pub(crate) addr_sel: MockAddressSelector,
    pub(crate) msg_cid: Cid,
}

impl TestBatcher {
    pub(crate) fn new() -> Self {
        Self {
            client: MockChainClient::new(),
            prover: MockProofAggregator::new(),
            addr_sel: MockAddressSelector::new(),
            msg_cid: test_cid(b"message"),
        }
    }

    pub(crate) fn with(mut self, f: impl FnOnce(&mut Self)) -> Self {
        f(&mut self);
        self
    }

    /// Chain lookups used by the add path and the collateral oracle: head at
    /// [`HEAD_EPOCH`], a pre-commit record for every sector, a 2 FIL pledge
    /// against a 1 FIL deposit.
    pub(crate) fn with_happy_lookups(mut self) -> Self {
        self.client
            .expect_chain_head()
            .returning(|| Ok((TipSetToken::default(), HEAD_EPOCH)));
        self.client
            .expect_state_network_version()
            .returning(|_| Ok(NetworkVersion::V16));
        self.client
            .expect_state_sector_precommit_info()
            .returning(|_, sector, _| Ok(Some(test_pci(sector))));
        self.client
            .expect_state_miner_initial_pledge_collateral()
            .returning(|_, _, _| Ok(TokenAmount::from_whole(2)));
        self
    }

    /// Everything the submit paths need short of aggregation and message
    /// acceptance.
    pub(crate) fn with_submit_env(mut self) -> Self {
        self.client
            .expect_state_miner_info()
            .returning(|_, _| Ok(test_miner_info()));
        self.client
            .expect_chain_base_fee()
            .returning(|_| Ok(TokenAmount::from_nano(1)));
        self.addr_sel
            .expect_select_address()
            .returning(|_, _, _, _| Ok((Address::new_id(WORKER_ID), TokenAmount::from_atto(0))));
        self
    }

    /// Aggregates anything into a canned proof.
    pub(crate) fn with_accepting_prover(mut self) -> Self {
        self.prover
            .expect_aggregate_seal_proofs()
            .returning(|_, _| Ok(AGGREGATE_BYTES.to_vec()));
        self
    }

    /// Accepts any message and returns the canned message cid.
    pub(crate) fn with_accepting_send(mut self) -> Self {
        let msg_cid = self.msg_cid;
        self.client
            .expect_send_msg()
            .returning(move |_, _, _, _, _, _| Ok(msg_cid));
        self
    }

    pub(crate) fn with_happy_mocks(self) -> Self {
        self.with_happy_lookups()
            .with_submit_env()
            .with_accepting_prover()
            .with_accepting_send()
    }

    pub(crate) fn start(
        self,
        config: BatcherConfig,
    ) -> CommitBatcher<MockChainClient, MockProofAggregator, MockAddressSelector> {
        CommitBatcher::start(
            miner_addr(),
            Arc::new(self.client),
            Arc::new(self.prover),
            Arc::new(self.addr_sel),
            FeeConfig::default(),
            config,
        )
        .expect("start batcher")
    }
}
