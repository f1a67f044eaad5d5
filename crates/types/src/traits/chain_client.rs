use async_trait::async_trait;
use cid::Cid;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use fvm_shared::econ::TokenAmount;
use fvm_shared::sector::SectorNumber;
use fvm_shared::version::NetworkVersion;
use fvm_shared::MethodNum;
use thiserror::Error;

use crate::types::{MinerInfo, SectorPreCommitInfo, SectorPreCommitOnChainInfo};

/// Opaque handle pinning chain-state queries to a specific chain view.
///
/// An empty token addresses the current head.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TipSetToken(Vec<u8>);

impl TipSetToken {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// View of the chain node required by the commit pipeline.
///
/// State queries take a [`TipSetToken`] so that a sequence of reads observes
/// one consistent chain view.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Signs and pushes a message to the message pool, returning its
    /// identifier.
    async fn send_msg(
        &self,
        from: &Address,
        to: &Address,
        method: MethodNum,
        value: TokenAmount,
        max_fee: TokenAmount,
        params: RawBytes,
    ) -> Result<Cid, ChainClientError>;

    async fn state_miner_info(
        &self,
        miner: &Address,
        tok: &TipSetToken,
    ) -> Result<MinerInfo, ChainClientError>;

    /// Current head: its token and epoch.
    async fn chain_head(&self) -> Result<(TipSetToken, ChainEpoch), ChainClientError>;

    async fn chain_base_fee(&self, tok: &TipSetToken) -> Result<TokenAmount, ChainClientError>;

    /// The sector's pre-commit record, or `None` if it never landed on chain
    /// or has already been proven.
    async fn state_sector_precommit_info(
        &self,
        miner: &Address,
        sector_number: SectorNumber,
        tok: &TipSetToken,
    ) -> Result<Option<SectorPreCommitOnChainInfo>, ChainClientError>;

    async fn state_miner_initial_pledge_collateral(
        &self,
        miner: &Address,
        info: &SectorPreCommitInfo,
        tok: &TipSetToken,
    ) -> Result<TokenAmount, ChainClientError>;

    async fn state_network_version(
        &self,
        tok: &TipSetToken,
    ) -> Result<NetworkVersion, ChainClientError>;
}

/// Errors that can occur when talking to the chain node.
#[derive(Debug, Error)]
pub enum ChainClientError {
    /// Network-related error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// RPC call failed.
    #[error("rpc error: {0}")]
    Rpc(String),

    /// Other unspecified error.
    #[error(transparent)]
    Other(#[from] eyre::Error),
}

impl ChainClientError {
    /// Creates a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Creates an RPC error.
    pub fn rpc(msg: impl Into<String>) -> Self {
        Self::Rpc(msg.into())
    }
}
