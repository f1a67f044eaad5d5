use async_trait::async_trait;
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;
use thiserror::Error;

use crate::types::MinerInfo;

/// What a selected address will be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressPurpose {
    PreCommit,
    Commit,
}

/// Picks the account a message is funded and sent from.
#[cfg_attr(feature = "test-utils", mockall::automock)]
#[async_trait]
pub trait AddressSelector: Send + Sync {
    /// Selects an address controlled by the miner that can cover
    /// `good_funds`, falling back to one covering at least `minimum_funds`.
    /// Returns the address and the amount reserved on it.
    async fn select_address(
        &self,
        miner_info: &MinerInfo,
        purpose: AddressPurpose,
        good_funds: &TokenAmount,
        minimum_funds: &TokenAmount,
    ) -> Result<(Address, TokenAmount), AddressSelectorError>;
}

/// Errors from funding address selection.
#[derive(Debug, Error)]
pub enum AddressSelectorError {
    /// No controlled address has the funds the message needs.
    #[error("no address with sufficient funds for {purpose:?} (needed {needed})")]
    NoGoodAddress {
        purpose: AddressPurpose,
        needed: TokenAmount,
    },

    #[error(transparent)]
    Other(#[from] eyre::Error),
}
