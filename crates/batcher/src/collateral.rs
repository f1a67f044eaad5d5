//! Collateral owed when a sector is proven: the initial pledge less what the
//! pre-commit deposit already covers.

use eyre::{eyre, WrapErr};
use fvm_shared::address::Address;
use fvm_shared::econ::TokenAmount;
use fvm_shared::sector::SectorNumber;
use sealing_types::{ChainClient, TipSetToken};

pub(crate) async fn sector_collateral<C: ChainClient>(
    client: &C,
    miner: &Address,
    sector_number: SectorNumber,
    tok: &TipSetToken,
) -> eyre::Result<TokenAmount> {
    let pci = client
        .state_sector_precommit_info(miner, sector_number, tok)
        .await
        .wrap_err("getting precommit info")?
        .ok_or_else(|| eyre!("precommit info not found on chain"))?;

    let pledge = client
        .state_miner_initial_pledge_collateral(miner, &pci.info, tok)
        .await
        .wrap_err("getting initial pledge collateral")?;

    // The deposit can exceed the pledge; never ask for negative funds.
    Ok(std::cmp::max(
        pledge - pci.pre_commit_deposit,
        TokenAmount::from_atto(0),
    ))
}
