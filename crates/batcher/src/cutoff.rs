//! Deadline oracle: the wall-clock instant by which a sector's commit must
//! have landed on chain.

use fvm_shared::address::Address;
use sealing_policy::{epochs_to_duration, max_prove_commit_duration, ActorsVersion};
use sealing_types::{ChainClient, SectorInfo};
use tokio::time::Instant;

use crate::error::BatcherError;

/// The earliest of the sector's proof-validity expiry and any deal start.
///
/// The proof window opens at the sector's on-chain pre-commit epoch and
/// spans the prove-commit duration for its proof type; a piece with a deal
/// additionally has to be proven before the deal activates. A cutoff that
/// has already passed comes back as "now".
pub(crate) async fn commit_cutoff<C: ChainClient>(
    client: &C,
    miner: &Address,
    sector: &SectorInfo,
) -> Result<Instant, BatcherError> {
    let (tok, current_epoch) = client.chain_head().await?;
    let nv = client.state_network_version(&tok).await?;
    let pci = client
        .state_sector_precommit_info(miner, sector.sector_number, &tok)
        .await?
        .ok_or(BatcherError::PrecommitNotFound(sector.sector_number))?;

    let window = max_prove_commit_duration(ActorsVersion::for_network(nv), sector.sector_type)
        .ok_or(BatcherError::UnknownProofDuration(sector.sector_type))?;
    let mut cutoff_epoch = pci.pre_commit_epoch + window;

    for piece in &sector.pieces {
        if let Some(deal) = &piece.deal_info {
            cutoff_epoch = cutoff_epoch.min(deal.deal_schedule.start_epoch);
        }
    }

    let now = Instant::now();
    if cutoff_epoch <= current_epoch {
        return Ok(now);
    }
    Ok(now + epochs_to_duration(cutoff_epoch - current_epoch))
}
