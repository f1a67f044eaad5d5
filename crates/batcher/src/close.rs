//! Batch close: decide aggregate vs individual, assemble parameters, fund
//! and submit the messages, and fan results out to listeners.

use cid::Cid;
use eyre::{eyre, WrapErr};
use fvm_ipld_bitfield::BitField;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::econ::TokenAmount;
use fvm_shared::sector::{
    AggregateSealVerifyInfo, AggregateSealVerifyProofAndInfos, RegisteredAggregateProof,
    RegisteredSealProof, SectorNumber,
};
use sealing_policy::fees::aggregate_prove_commit_network_fee;
use sealing_policy::MIN_AGGREGATED_SECTORS;
use sealing_types::{
    AddressPurpose, AddressSelector, ChainClient, CommitBatchResult, MinerInfo, MinerMethod,
    ProofAggregator, ProveCommitAggregateParams, ProveCommitSectorParams, TipSetToken,
};
use tracing::{info, warn};

use crate::batcher::BatcherCtx;
use crate::collateral::sector_collateral;
use crate::state::BatcherState;

/// Aggregation scheme used for every aggregate submission, pinned to the
/// protocol's current default.
const SEAL_PROOF_AGGREGATION: RegisteredAggregateProof = RegisteredAggregateProof::SnarkPackV1;

/// Why the scheduler woke up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WakeReason {
    /// A producer registered a sector.
    Add,
    /// The timer gate fired: the earliest cutoff is near, or the idle
    /// maximum elapsed.
    Timer,
    /// An explicit flush request.
    Flush,
}

/// Closes the current batch if the wakeup reason and batch size call for it.
///
/// An `Add` wakeup only closes a full batch. `Timer` and `Flush` close
/// whatever is pending: by aggregation when the batch meets both the
/// configured minimum and the protocol floor, individually otherwise, so a
/// sector nearing its cutoff never waits for peers that may not come.
///
/// A fatal error (nothing selected, nothing submitted) leaves all state in
/// place for a later retry. Once sectors were selected they are completed
/// and erased no matter how the paths fared; their listeners learn the
/// outcome from the result itself.
pub(crate) async fn maybe_start_batch<C, P, A>(
    state: &mut BatcherState,
    ctx: &BatcherCtx<C, P, A>,
    wake: WakeReason,
) -> eyre::Result<Vec<CommitBatchResult>>
where
    C: ChainClient,
    P: ProofAggregator,
    A: AddressSelector,
{
    let total = state.todo_len();
    if total == 0 {
        return Ok(Vec::new());
    }

    if wake == WakeReason::Add && total < ctx.config.max_commit_batch {
        return Ok(Vec::new());
    }

    let results = if total < ctx.config.min_commit_batch || total < MIN_AGGREGATED_SECTORS {
        process_individually(state, ctx).await?
    } else {
        process_batch(state, ctx).await?
    };

    for res in &results {
        for &sector_number in &res.sectors {
            state.complete(sector_number, res);
        }
    }

    Ok(results)
}

/// Submits the pending sectors (up to the configured cap) as one
/// `ProveCommitAggregate` message.
///
/// Sectors whose collateral lookup fails are recorded in `failed_sectors`
/// and left out of the aggregate, but stay in `sectors`: their listeners are
/// served by this batch. Failures after selection are reported on the result
/// rather than returned, for the same reason.
async fn process_batch<C, P, A>(
    state: &BatcherState,
    ctx: &BatcherCtx<C, P, A>,
) -> eyre::Result<Vec<CommitBatchResult>>
where
    C: ChainClient,
    P: ProofAggregator,
    A: AddressSelector,
{
    let (tok, _) = ctx.client.chain_head().await.wrap_err("getting chain head")?;

    let total = state.todo_len();
    let mut res = CommitBatchResult::default();
    let mut sector_numbers = BitField::new();
    let mut infos: Vec<AggregateSealVerifyInfo> = Vec::new();
    let mut collateral = TokenAmount::from_atto(0);

    for (&sector_number, input) in state.todo() {
        if infos.len() >= ctx.config.max_commit_batch {
            info!(selected = infos.len(), pending = total, "commit batch full");
            break;
        }

        res.sectors.push(sector_number);

        match sector_collateral(ctx.client.as_ref(), &ctx.miner_addr, sector_number, &tok).await {
            Ok(sc) => {
                collateral = collateral + sc;
                sector_numbers.set(sector_number);
                infos.push(input.info.clone());
            }
            Err(err) => {
                res.failed_sectors
                    .insert(sector_number, format!("{err:#}"));
            }
        }
    }

    if infos.is_empty() {
        warn!(
            pending = total,
            "no aggregable sectors after collateral checks"
        );
        res.error = Some("all selected sectors failed collateral lookup".into());
        return Ok(vec![res]);
    }

    // The aggregation primitive requires the infos and proofs jointly sorted
    // by ascending sector number; map iteration has no useful order.
    infos.sort_by_key(|info| info.sector_number);

    let mut proofs = Vec::with_capacity(infos.len());
    for info in &infos {
        let input = state
            .input(info.sector_number)
            .ok_or_else(|| eyre!("sector {} vanished from the pending set", info.sector_number))?;
        proofs.push(input.proof.clone());
    }
    let seal_proof = state
        .input(infos[0].sector_number)
        .map(|input| input.seal_proof)
        .ok_or_else(|| eyre!("sector {} vanished from the pending set", infos[0].sector_number))?;

    match send_aggregate(
        ctx,
        &tok,
        sector_numbers,
        seal_proof,
        infos,
        proofs,
        collateral,
    )
    .await
    {
        Ok(message) => res.message = Some(message),
        Err(err) => {
            warn!(error = %err, "aggregate commit failed");
            res.error = Some(format!("{err:#}"));
        }
    }

    Ok(vec![res])
}

#[expect(
    clippy::too_many_arguments,
    reason = "the assembled batch pieces travel together"
)]
async fn send_aggregate<C, P, A>(
    ctx: &BatcherCtx<C, P, A>,
    tok: &TipSetToken,
    sector_numbers: BitField,
    seal_proof: RegisteredSealProof,
    infos: Vec<AggregateSealVerifyInfo>,
    proofs: Vec<Vec<u8>>,
    collateral: TokenAmount,
) -> eyre::Result<Cid>
where
    C: ChainClient,
    P: ProofAggregator,
    A: AddressSelector,
{
    let miner_id = ctx
        .miner_addr
        .id()
        .map_err(|_| eyre!("getting miner id: not an id address"))?;
    let sectors = infos.len();

    let aggregate = ctx
        .prover
        .aggregate_seal_proofs(
            AggregateSealVerifyProofAndInfos {
                miner: miner_id,
                seal_proof,
                aggregate_proof: SEAL_PROOF_AGGREGATION,
                proof: Vec::new(),
                infos,
            },
            &proofs,
        )
        .wrap_err("aggregating proofs")?;

    let params = ProveCommitAggregateParams {
        sector_numbers,
        aggregate_proof: RawBytes::new(aggregate),
    };
    let enc = RawBytes::serialize(&params).wrap_err("serializing aggregate commit params")?;

    let miner_info = ctx
        .client
        .state_miner_info(&ctx.miner_addr, &TipSetToken::default())
        .await
        .wrap_err("getting miner info")?;

    let max_fee = ctx.fee_config.max_commit_batch_gas_fee.fee_for_sectors(sectors);

    let base_fee = ctx
        .client
        .chain_base_fee(tok)
        .await
        .wrap_err("getting base fee")?;
    let nv = ctx
        .client
        .state_network_version(tok)
        .await
        .wrap_err("getting network version")?;
    let aggregate_fee = aggregate_prove_commit_network_fee(nv, sectors, &base_fee);

    let good_funds = max_fee.clone() + collateral.clone() + aggregate_fee;

    let (from, _) = ctx
        .addr_sel
        .select_address(&miner_info, AddressPurpose::Commit, &good_funds, &collateral)
        .await
        .wrap_err("no good address found")?;

    let message = ctx
        .client
        .send_msg(
            &from,
            &ctx.miner_addr,
            MinerMethod::ProveCommitAggregate.num(),
            collateral,
            max_fee,
            enc,
        )
        .await
        .wrap_err("sending aggregate commit message")?;

    info!(cid = %message, %from, sectors, "sent aggregate commit message");

    Ok(message)
}

/// Submits each pending sector as its own `ProveCommitSector` message.
///
/// Per-sector failures land in that sector's result; the path itself fails
/// only when the lookups before the loop do.
async fn process_individually<C, P, A>(
    state: &BatcherState,
    ctx: &BatcherCtx<C, P, A>,
) -> eyre::Result<Vec<CommitBatchResult>>
where
    C: ChainClient,
    P: ProofAggregator,
    A: AddressSelector,
{
    let miner_info = ctx
        .client
        .state_miner_info(&ctx.miner_addr, &TipSetToken::default())
        .await
        .wrap_err("getting miner info")?;
    let (tok, _) = ctx.client.chain_head().await.wrap_err("getting chain head")?;

    let mut results = Vec::with_capacity(state.todo_len());
    for (&sector_number, input) in state.todo() {
        let mut res = CommitBatchResult {
            sectors: vec![sector_number],
            ..Default::default()
        };

        match send_single(ctx, &miner_info, sector_number, &input.proof, &tok).await {
            Ok(message) => res.message = Some(message),
            Err(err) => {
                warn!(sector = sector_number, error = %err, "individual commit failed");
                res.failed_sectors
                    .insert(sector_number, format!("{err:#}"));
            }
        }

        results.push(res);
    }

    Ok(results)
}

async fn send_single<C, P, A>(
    ctx: &BatcherCtx<C, P, A>,
    miner_info: &MinerInfo,
    sector_number: SectorNumber,
    proof: &[u8],
    tok: &TipSetToken,
) -> eyre::Result<Cid>
where
    C: ChainClient,
    P: ProofAggregator,
    A: AddressSelector,
{
    let params = ProveCommitSectorParams {
        sector_number,
        proof: RawBytes::new(proof.to_vec()),
    };
    let enc = RawBytes::serialize(&params).wrap_err("serializing commit params")?;

    let collateral = sector_collateral(ctx.client.as_ref(), &ctx.miner_addr, sector_number, tok).await?;
    let good_funds = collateral.clone() + ctx.fee_config.max_commit_gas_fee.clone();

    let (from, _) = ctx
        .addr_sel
        .select_address(miner_info, AddressPurpose::Commit, &good_funds, &collateral)
        .await
        .wrap_err("no good address to send commit message from")?;

    let message = ctx
        .client
        .send_msg(
            &from,
            &ctx.miner_addr,
            MinerMethod::ProveCommitSector.num(),
            collateral,
            ctx.fee_config.max_commit_gas_fee.clone(),
            enc,
        )
        .await
        .wrap_err("pushing message to mpool")?;

    info!(cid = %message, sector = sector_number, "sent commit message");

    Ok(message)
}
