//! Producer-facing commit batcher.

use std::sync::Arc;

use fvm_shared::address::Address;
use fvm_shared::sector::SectorID;
use sealing_types::{
    AddressSelector, AggregateInput, ChainClient, CommitBatchResult, ProofAggregator, SectorInfo,
};
use tokio::sync::{mpsc, oneshot, watch, Mutex, Notify};

use crate::config::{BatcherConfig, FeeConfig};
use crate::cutoff::commit_cutoff;
use crate::error::BatcherError;
use crate::state::BatcherState;
use crate::task::batcher_task;

/// Immutable dependencies shared by the producer API and the scheduler.
pub(crate) struct BatcherCtx<C, P, A> {
    pub(crate) client: Arc<C>,
    pub(crate) prover: Arc<P>,
    pub(crate) addr_sel: Arc<A>,
    pub(crate) miner_addr: Address,
    pub(crate) fee_config: FeeConfig,
    pub(crate) config: BatcherConfig,
}

/// Coalesces per-sector commit submissions into aggregate on-chain messages.
///
/// Any number of producers call [`add_commit`](Self::add_commit)
/// concurrently; a single scheduler task owns the decision to close a batch
/// and fans each batch's outcome back to every caller whose sector it
/// covered.
///
/// Cancellation is by dropping the returned future. A dropped `add_commit`
/// abandons only the wait: the sector stays enqueued and is still submitted
/// by a later batch.
pub struct CommitBatcher<C, P, A> {
    ctx: Arc<BatcherCtx<C, P, A>>,
    state: Arc<Mutex<BatcherState>>,
    notify: Arc<Notify>,
    force_tx: mpsc::Sender<oneshot::Sender<Vec<CommitBatchResult>>>,
    stop_tx: watch::Sender<bool>,
    stopped_rx: watch::Receiver<bool>,
}

impl<C, P, A> CommitBatcher<C, P, A>
where
    C: ChainClient + 'static,
    P: ProofAggregator + 'static,
    A: AddressSelector + 'static,
{
    /// Validates the configuration and spawns the scheduler task.
    ///
    /// One batcher instance serves one miner; `miner_addr` must be the
    /// miner's ID address.
    pub fn start(
        miner_addr: Address,
        client: Arc<C>,
        prover: Arc<P>,
        addr_sel: Arc<A>,
        fee_config: FeeConfig,
        config: BatcherConfig,
    ) -> Result<Self, BatcherError> {
        config.validate()?;

        let ctx = Arc::new(BatcherCtx {
            client,
            prover,
            addr_sel,
            miner_addr,
            fee_config,
            config,
        });
        let state = Arc::new(Mutex::new(BatcherState::default()));
        let notify = Arc::new(Notify::new());
        let (force_tx, force_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (stopped_tx, stopped_rx) = watch::channel(false);

        tokio::spawn(batcher_task(
            ctx.clone(),
            state.clone(),
            notify.clone(),
            force_rx,
            stop_rx,
            stopped_tx,
        ));

        Ok(Self {
            ctx,
            state,
            notify,
            force_tx,
            stop_tx,
            stopped_rx,
        })
    }

    /// Registers a sector for the next commit batch and waits for the
    /// outcome of the message that covers it.
    ///
    /// Computes the sector's cutoff first; on failure nothing is enqueued.
    /// Re-adding a sector replaces its pending input and appends another
    /// listener, and every listener receives the same result.
    pub async fn add_commit(
        &self,
        sector: SectorInfo,
        input: AggregateInput,
    ) -> Result<CommitBatchResult, BatcherError> {
        let cutoff = commit_cutoff(self.ctx.client.as_ref(), &self.ctx.miner_addr, &sector).await?;

        let rx = {
            let mut state = self.state.lock().await;
            state.add(sector.sector_number, input, cutoff)
        };
        // One-slot signal: posts if empty, coalesces otherwise.
        self.notify.notify_one();

        rx.await.map_err(|_| BatcherError::Stopped)
    }

    /// Forces a batch close now and returns its results. An empty list when
    /// nothing was pending.
    pub async fn flush(&self) -> Result<Vec<CommitBatchResult>, BatcherError> {
        let (tx, rx) = oneshot::channel();
        self.force_tx
            .send(tx)
            .await
            .map_err(|_| BatcherError::Stopped)?;
        rx.await.map_err(|_| BatcherError::Stopped)
    }

    /// Snapshot of the sectors waiting to be committed, ascending by
    /// (miner, sector number).
    pub async fn pending(&self) -> Result<Vec<SectorID>, BatcherError> {
        let miner = self
            .ctx
            .miner_addr
            .id()
            .map_err(|_| BatcherError::NonIdMinerAddress)?;

        let state = self.state.lock().await;
        let mut pending: Vec<SectorID> = state
            .pending()
            .into_iter()
            .map(|number| SectorID { miner, number })
            .collect();
        drop(state);

        pending.sort_by_key(|sector| (sector.miner, sector.number));
        Ok(pending)
    }

    /// Stops the scheduler and waits for it to acknowledge. Idempotent; no
    /// messages are submitted after the first call returns.
    pub async fn stop(&self) -> Result<(), BatcherError> {
        // Send fails only when the scheduler is already gone.
        let _ = self.stop_tx.send(true);

        let mut stopped = self.stopped_rx.clone();
        let _ = stopped.wait_for(|stopped| *stopped).await;
        Ok(())
    }
}
