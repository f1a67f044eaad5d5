//! Scheduler task: one select loop owning the batch-close decision.

use std::sync::Arc;
use std::time::Duration;

use sealing_types::{AddressSelector, ChainClient, CommitBatchResult, ProofAggregator};
use tokio::sync::{mpsc, oneshot, watch, Mutex, Notify};
use tokio::time;
use tracing::{debug, warn};

use crate::batcher::BatcherCtx;
use crate::close::{maybe_start_batch, WakeReason};
use crate::state::BatcherState;

/// Runs until stopped, waking on producer notifications, the timer gate, and
/// flush requests. A flush request is answered at the top of the following
/// iteration with whatever the close it triggered produced.
pub(crate) async fn batcher_task<C, P, A>(
    ctx: Arc<BatcherCtx<C, P, A>>,
    state: Arc<Mutex<BatcherState>>,
    notify: Arc<Notify>,
    mut force_rx: mpsc::Receiver<oneshot::Sender<Vec<CommitBatchResult>>>,
    mut stop_rx: watch::Receiver<bool>,
    stopped_tx: watch::Sender<bool>,
) where
    C: ChainClient,
    P: ProofAggregator,
    A: AddressSelector,
{
    let mut force_reply: Option<oneshot::Sender<Vec<CommitBatchResult>>> = None;
    let mut last_results: Vec<CommitBatchResult> = Vec::new();

    loop {
        if let Some(reply) = force_reply.take() {
            // The flush caller may have gone away; nothing is lost.
            let _ = reply.send(std::mem::take(&mut last_results));
        }
        last_results = Vec::new();

        let delay = {
            let state = state.lock().await;
            state.next_flush_delay(ctx.config.batch_wait, ctx.config.batch_slack, time::Instant::now())
        };

        let wake = tokio::select! {
            _ = stop_rx.wait_for(|stop| *stop) => break,
            _ = notify.notified() => WakeReason::Add,
            _ = flush_timer(delay) => WakeReason::Timer,
            req = force_rx.recv() => match req {
                Some(reply) => {
                    force_reply = Some(reply);
                    WakeReason::Flush
                }
                None => {
                    debug!("all batcher handles dropped; stopping scheduler");
                    break;
                }
            },
        };

        let mut state = state.lock().await;
        match maybe_start_batch(&mut state, &ctx, wake).await {
            Ok(results) => last_results = results,
            Err(err) => warn!(error = %err, "commit batch processing failed"),
        }
    }

    let _ = stopped_tx.send(true);
}

/// Sleeps until the timer gate's target, or forever when no timer is needed.
async fn flush_timer(delay: Option<Duration>) {
    match delay {
        Some(delay) => time::sleep(delay).await,
        None => std::future::pending().await,
    }
}
