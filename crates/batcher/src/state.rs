//! Shared batcher state: pending inputs, listener sinks, and cutoffs.

use std::collections::HashMap;
use std::time::Duration;

use fvm_shared::sector::SectorNumber;
use sealing_types::{AggregateInput, CommitBatchResult};
use tokio::sync::oneshot;
use tokio::time::Instant;

/// Smallest delay the timer gate hands out for an already-due flush. Never
/// zero; a zero-delay timer would spin the scheduler.
const MIN_FLUSH_DELAY: Duration = Duration::from_nanos(1);

/// Listener sink for one `add_commit` caller. Single slot: the scheduler
/// sends without waiting and abandons slots whose reader has gone away.
type ResultSink = oneshot::Sender<CommitBatchResult>;

/// The three sector-keyed maps guarded by the batcher mutex.
///
/// Their key sets agree at every stable point; batch close is the only place
/// they diverge, transiently, while results are fanned out.
#[derive(Debug, Default)]
pub(crate) struct BatcherState {
    todo: HashMap<SectorNumber, AggregateInput>,
    waiting: HashMap<SectorNumber, Vec<ResultSink>>,
    cutoffs: HashMap<SectorNumber, Instant>,
}

impl BatcherState {
    /// Registers a sector for the next batch and returns the receiver its
    /// result will arrive on.
    ///
    /// Re-adding a sector replaces its input and cutoff and appends another
    /// listener; all of a sector's listeners receive the same result.
    pub(crate) fn add(
        &mut self,
        sector_number: SectorNumber,
        input: AggregateInput,
        cutoff: Instant,
    ) -> oneshot::Receiver<CommitBatchResult> {
        let (tx, rx) = oneshot::channel();
        self.cutoffs.insert(sector_number, cutoff);
        self.todo.insert(sector_number, input);
        self.waiting.entry(sector_number).or_default().push(tx);
        rx
    }

    pub(crate) fn todo_len(&self) -> usize {
        self.todo.len()
    }

    /// Pending inputs, in no particular order.
    pub(crate) fn todo(&self) -> impl Iterator<Item = (&SectorNumber, &AggregateInput)> {
        self.todo.iter()
    }

    pub(crate) fn input(&self, sector_number: SectorNumber) -> Option<&AggregateInput> {
        self.todo.get(&sector_number)
    }

    /// Delivers `res` to every listener of `sector_number` (in registration
    /// order) and erases the sector from all three maps.
    pub(crate) fn complete(&mut self, sector_number: SectorNumber, res: &CommitBatchResult) {
        for sink in self.waiting.remove(&sector_number).unwrap_or_default() {
            let _ = sink.send(res.clone());
        }
        self.todo.remove(&sector_number);
        self.cutoffs.remove(&sector_number);
    }

    /// Snapshot of the pending sector numbers, unordered.
    pub(crate) fn pending(&self) -> Vec<SectorNumber> {
        self.todo.keys().copied().collect()
    }

    /// Timer gate: how long the scheduler may sleep before it must consider
    /// a below-maximum flush. `None` when no timer is needed because nothing
    /// is pending.
    pub(crate) fn next_flush_delay(
        &self,
        max_wait: Duration,
        slack: Duration,
        now: Instant,
    ) -> Option<Duration> {
        if self.todo.is_empty() {
            return None;
        }

        // Both maps are scanned; in steady state their keys agree.
        let earliest = self
            .todo
            .keys()
            .chain(self.waiting.keys())
            .filter_map(|sector| self.cutoffs.get(sector))
            .min()
            .copied();

        let Some(cutoff) = earliest else {
            // No cutoff constraint recorded; wake after the idle maximum.
            return Some(max_wait);
        };

        let target = cutoff.checked_sub(slack).unwrap_or(now);
        if target <= now {
            return Some(MIN_FLUSH_DELAY);
        }
        Some((target - now).min(max_wait))
    }

    #[cfg(test)]
    pub(crate) fn keysets_agree(&self) -> bool {
        self.todo.len() == self.waiting.len()
            && self.todo.len() == self.cutoffs.len()
            && self
                .todo
                .keys()
                .all(|sn| self.waiting.contains_key(sn) && self.cutoffs.contains_key(sn))
    }
}
