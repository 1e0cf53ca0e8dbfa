use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    OnceLock
};

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use itertools::Itertools;

use crate::search::prelude::*;

/// A bounded lock-free multi-producer, multi-consumer queue of batches.
///
/// Both ends live together so any generator can offer into it and any tester can take (or steal) from it.
#[derive(Debug)]
pub struct CombinationQueue {
    tx: Sender<WorkBatch>,
    rx: Receiver<WorkBatch>,
}

impl CombinationQueue {
    /// A queue holding at most `depth` batches.
    pub fn new(depth: usize) -> CombinationQueue {
        let (tx, rx) = bounded(depth);
        CombinationQueue { tx, rx }
    }

    /// Enqueues the batch if there is room, otherwise hands it back.
    #[inline]
    pub fn offer(&self, batch: WorkBatch) -> std::result::Result<(), WorkBatch> {
        match self.tx.try_send(batch) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(batch) | TrySendError::Disconnected(batch)) => Err(batch),
        }
    }

    /// Dequeues a batch if one is present.
    #[inline]
    pub fn take(&self) -> Option<WorkBatch> {
        self.rx.try_recv().ok()
    }

    /// Blocks for at most `timeout` waiting for a batch. The queue holds its own sender, so it never disconnects.
    pub fn wait(&self, timeout: Duration) -> Option<WorkBatch> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }
}

/// A winning combination and the tester that found it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub tester: usize,
    pub combination: Vec<CellIndex>,
}

impl Solution {
    /// The clicks as coordinates.
    pub fn coords(&self) -> Vec<Coord> {
        self.combination.iter().map(|&i| Coord::from_index_unchecked(i)).collect()
    }

    /// The clicks in the requested encoding.
    pub fn encoded(&self, encoding: Encoding) -> Vec<usize> {
        self.coords().iter().map(|c| c.encode(encoding)).collect()
    }

    pub fn notate(&self) -> String {
        self.coords().iter().join(" ")
    }
}

/// Everything the generators and testers of one run share: one queue per tester, the lane spent batches travel back
/// on, the count of unfinished generators, and the single-assignment solution slot.
#[derive(Debug)]
pub struct CombinationQueueArray {
    queues: Vec<CombinationQueue>,

    /// Emptied batches on their way back to a generator's pool.
    recycled: CombinationQueue,

    /// Generators that have not yet finished their share of the space.
    outstanding: AtomicUsize,

    complete: AtomicBool,

    /// Monotonic; flips to true exactly once, when `solution` is filled.
    solved: AtomicBool,

    solution: OnceLock<Solution>,

    clicks: usize,

    batch_capacity: usize,
}

impl CombinationQueueArray {
    pub fn new(config: &SearchConfig) -> CombinationQueueArray {
        let queues = (0..config.consumers).map(|_| CombinationQueue::new(config.queue_depth)).collect::<Vec<_>>();
        CombinationQueueArray {
            recycled: CombinationQueue::new(config.consumers * config.queue_depth),
            queues,
            outstanding: AtomicUsize::new(config.generators),
            complete: AtomicBool::new(config.generators == 0),
            solved: AtomicBool::new(false),
            solution: OnceLock::new(),
            clicks: config.clicks,
            batch_capacity: config.batch_capacity,
        }
    }

    /// The number of tester queues.
    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn queue(&self, index: usize) -> &CombinationQueue {
        &self.queues[index]
    }

    /// The clicks per combination in this run.
    pub fn clicks(&self) -> usize {
        self.clicks
    }

    /// Combinations per batch in this run.
    pub fn batch_capacity(&self) -> usize {
        self.batch_capacity
    }

    /// Whether every tester queue is empty at the moment of the check.
    pub fn all_empty(&self) -> bool {
        self.queues.iter().all(|q| q.is_empty())
    }

    /// Called once by each generator when it has no more work, whether it ran dry or was cancelled.
    pub fn generator_finished(&self) {
        if self.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.complete.store(true, Ordering::Release);
            log::debug!("generation complete");
        }
    }

    /// Marks generation complete even though some generators never reported in, e.g. because one panicked.
    /// Only safe once every generator thread has stopped.
    pub fn abandon_generation(&self) {
        let missing = self.outstanding.swap(0, Ordering::AcqRel);
        self.complete.store(true, Ordering::Release);
        log::warn!("generation abandoned with {missing} generators unaccounted for");
    }

    /// True once the last generator has finished. Every batch it offered is visible to whoever observes this.
    #[inline]
    pub fn generation_complete(&self) -> bool {
        self.complete.load(Ordering::Acquire)
    }

    /// The shared cancellation signal.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.solved.load(Ordering::Acquire)
    }

    /// Records a winning combination. Only the first caller wins; everyone after gets `false` and changes nothing.
    pub fn publish(&self, tester: usize, combination: &[CellIndex]) -> bool {
        if self.is_solved() {
            return false;
        }
        let candidate = Solution { tester, combination: combination.to_vec() };
        if self.solution.set(candidate).is_ok() {
            self.solved.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// The published solution, if any.
    pub fn solution(&self) -> Option<&Solution> {
        self.solution.get()
    }

    /// Returns an emptied batch for reuse; dropped if the lane is full.
    pub fn recycle(&self, mut batch: WorkBatch) {
        batch.clear();
        let _ = self.recycled.offer(batch);
    }

    /// A previously used batch, if one is waiting.
    pub fn reclaim(&self) -> Option<WorkBatch> {
        self.recycled.take()
    }
}
