use std::thread;

use crate::search::prelude::*;

/// How long a generator sleeps when every tester queue is full.
const DISPATCH_BACKOFF: Duration = Duration::from_micros(200);

/// A generator's side of the pipeline: the batch being filled, a private pool to draw the next one from, and the
/// round-robin cursor over tester queues.
#[derive(Debug)]
pub struct Outbox {
    shared: Arc<CombinationQueueArray>,
    pool: BatchPool,
    batch: WorkBatch,
    cursor: usize,
    emitted: u64,
}

impl Outbox {
    pub fn new(shared: Arc<CombinationQueueArray>) -> Outbox {
        let mut pool = BatchPool::new(shared.batch_capacity(), shared.clicks());
        let batch = pool.take(&shared);
        Outbox { shared, pool, batch, cursor: 0, emitted: 0 }
    }

    /// Combinations accepted so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Batches this outbox had to allocate rather than reuse.
    pub fn allocated(&self) -> u64 {
        self.pool.allocated()
    }

    pub fn shared(&self) -> &CombinationQueueArray {
        &self.shared
    }

    /// Queues one combination, shipping the batch when it fills. Returns false once the search has been solved.
    #[inline]
    pub fn push(&mut self, combination: &[CellIndex]) -> bool {
        if !self.batch.push(combination) {
            if !self.dispatch() {
                return false;
            }
            self.batch.push(combination);
        }
        self.emitted += 1;
        true
    }

    /// Ships whatever is left in the current batch. Returns false if the search was solved first.
    pub fn flush(&mut self) -> bool {
        if self.batch.is_empty() {
            return !self.shared.is_solved();
        }
        self.dispatch()
    }

    /// Offers the current batch to each tester queue in turn, starting after the last one that accepted, and sleeps
    /// between full passes until one has room. A fresh batch from the pool takes its place.
    fn dispatch(&mut self) -> bool {
        let fresh = self.pool.take(&self.shared);
        let mut batch = std::mem::replace(&mut self.batch, fresh);
        let lanes = self.shared.len();

        loop {
            for step in 0..lanes {
                let lane = (self.cursor + step) % lanes;
                match self.shared.queue(lane).offer(batch) {
                    Ok(()) => {
                        self.cursor = (lane + 1) % lanes;
                        return true;
                    }
                    Err(rejected) => batch = rejected,
                }
            }
            if self.shared.is_solved() {
                self.pool.give(batch);
                return false;
            }
            log::trace!("all {lanes} tester queues full; backing off");
            thread::sleep(DISPATCH_BACKOFF);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(consumers: usize) -> Arc<CombinationQueueArray> {
        let config = SearchConfig::new()
            .with_clicks(2)
            .with_consumers(consumers)
            .with_generators(1)
            .with_batch_capacity(2)
            .with_queue_depth(1);
        Arc::new(CombinationQueueArray::new(&config))
    }

    #[test]
    fn batches_go_round_robin() {
        let shared = shared(3);
        let mut outbox = Outbox::new(shared.clone());
        for i in 0..6u8 {
            assert!(outbox.push(&[i, i + 1]));
        }
        assert!(outbox.flush());
        assert_eq!((0..3).map(|q| shared.queue(q).len()).collect::<Vec<_>>(), vec![1, 1, 1]);
        assert_eq!(shared.queue(1).take().unwrap().front(), Some(&[2, 3][..]));
        assert_eq!(outbox.emitted(), 6);
    }

    #[test]
    fn full_queues_give_way_to_cancellation() {
        let shared = shared(1);
        let mut outbox = Outbox::new(shared.clone());
        for i in 0..4u8 {
            assert!(outbox.push(&[i, 50])); // the second batch stays local, the queue holds the first
        }

        let canceller = {
            let shared = shared.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(20));
                shared.publish(0, &[0, 50])
            })
        };
        assert!(!outbox.push(&[9, 50])); // blocks on the full queue until the search is solved
        assert!(canceller.join().unwrap());
        assert_eq!(shared.queue(0).len(), 1);
    }
}
