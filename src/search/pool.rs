use crate::search::prelude::*;

/// Batches reclaimed from the shared lane in one go when the local list runs dry.
const REFILL: usize = 8;

/// A worker-private free list of batches.
///
/// Never shared between threads: it refills from the shared recycle lane and, when that is empty too, falls back to
/// allocating a fresh batch.
#[derive(Debug)]
pub struct BatchPool {
    free: Vec<WorkBatch>,
    capacity: usize,
    width: usize,
    allocated: u64,
}

impl BatchPool {
    /// A pool of batches holding `capacity` combinations of `width` clicks.
    pub fn new(capacity: usize, width: usize) -> BatchPool {
        BatchPool { free: Vec::with_capacity(REFILL), capacity, width, allocated: 0 }
    }

    /// Hands out an empty batch.
    pub fn take(&mut self, shared: &CombinationQueueArray) -> WorkBatch {
        if self.free.is_empty() {
            while self.free.len() < REFILL {
                match shared.reclaim() {
                    Some(batch) if self.fits(&batch) => self.free.push(batch),
                    Some(_) => continue,
                    None => break,
                }
            }
        }
        self.free.pop().unwrap_or_else(|| {
            self.allocated += 1;
            WorkBatch::new(self.capacity, self.width)
        })
    }

    /// Keeps an emptied batch for later.
    pub fn give(&mut self, mut batch: WorkBatch) {
        if self.fits(&batch) && self.free.len() < REFILL {
            batch.clear();
            self.free.push(batch);
        }
    }

    /// How many batches this pool has had to allocate.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    fn fits(&self, batch: &WorkBatch) -> bool {
        batch.capacity() == self.capacity && batch.width() == self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_before_allocating() {
        let config = SearchConfig::new().with_clicks(3).with_batch_capacity(8).with_consumers(1).with_generators(1);
        let shared = CombinationQueueArray::new(&config);
        let mut pool = BatchPool::new(8, 3);

        let first = pool.take(&shared);
        assert_eq!(pool.allocated(), 1);
        pool.give(first);
        let _ = pool.take(&shared);
        assert_eq!(pool.allocated(), 1);

        shared.recycle(WorkBatch::new(8, 3));
        shared.recycle(WorkBatch::new(2, 2)); // wrong shape, discarded
        let reclaimed = pool.take(&shared);
        assert_eq!(reclaimed.capacity(), 8);
        assert_eq!(pool.allocated(), 1);
        let _ = pool.take(&shared);
        assert_eq!(pool.allocated(), 2);
    }
}
