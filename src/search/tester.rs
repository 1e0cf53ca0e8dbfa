use crate::search::prelude::*;

/// How long an idle tester waits on its own queue before re-checking for termination.
const FETCH_BACKOFF: Duration = Duration::from_micros(500);

/// What an idle tester should do next.
#[derive(Debug)]
pub enum Wait {
    Batch(WorkBatch),
    TimedOut,
    /// Generation is complete and every queue is drained; nothing more can arrive.
    Finished,
}

/// What a tester hands back when it stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TesterReport {
    pub id: usize,
    /// Combinations taken off a batch.
    pub tested: u64,
    /// Combinations the parity pre-filter threw out.
    pub rejected: u64,
    /// Combinations that were clicked out on the grid.
    pub simulated: u64,
    /// Batches taken from another tester's queue.
    pub stolen: u64,
    /// Whether this tester's solution is the one that was published.
    pub published: bool,
}

impl TesterReport {
    /// Candidates that turned out not to solve the board.
    pub fn failures(&self) -> u64 {
        self.rejected + self.simulated - self.published as u64
    }
}

/// A consumer worker: fetches batches (stealing when its own queue is dry), pre-filters, simulates on a private grid,
/// and publishes the first solution it finds.
#[derive(Debug)]
pub struct Tester {
    id: usize,
    grid: Grid,
    filter: Arc<ParityFilter>,
    shared: Arc<CombinationQueueArray>,
    /// The batch being worked through; transport batches are emptied into it and sent straight back for reuse.
    inbox: WorkBatch,
    scratch: Vec<CellIndex>,
    heartbeat: u64,
    next_heartbeat: u64,
    report: TesterReport,
}

impl Tester {
    /// A tester with its own copy of `grid`.
    pub fn new(id: usize, grid: &Grid, filter: Arc<ParityFilter>, shared: Arc<CombinationQueueArray>, heartbeat: u64) -> Tester {
        let inbox = WorkBatch::new(shared.batch_capacity(), shared.clicks());
        let scratch = vec![0; shared.clicks()];
        let heartbeat = heartbeat.max(1);
        Tester {
            id,
            grid: grid.clone(),
            filter,
            shared,
            inbox,
            scratch,
            heartbeat,
            next_heartbeat: heartbeat,
            report: TesterReport { id, ..TesterReport::default() },
        }
    }

    /// Runs until the board is solved, or until generation is complete and every queue is empty.
    pub fn run(mut self) -> TesterReport {
        'fetch: loop {
            if self.shared.is_solved() {
                break;
            }
            let mut batch = match self.fetch() {
                Some(batch) => batch,
                None => match self.idle() {
                    Wait::Batch(batch) => batch,
                    Wait::TimedOut => continue,
                    Wait::Finished => break,
                },
            };

            batch.drain_to(&mut self.inbox);
            self.shared.recycle(batch);

            while self.inbox.pop_into(&mut self.scratch) {
                if self.shared.is_solved() {
                    break 'fetch;
                }
                if self.test_scratch() {
                    break 'fetch;
                }
            }
        }

        log::debug!(
            "tester {} stopping: {} tested, {} rejected by parity, {} simulated, {} stolen",
            self.id, self.report.tested, self.report.rejected, self.report.simulated, self.report.stolen
        );
        self.report
    }

    /// Own queue first, then one attempt at each peer in turn.
    fn fetch(&mut self) -> Option<WorkBatch> {
        if let Some(batch) = self.shared.queue(self.id).take() {
            return Some(batch);
        }
        let peers = self.shared.len();
        for step in 1..peers {
            if let Some(batch) = self.shared.queue((self.id + step) % peers).take() {
                self.report.stolen += 1;
                return Some(batch);
            }
        }
        None
    }

    /// Nothing to do right now: stop if nothing more can ever arrive, otherwise wait briefly on the own queue.
    fn idle(&self) -> Wait {
        // completion must be read before emptiness: once it is set no generator can add work
        if self.shared.generation_complete() && self.shared.all_empty() {
            return Wait::Finished;
        }
        match self.shared.queue(self.id).wait(FETCH_BACKOFF) {
            Some(batch) => Wait::Batch(batch),
            None => Wait::TimedOut,
        }
    }

    /// Validates, then simulates, the combination in `scratch`. Returns true when the search is over for this tester.
    fn test_scratch(&mut self) -> bool {
        self.report.tested += 1;

        if !self.filter.admits(&self.scratch) {
            self.report.rejected += 1;
            self.beat();
            return false;
        }

        self.report.simulated += 1;
        self.grid.click_all_unchecked(&self.scratch);
        if self.grid.is_solved() {
            if self.shared.publish(self.id, &self.scratch) {
                self.report.published = true;
                let coords = self.scratch.iter().map(|&i| Coord::from_index_unchecked(i).to_string()).collect::<Vec<_>>();
                log::info!("tester {} found a solution: {}", self.id, coords.join(" "));
            }
            return true;
        }
        self.grid.reset();
        self.beat();
        false
    }

    fn beat(&mut self) {
        if self.report.failures() >= self.next_heartbeat {
            self.next_heartbeat += self.heartbeat;
            log::debug!("tester {}: {} failed candidates so far", self.id, self.report.failures());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    const TESTERS: usize = 6;
    const BATCHES_PER_QUEUE: usize = 4;

    fn index(packed: usize) -> CellIndex {
        Coord::decode(packed, Encoding::Packed).unwrap().index()
    }

    /// Queues filled with batches of the given combinations, with generation already complete.
    fn loaded(combinations: &[[CellIndex; 2]]) -> Arc<CombinationQueueArray> {
        let config = SearchConfig::new()
            .with_clicks(2)
            .with_consumers(TESTERS)
            .with_generators(1)
            .with_batch_capacity(combinations.len())
            .with_queue_depth(BATCHES_PER_QUEUE);
        let shared = Arc::new(CombinationQueueArray::new(&config));
        for lane in 0..TESTERS {
            for _ in 0..BATCHES_PER_QUEUE {
                let mut batch = WorkBatch::new(combinations.len(), 2);
                combinations.iter().for_each(|c| { batch.push(c); });
                assert!(shared.queue(lane).offer(batch).is_ok());
            }
        }
        shared.generator_finished();
        shared
    }

    fn run_all(grid: &Grid, shared: &Arc<CombinationQueueArray>) -> Vec<TesterReport> {
        let filter = Arc::new(ParityFilter::new(grid));
        let handles = (0..TESTERS).map(|id| {
            let tester = Tester::new(id, grid, filter.clone(), shared.clone(), 1000);
            thread::spawn(move || tester.run())
        }).collect::<Vec<_>>();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    }

    #[test]
    fn planted_solutions_publish_exactly_once() {
        let grid = Grid::from_variant(&Variant::Pair);
        let solution = [index(103), index(511)];
        let shared = loaded(&[[0, 1], [2, 3], solution, [4, 5]]);

        let reports = run_all(&grid, &shared);

        assert_eq!(reports.iter().filter(|r| r.published).count(), 1);
        let published = shared.solution().unwrap();
        assert_eq!(published.combination, solution.to_vec());
        assert!(reports[published.tester].published);
        assert_eq!(published.encoded(Encoding::Packed), vec![103, 511]);
    }

    #[test]
    fn idles_until_generation_is_complete() {
        let grid = Grid::from_variant(&Variant::Pair);
        let config = SearchConfig::new().with_clicks(2).with_consumers(2).with_generators(1);
        let shared = Arc::new(CombinationQueueArray::new(&config));
        let filter = Arc::new(ParityFilter::new(&grid));
        let tester = Tester::new(0, &grid, filter, shared.clone(), 1000);

        assert!(matches!(tester.idle(), Wait::TimedOut));

        assert!(shared.queue(0).offer(WorkBatch::new(4, 2)).is_ok());
        shared.generator_finished();
        assert!(matches!(tester.idle(), Wait::Batch(_)));
        assert!(matches!(tester.idle(), Wait::Finished));
    }

    #[test]
    fn drains_everything_when_nothing_solves() {
        let grid = Grid::from_variant(&Variant::Pair);
        let shared = loaded(&[[0, 1], [2, 3], [4, 5]]);

        let reports = run_all(&grid, &shared);

        assert!(shared.solution().is_none());
        assert!(shared.all_empty());
        let tested = reports.iter().map(|r| r.tested).sum::<u64>();
        assert_eq!(tested, (TESTERS * BATCHES_PER_QUEUE * 3) as u64);
        let failures = reports.iter().map(|r| r.failures()).sum::<u64>();
        assert_eq!(failures, tested);
    }
}
