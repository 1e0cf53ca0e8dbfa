use std::thread::{self, JoinHandle};

use crossbeam_deque::{Injector, Steal};

use super::{CombinationSink, GenerationPlan, GeneratorReport, CANCEL_INTERVAL};
use crate::search::prelude::*;

/// A contiguous range of first clicks, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub start: CellIndex,
    pub end: CellIndex,
}

/// The claim queue: filled once up front, then drained by idle generators one chunk at a time.
#[derive(Debug)]
pub struct ChunkClaims {
    injector: Injector<Chunk>,
    total: usize,
}

impl ChunkClaims {
    /// Splits the possible first clicks of `plan` into chunks of `chunk_size`.
    pub fn partition(plan: &GenerationPlan, chunk_size: usize) -> ChunkClaims {
        let injector = Injector::new();
        let first = plan.space.start as usize;
        let end = plan.space.first_click_end(plan.clicks);
        let mut total = 0;
        for start in (first..end).step_by(chunk_size.max(1)) {
            let stop = (start + chunk_size).min(end);
            injector.push(Chunk { start: start as CellIndex, end: stop as CellIndex });
            total += 1;
        }
        ChunkClaims { injector, total }
    }

    /// The number of chunks the space was split into.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Claims the next chunk; `None` means the space is exhausted.
    pub fn claim(&self) -> Option<Chunk> {
        loop {
            match self.injector.steal() {
                Steal::Success(chunk) => return Some(chunk),
                Steal::Empty => return None,
                Steal::Retry => continue,
            }
        }
    }
}

/// Walks every strictly increasing `plan.clicks`-tuple whose first click lies in `chunk`, depth-first with an
/// explicit stack, handing the ones that pass the pruning rule to `sink`.
///
/// A prefix that has no hit yet and whose next cell is already past the last hit is abandoned together with all of
/// its later siblings. Returns false if the sink asked to stop.
pub fn enumerate_chunk(plan: &GenerationPlan, chunk: Chunk, sink: &mut impl CombinationSink) -> bool {
    let k = plan.clicks;
    let end = plan.space.end as usize;
    let mut combination = [0 as CellIndex; MAX_CLICKS];
    // hits[d] counts hits among combination[..=d]
    let mut hits = [0u8; MAX_CLICKS];
    let mut depth = 0;
    let mut next = chunk.start as usize;
    let mut steps = 0u32;

    loop {
        steps = steps.wrapping_add(1);
        if steps % CANCEL_INTERVAL == 0 && sink.cancelled() {
            return false;
        }

        // the cell at depth d leaves room for k - d - 1 larger cells after it
        let limit = if depth == 0 { chunk.end as usize } else { end + 1 + depth - k };
        let prior = if depth == 0 { 0 } else { hits[depth - 1] };

        if next >= limit || (prior == 0 && !plan.prune.reachable(next)) {
            if depth == 0 {
                return true;
            }
            depth -= 1;
            next = combination[depth] as usize + 1;
            continue;
        }

        combination[depth] = next as CellIndex;
        hits[depth] = prior + plan.prune.hits(next as CellIndex) as u8;
        next += 1;

        if depth + 1 == k {
            if hits[depth] > 0 && !sink.emit(&combination[..k]) {
                return false;
            }
        } else {
            depth += 1;
        }
    }
}

/// The range-chunk strategy: a fixed set of generator threads sharing one claim queue.
#[derive(Clone, Debug)]
pub struct RangeChunkGenerator {
    plan: GenerationPlan,
    threads: usize,
    chunk_size: usize,
}

impl RangeChunkGenerator {
    pub fn new(plan: GenerationPlan, threads: usize, chunk_size: usize) -> RangeChunkGenerator {
        RangeChunkGenerator { plan, threads, chunk_size }
    }

    fn work(id: usize, plan: GenerationPlan, claims: Arc<ChunkClaims>, shared: Arc<CombinationQueueArray>) -> GeneratorReport {
        let mut outbox = Outbox::new(shared.clone());
        while let Some(chunk) = claims.claim() {
            log::info!("generator {id} claimed first clicks {}..{}", chunk.start, chunk.end);
            if !enumerate_chunk(&plan, chunk, &mut outbox) {
                break;
            }
        }
        if !shared.is_solved() {
            outbox.flush();
        }
        shared.generator_finished();

        let report = GeneratorReport::from(&outbox);
        log::debug!("generator {id} finished after emitting {} combinations", report.emitted);
        report
    }
}

impl CombinationSource for RangeChunkGenerator {
    fn launch(self, shared: Arc<CombinationQueueArray>) -> Result<Vec<JoinHandle<GeneratorReport>>> {
        let claims = Arc::new(ChunkClaims::partition(&self.plan, self.chunk_size));
        log::debug!("split first clicks into {} chunks of {}", claims.total(), self.chunk_size);

        let mut handles = Vec::with_capacity(self.threads);
        for id in 0..self.threads {
            let plan = self.plan;
            let claims = claims.clone();
            let worker_shared = shared.clone();
            let spawned = thread::Builder::new()
                .name(format!("generator-{id}"))
                .spawn(move || RangeChunkGenerator::work(id, plan, claims, worker_shared));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    (id..self.threads).for_each(|_| shared.generator_finished());
                    return Err(e).context("failed to start generator thread");
                }
            }
        }
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[derive(Default)]
    struct Collect(Vec<Vec<CellIndex>>);

    impl CombinationSink for Collect {
        fn emit(&mut self, combination: &[CellIndex]) -> bool {
            self.0.push(combination.to_vec());
            true
        }

        fn cancelled(&self) -> bool {
            false
        }
    }

    fn plan(grid: &Grid, clicks: usize, end: usize) -> GenerationPlan {
        let config = SearchConfig::new().with_clicks(clicks).with_space(SearchSpace::new(0, end).unwrap());
        GenerationPlan::new(&config, grid)
    }

    #[test]
    fn chunks_cover_every_first_click_once() {
        let grid = Grid::from_variant(&Variant::Quartet);
        let plan = plan(&grid, 3, 20);
        let claims = ChunkClaims::partition(&plan, 4);
        let mut seen = vec![];
        while let Some(chunk) = claims.claim() {
            seen.extend(chunk.start..chunk.end);
        }
        assert_eq!(seen, (0..18).collect::<Vec<CellIndex>>());
        assert_eq!(claims.total(), 5);
    }

    #[test]
    fn matches_brute_force_in_lexicographic_order() {
        let grid = Grid::from_variant(&Variant::Single);
        for k in 1..=4 {
            let plan = plan(&grid, k, 60);
            let claims = ChunkClaims::partition(&plan, 7);
            let mut sink = Collect::default();
            while let Some(chunk) = claims.claim() {
                assert!(enumerate_chunk(&plan, chunk, &mut sink));
            }

            let expected = (0..60 as CellIndex).combinations(k)
                .filter(|c| plan.prune.accepts(c))
                .collect::<Vec<_>>();
            assert_eq!(sink.0, expected, "k = {k}");
        }
    }

    #[test]
    fn blank_board_enumerates_nothing() {
        let grid = Grid::from_variant(&Variant::Blank);
        let plan = plan(&grid, 2, CELL_COUNT);
        let mut sink = Collect::default();
        assert!(enumerate_chunk(&plan, Chunk { start: 0, end: 108 }, &mut sink));
        assert!(sink.0.is_empty());
    }

    #[test]
    fn stops_when_the_sink_refuses() {
        struct Refuse(usize);
        impl CombinationSink for Refuse {
            fn emit(&mut self, _: &[CellIndex]) -> bool {
                self.0 += 1;
                false
            }
            fn cancelled(&self) -> bool {
                false
            }
        }

        let grid = Grid::from_variant(&Variant::Quartet);
        let plan = plan(&grid, 2, CELL_COUNT);
        let mut sink = Refuse(0);
        assert!(!enumerate_chunk(&plan, Chunk { start: 0, end: 108 }, &mut sink));
        assert_eq!(sink.0, 1);
    }

    #[test]
    fn unwinds_once_the_search_is_solved() {
        struct Solved(u32);
        impl CombinationSink for Solved {
            fn emit(&mut self, _: &[CellIndex]) -> bool {
                self.0 += 1;
                true
            }
            fn cancelled(&self) -> bool {
                true
            }
        }

        let grid = Grid::from_variant(&Variant::Quartet);
        let plan = plan(&grid, 3, CELL_COUNT);
        let whole = (0..CELL_COUNT as CellIndex).combinations(3).filter(|c| plan.prune.accepts(c)).count();
        let mut sink = Solved(0);
        assert!(!enumerate_chunk(&plan, Chunk { start: 0, end: 107 }, &mut sink));
        assert!(sink.0 < CANCEL_INTERVAL);
        assert!((sink.0 as usize) < whole);
    }
}
