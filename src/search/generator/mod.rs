mod divide;
mod range_chunk;

use std::thread::JoinHandle;

use crate::search::prelude::*;

pub use divide::DivideGenerator;
pub use range_chunk::{enumerate_chunk, Chunk, ChunkClaims, RangeChunkGenerator};

/// How many enumeration steps a generator takes between looks at the cancellation flag.
pub(crate) const CANCEL_INTERVAL: u32 = 1 << 12;

/// What every generator needs to know about the run: k, the candidate range and the pruning rule.
#[derive(Clone, Copy, Debug)]
pub struct GenerationPlan {
    pub clicks: usize,
    pub space: SearchSpace,
    pub prune: PruneRule,
}

impl GenerationPlan {
    pub fn new(config: &SearchConfig, grid: &Grid) -> GenerationPlan {
        GenerationPlan { clicks: config.clicks, space: config.space, prune: PruneRule::new(grid) }
    }
}

/// What a generator thread hands back when it stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorReport {
    /// Combinations that survived pruning and were queued.
    pub emitted: u64,
    /// Batches allocated because no recycled batch was available.
    pub allocated: u64,
}

impl std::ops::Add for GeneratorReport {
    type Output = GeneratorReport;
    fn add(self, rhs: GeneratorReport) -> Self::Output {
        GeneratorReport { emitted: self.emitted + rhs.emitted, allocated: self.allocated + rhs.allocated }
    }
}

impl From<&Outbox> for GeneratorReport {
    fn from(outbox: &Outbox) -> Self {
        GeneratorReport { emitted: outbox.emitted(), allocated: outbox.allocated() }
    }
}

/// Where enumerated combinations go.
pub trait CombinationSink {
    /// Accepts one combination; false means stop enumerating.
    fn emit(&mut self, combination: &[CellIndex]) -> bool;

    /// Polled at bounded intervals.
    fn cancelled(&self) -> bool;
}

impl CombinationSink for Outbox {
    #[inline]
    fn emit(&mut self, combination: &[CellIndex]) -> bool {
        self.push(combination)
    }

    fn cancelled(&self) -> bool {
        self.shared().is_solved()
    }
}

/// A way of filling the tester queues with every pruned combination of the run.
pub trait CombinationSource {
    /// Starts generating on background threads.
    ///
    /// Every one of the `generators` slots counted by `shared` is released exactly once, even when starting fails,
    /// so testers waiting on completion never hang.
    fn launch(self, shared: Arc<CombinationQueueArray>) -> Result<Vec<JoinHandle<GeneratorReport>>>;
}
