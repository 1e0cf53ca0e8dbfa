use std::thread::{self, JoinHandle};

use crate::search::prelude::*;

/// Totals across every worker of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub emitted: u64,
    pub tested: u64,
    pub rejected: u64,
    pub simulated: u64,
    pub stolen: u64,
    pub allocated: u64,
}

/// What a finished run reports.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub solution: Option<Solution>,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn is_solved(&self) -> bool {
        self.solution.is_some()
    }
}

/// One search for a k-click solution of a starting board.
#[derive(Clone, Debug)]
pub struct Search {
    config: SearchConfig,
    grid: Grid,
}

impl Search {
    pub fn new(config: SearchConfig, grid: Grid) -> Result<Search> {
        config.validate()?;
        Ok(Search { config, grid })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Runs the search to completion: until some tester publishes a solution, or every pruned combination has been
    /// generated and tested.
    pub fn run(&self) -> Result<SearchOutcome> {
        let timer = Instant::now();
        let config = &self.config;
        log::info!(
            "searching {} active cells for {} clicks over cells {}..{} with {} testers and {} {:?} generators",
            self.grid.active_count(), config.clicks, config.space.start, config.space.end,
            config.consumers, config.generators, config.strategy
        );

        let shared = Arc::new(CombinationQueueArray::new(config));
        let filter = Arc::new(ParityFilter::new(&self.grid));

        let mut testers = Vec::with_capacity(config.consumers);
        for id in 0..config.consumers {
            let tester = Tester::new(id, &self.grid, filter.clone(), shared.clone(), config.heartbeat);
            let handle = thread::Builder::new()
                .name(format!("tester-{id}"))
                .spawn(move || tester.run());
            match handle {
                Ok(handle) => testers.push(handle),
                Err(e) => {
                    // testers already running share the remaining queues; the run is just narrower
                    log::warn!("failed to start tester {id}: {e}");
                }
            }
        }
        if testers.is_empty() {
            return Err(anyhow!("could not start any tester threads"));
        }

        let plan = GenerationPlan::new(config, &self.grid);
        let launched = match config.strategy {
            Strategy::RangeChunk => RangeChunkGenerator::new(plan, config.generators, config.chunk_size).launch(shared.clone()),
            Strategy::DivideAndConquer => DivideGenerator::new(plan, config.generators).launch(shared.clone()),
        };

        let mut stats = SearchStats::default();
        let generator_failure = match launched {
            Ok(generators) => match join_generators(generators, &shared) {
                Ok(report) => {
                    stats.emitted = report.emitted;
                    stats.allocated = report.allocated;
                    None
                }
                Err(e) => Some(e),
            },
            Err(e) => Some(e),
        };

        for handle in testers {
            let report = handle.join().map_err(|_| anyhow!("tester thread panicked"))?;
            stats.tested += report.tested;
            stats.rejected += report.rejected;
            stats.simulated += report.simulated;
            stats.stolen += report.stolen;
        }
        if let Some(e) = generator_failure {
            return Err(e);
        }

        let outcome = SearchOutcome { solution: shared.solution().cloned(), elapsed: timer.elapsed(), stats };
        log::info!(
            "search {} after {:.3}s: {} emitted, {} tested, {} rejected by parity, {} simulated",
            if outcome.is_solved() { "solved" } else { "exhausted" },
            outcome.elapsed.as_secs_f64(), stats.emitted, stats.tested, stats.rejected, stats.simulated
        );
        Ok(outcome)
    }
}

/// Waits for every generator. If any of them panicked its slot was never released, so generation is marked
/// complete by hand to let the testers drain and stop.
fn join_generators(handles: Vec<JoinHandle<GeneratorReport>>, shared: &CombinationQueueArray) -> Result<GeneratorReport> {
    let mut total = GeneratorReport::default();
    let mut panicked = 0;
    for handle in handles {
        match handle.join() {
            Ok(report) => total = total + report,
            Err(_) => panicked += 1,
        }
    }
    if panicked > 0 {
        shared.abandon_generation();
        return Err(anyhow!("{panicked} generator threads panicked"));
    }
    Ok(total)
}
