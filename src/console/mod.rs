mod options;

use itertools::Itertools;
pub use options::SolverOptions;

use crate::prelude::*;

/// The command-line front end: builds a search from the options, runs it and reports the result.
pub struct Solver {
    options: SolverOptions,
}

impl Solver {
    pub fn new(options: SolverOptions) -> Solver {
        Solver { options }
    }

    /// Runs one search and prints the outcome.
    pub fn run(&self) -> Result<SearchOutcome> {
        let variant = self.options.variant()?;
        let config = self.options.search_config()?;
        let grid = Grid::from_variant(&variant);

        log::info!("board {} with {} active cells:\n{}", variant.name(), grid.active_count(), grid.pretty());
        let outcome = Search::new(config, grid.clone())?.run()?;
        self.report(&grid, &outcome)?;
        Ok(outcome)
    }

    fn report(&self, grid: &Grid, outcome: &SearchOutcome) -> Result<()> {
        match &outcome.solution {
            Some(solution) => {
                let mut solved = grid.clone();
                solved.click_all_unchecked(&solution.combination);
                if !solved.is_solved() {
                    return Err(anyhow!("published combination {} does not clear the board", solution.notate()));
                }
                println!("solved by tester {} in {:.3}s", solution.tester, outcome.elapsed.as_secs_f64());
                println!("coords {}", solution.notate());
                println!("packed {}", solution.encoded(Encoding::Packed).iter().join(" "));
                println!("index  {}", solution.encoded(Encoding::Index).iter().join(" "));
            },
            None => {
                println!("no solution with {} clicks ({:.3}s)", self.options.clicks, outcome.elapsed.as_secs_f64());
            }
        }
        let stats = &outcome.stats;
        log::info!(
            "{} emitted, {} tested, {} rejected by parity, {} simulated, {} stolen batches, {} batches allocated",
            stats.emitted, stats.tested, stats.rejected, stats.simulated, stats.stolen, stats.allocated
        );
        Ok(())
    }
}
