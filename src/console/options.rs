use clap::Parser;
use crate::prelude::*;

#[derive(Clone, Debug, Parser)]
#[command(about = "Parallel search for a k-click solution of a hexagonal toggle board")]
pub struct SolverOptions {
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// A named starting board: blank, single, pair or quartet.
    #[arg(short, long, default_value = "quartet")]
    pub variant: String,

    /// Literal active cells, e.g. "208,306,308,407"; overrides --variant.
    #[arg(short, long)]
    pub active: Option<String>,

    /// Clicks per combination (k).
    #[arg(short = 'k', long, default_value_t = 4)]
    pub clicks: usize,

    #[arg(short, long)]
    pub consumers: Option<usize>,

    #[arg(short, long)]
    pub generators: Option<usize>,

    /// range or divide.
    #[arg(short, long, default_value = "range")]
    pub strategy: String,

    #[arg(long)]
    pub batch_size: Option<usize>,

    #[arg(long)]
    pub queue_depth: Option<usize>,

    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Only cells with a linear index below this are clicked.
    #[arg(long)]
    pub candidates: Option<usize>,

    /// Failed candidates between tester progress lines.
    #[arg(long)]
    pub heartbeat: Option<u64>,
}

impl SolverOptions {
    /// The starting board these options describe.
    pub fn variant(&self) -> Result<Variant> {
        match &self.active {
            Some(list) => {
                let cells = list.parse::<CellList>()?;
                Variant::custom(&cells.coords)
            },
            None => self.variant.parse::<Variant>()
        }
    }

    pub fn search_config(&self) -> Result<SearchConfig> {
        let mut config = SearchConfig::default()
            .with_clicks(self.clicks)
            .with_strategy(self.strategy.parse::<Strategy>()?);

        if let Some(consumers) = self.consumers {
            config = config.with_consumers(consumers);
        }
        if let Some(generators) = self.generators {
            config = config.with_generators(generators);
        }
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_capacity(batch_size);
        }
        if let Some(queue_depth) = self.queue_depth {
            config = config.with_queue_depth(queue_depth);
        }
        if let Some(chunk_size) = self.chunk_size {
            config = config.with_chunk_size(chunk_size);
        }
        if let Some(candidates) = self.candidates {
            config = config.with_space(SearchSpace::new(0, candidates)?);
        }
        if let Some(heartbeat) = self.heartbeat {
            config = config.with_heartbeat(heartbeat);
        }

        config.validate()?;
        Ok(config)
    }
}
