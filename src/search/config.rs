use crate::search::prelude::*;

/// How combinations are enumerated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Generator threads claim contiguous ranges of first clicks and walk them depth-first.
    RangeChunk,
    /// A recursive fork per prefix on a work-stealing pool.
    DivideAndConquer,
}

impl std::str::FromStr for Strategy {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "range" | "chunk" | "range-chunk" => Ok(Strategy::RangeChunk),
            "divide" | "dnc" | "recursive"    => Ok(Strategy::DivideAndConquer),
            _                                 => Err(anyhow!("unknown generation strategy {s}"))
        }
    }
}

/// The candidate cells, as a half-open range of linear indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchSpace {
    pub start: CellIndex,
    pub end: CellIndex,
}

impl Default for SearchSpace {
    fn default() -> Self {
        SearchSpace { start: 0, end: CELL_COUNT as CellIndex }
    }
}

impl SearchSpace {
    /// Constructs a candidate range, checking it lies on the board.
    pub fn new(start: usize, end: usize) -> Result<SearchSpace> {
        if start >= end || end > CELL_COUNT {
            return Err(anyhow!("invalid candidate range {start}..{end}; expected a non-empty range within 0..{CELL_COUNT}"));
        }
        Ok(SearchSpace { start: start as CellIndex, end: end as CellIndex })
    }

    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// One past the largest first click a `clicks`-combination can start with.
    pub fn first_click_end(&self, clicks: usize) -> usize {
        (self.end as usize + 1).saturating_sub(clicks).max(self.start as usize)
    }
}

/// Parameters for one search run; fixed once the run starts.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// k, the number of clicks in every combination.
    pub clicks: usize,

    pub consumers: usize,

    pub generators: usize,

    pub strategy: Strategy,

    /// Combinations per transported batch.
    pub batch_capacity: usize,

    /// Batches each consumer queue holds before generators back off.
    pub queue_depth: usize,

    /// First clicks per claimed range, for the range-chunk strategy.
    pub chunk_size: usize,

    pub space: SearchSpace,

    /// Failed candidates between each tester's progress log lines.
    pub heartbeat: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism().map_or(2, |v| v.into());
        SearchConfig {
            clicks: 4,
            consumers: (threads * 3 / 4).max(1),
            generators: (threads / 4).max(1),
            strategy: Strategy::RangeChunk,
            batch_capacity: 4096,
            queue_depth: 64,
            chunk_size: 1,
            space: SearchSpace::default(),
            heartbeat: 1 << 24,
        }
    }
}

impl SearchConfig {
    /// Gets the default configuration.
    pub fn new() -> SearchConfig {
        SearchConfig::default()
    }

    pub fn with_clicks(mut self, clicks: usize) -> Self {
        self.clicks = clicks;
        self
    }

    pub fn with_consumers(mut self, consumers: usize) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_generators(mut self, generators: usize) -> Self {
        self.generators = generators;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_batch_capacity(mut self, batch_capacity: usize) -> Self {
        self.batch_capacity = batch_capacity;
        self
    }

    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_space(mut self, space: SearchSpace) -> Self {
        self.space = space;
        self
    }

    pub fn with_heartbeat(mut self, heartbeat: u64) -> Self {
        self.heartbeat = heartbeat;
        self
    }

    /// Rejects parameters the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.clicks == 0 || self.clicks > MAX_CLICKS {
            return Err(anyhow!("clicks must be within 1..={MAX_CLICKS}; received {}", self.clicks));
        }
        if self.space.is_empty() || self.space.end as usize > CELL_COUNT {
            return Err(anyhow!("invalid candidate range {}..{}", self.space.start, self.space.end));
        }
        if self.clicks > self.space.len() {
            return Err(anyhow!("cannot pick {} clicks from {} candidate cells", self.clicks, self.space.len()));
        }
        if self.consumers == 0 || self.generators == 0 {
            return Err(anyhow!("need at least one consumer and one generator"));
        }
        if self.batch_capacity == 0 || self.queue_depth == 0 || self.chunk_size == 0 {
            return Err(anyhow!("batch capacity, queue depth and chunk size must all be positive"));
        }
        Ok(())
    }
}
