/*
 *  The parallel k-click search: generators enumerate combinations into batches, testers simulate them.
 */

pub(crate) mod batch;
pub mod config;
pub(crate) mod engine;
pub(crate) mod generator;
pub(crate) mod outbox;
pub(crate) mod pool;
pub(crate) mod pruning;
pub(crate) mod queue;
pub(crate) mod tester;

pub mod prelude {
    pub(crate) use crate::hex_grid::prelude::*;

    pub use super::{
        batch::WorkBatch,
        config::{SearchConfig, SearchSpace, Strategy},
        engine::{Search, SearchOutcome, SearchStats},
        generator::{
            enumerate_chunk, Chunk, ChunkClaims, CombinationSink, CombinationSource, DivideGenerator, GenerationPlan,
            GeneratorReport, RangeChunkGenerator
        },
        outbox::Outbox,
        pool::BatchPool,
        pruning::{ParityFilter, PruneRule},
        queue::{CombinationQueue, CombinationQueueArray, Solution},
        tester::{Tester, TesterReport, Wait}
    };
}
