use std::{
    cell::RefCell,
    thread::{self, JoinHandle}
};

use rayon::{Scope, ThreadPool, ThreadPoolBuilder};

use super::{GenerationPlan, GeneratorReport};
use crate::search::prelude::*;

thread_local! {
    /// Each pool thread's outbox; installed before the recursion starts and flushed after it ends.
    static OUTBOX: RefCell<Option<Outbox>> = const { RefCell::new(None) };
}

/// One node of the recursion: a partial combination and the smallest cell its next click may use.
#[derive(Clone, Copy, Debug)]
struct Task {
    prefix: [CellIndex; MAX_CLICKS],
    len: usize,
    start: usize,
}

impl Task {
    fn root(plan: &GenerationPlan) -> Task {
        Task { prefix: [0; MAX_CLICKS], len: 0, start: plan.space.start as usize }
    }

    /// Forks one child per possible next click until a single click is missing, then enumerates the last click
    /// in place.
    fn fork<'s>(self, scope: &Scope<'s>, plan: &'s GenerationPlan, shared: &'s CombinationQueueArray) {
        if shared.is_solved() {
            return;
        }
        let k = plan.clicks;
        if self.len + 1 < k {
            let limit = plan.space.end as usize + 1 + self.len - k;
            for next in self.start..limit {
                let mut child = self;
                child.prefix[self.len] = next as CellIndex;
                child.len += 1;
                child.start = next + 1;
                scope.spawn(move |s| child.fork(s, plan, shared));
            }
        } else {
            self.finish(plan);
        }
    }

    /// Leaf enumeration; pruning is applied only to the complete combination.
    fn finish(&self, plan: &GenerationPlan) {
        let k = plan.clicks;
        OUTBOX.with(|slot| {
            let mut slot = slot.borrow_mut();
            let Some(outbox) = slot.as_mut() else {
                log::warn!("leaf task ran on a thread without an outbox");
                return;
            };
            let mut combination = self.prefix;
            for last in self.start..plan.space.end as usize {
                combination[self.len] = last as CellIndex;
                let candidate = &combination[..k];
                if plan.prune.accepts(candidate) && !outbox.push(candidate) {
                    return;
                }
            }
        });
    }
}

/// The divide-and-conquer strategy: a recursive task tree on a dedicated work-stealing pool.
///
/// Every task reads the one shared solved flag directly, so cancelling needs no walk up the tree.
#[derive(Clone, Debug)]
pub struct DivideGenerator {
    plan: GenerationPlan,
    threads: usize,
}

impl DivideGenerator {
    pub fn new(plan: GenerationPlan, threads: usize) -> DivideGenerator {
        DivideGenerator { plan, threads }
    }

    fn work(plan: GenerationPlan, pool: ThreadPool, shared: Arc<CombinationQueueArray>) -> GeneratorReport {
        pool.broadcast(|_| {
            OUTBOX.with(|slot| *slot.borrow_mut() = Some(Outbox::new(shared.clone())));
        });

        pool.scope(|scope| Task::root(&plan).fork(scope, &plan, &shared));

        let reports = pool.broadcast(|ctx| {
            let outbox = OUTBOX.with(|slot| slot.borrow_mut().take());
            let report = outbox.map_or(GeneratorReport::default(), |mut outbox| {
                if !shared.is_solved() {
                    outbox.flush();
                }
                GeneratorReport::from(&outbox)
            });
            shared.generator_finished();
            log::debug!("divide worker {} finished after emitting {} combinations", ctx.index(), report.emitted);
            report
        });
        reports.into_iter().fold(GeneratorReport::default(), |acc, r| acc + r)
    }
}

impl CombinationSource for DivideGenerator {
    fn launch(self, shared: Arc<CombinationQueueArray>) -> Result<Vec<JoinHandle<GeneratorReport>>> {
        let release = |shared: &CombinationQueueArray| (0..self.threads).for_each(|_| shared.generator_finished());

        let pool = match ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|i| format!("divide-{i}"))
            .build() {
            Ok(pool) => pool,
            Err(e) => {
                release(&shared);
                return Err(e).context("failed to build the divide-and-conquer pool");
            }
        };

        let plan = self.plan;
        let worker_shared = shared.clone();
        let spawned = thread::Builder::new()
            .name("divide-root".into())
            .spawn(move || DivideGenerator::work(plan, pool, worker_shared));
        match spawned {
            Ok(handle) => Ok(vec![handle]),
            Err(e) => {
                release(&shared);
                Err(e).context("failed to start the divide-and-conquer generator")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    fn setup(clicks: usize, end: usize) -> (GenerationPlan, Arc<CombinationQueueArray>) {
        let grid = Grid::from_variant(&Variant::Single);
        let config = SearchConfig::new()
            .with_clicks(clicks)
            .with_consumers(2)
            .with_generators(3)
            .with_batch_capacity(16)
            .with_queue_depth(512)
            .with_space(SearchSpace::new(0, end).unwrap());
        (GenerationPlan::new(&config, &grid), Arc::new(CombinationQueueArray::new(&config)))
    }

    fn drain(shared: &CombinationQueueArray) -> Vec<Vec<CellIndex>> {
        let mut found = vec![];
        for lane in 0..shared.len() {
            while let Some(batch) = shared.queue(lane).take() {
                found.extend(batch.iter().map(|c| c.to_vec()));
            }
        }
        found
    }

    #[test]
    fn emits_every_pruned_combination_once() {
        for clicks in 1..=3 {
            let (plan, shared) = setup(clicks, 45);
            let handles = DivideGenerator::new(plan, 3).launch(shared.clone()).unwrap();
            let report = handles.into_iter().map(|h| h.join().unwrap()).fold(GeneratorReport::default(), |a, r| a + r);
            assert!(shared.generation_complete());

            let mut found = drain(&shared);
            found.sort();
            let expected = (0..45 as CellIndex).combinations(clicks)
                .filter(|c| plan.prune.accepts(c))
                .collect::<Vec<_>>();
            assert_eq!(found, expected, "k = {clicks}");
            assert_eq!(report.emitted, expected.len() as u64);
        }
    }

    #[test]
    fn solved_search_generates_nothing() {
        let (plan, shared) = setup(3, 45);
        assert!(shared.publish(0, &[1, 2, 3]));
        let handles = DivideGenerator::new(plan, 3).launch(shared.clone()).unwrap();
        let emitted = handles.into_iter().map(|h| h.join().unwrap().emitted).sum::<u64>();
        assert_eq!(emitted, 0);
        assert!(shared.generation_complete());
        assert!(shared.all_empty());
    }
}
