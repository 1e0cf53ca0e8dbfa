use crate::search::prelude::*;

/// The generation-time pruning rule.
///
/// A click flips only its neighbours, so the lowest active cell of the starting board can only be turned off by a
/// combination that clicks at least one of its neighbours. Everything else is discarded before it is ever queued.
#[derive(Clone, Copy, Debug)]
pub struct PruneRule {
    /// The neighbours of the first active cell; empty when the board starts blank.
    hits: CellMask,

    /// The largest index in `hits`.
    last_hit: Option<CellIndex>,
}

impl PruneRule {
    pub fn new(grid: &Grid) -> PruneRule {
        let hits = grid.first_active()
            .map_or(CellMask::empty(), |first| *Adjacency::get().mask(first));
        PruneRule { hits, last_hit: hits.highest() }
    }

    /// Whether a single cell can toggle the first active cell.
    #[inline]
    pub fn hits(&self, index: CellIndex) -> bool {
        self.hits.contains(index)
    }

    /// Whether a full combination survives pruning.
    #[inline]
    pub fn accepts(&self, combination: &[CellIndex]) -> bool {
        combination.iter().any(|&i| self.hits(i))
    }

    /// Whether a prefix with no hit so far, whose next cell would be `next`, can still be completed into an accepted
    /// combination. Later cells only grow, so once `next` passes the last hit the prefix and all its later siblings
    /// are dead.
    #[inline]
    pub fn reachable(&self, next: usize) -> bool {
        self.last_hit.is_some_and(|last| next <= last as usize)
    }
}

/// The parity pre-filter run by testers before simulation.
///
/// For every candidate cell it stores which originally active cells that cell flips. A combination can only clear the
/// board if those masks XOR to exactly the starting pattern: each active cell flipped an odd number of times, and the
/// inactive cells are ignored here. Necessary, not sufficient, and it never touches a grid.
#[derive(Clone, Debug)]
pub struct ParityFilter {
    masks: Box<[CellMask; CELL_COUNT]>,
    target: CellMask,
}

impl ParityFilter {
    pub fn new(grid: &Grid) -> ParityFilter {
        let adjacency = Adjacency::get();
        let target = grid.initial();
        let mut masks = Box::new([CellMask::empty(); CELL_COUNT]);
        for (index, mask) in masks.iter_mut().enumerate() {
            *mask = adjacency.mask(index as CellIndex).intersect(&target);
        }
        ParityFilter { masks, target }
    }

    /// The starting pattern the flips must cancel.
    pub fn target(&self) -> CellMask {
        self.target
    }

    #[inline]
    pub fn admits(&self, combination: &[CellIndex]) -> bool {
        let mut acc = CellMask::empty();
        for &index in combination {
            acc.toggle_inplace(&self.masks[index as usize]);
        }
        acc == self.target
    }
}
