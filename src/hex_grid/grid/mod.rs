pub(crate) mod clicks;
pub(crate) mod indexing;
pub(crate) mod pretty;

use std::cell::Cell;

use super::prelude::*;

/// Values derived from the board state, recomputed only when a mutation has marked them stale.
#[derive(Clone, Copy, Debug)]
struct Derived {
    stale: bool,
    active: u8,
    first_active: Option<CellIndex>,
}

impl Derived {
    const STALE: Derived = Derived { stale: true, active: 0, first_active: None };
}

/// A bit-packed hex board.
///
/// Every grid carries the starting pattern it was built from, so a worker can rewind its private copy between
/// candidates without consulting anything shared.
#[derive(Clone, Debug)]
pub struct Grid {
    /// The active cells this grid started with.
    initial: CellMask,

    /// The currently active cells.
    state: CellMask,

    /// Active-cell count and lowest active cell, cached.
    derived: Cell<Derived>,
}

impl Grid {
    /// A grid whose active cells are `initial`; fails if the mask has bits off the board.
    pub fn new(initial: CellMask) -> Result<Grid> {
        if !initial.on_board() {
            return Err(anyhow!("initial pattern has cells beyond index {}", CELL_COUNT - 1));
        }
        Ok(Grid::with_initial(initial))
    }

    /// A grid holding one of the named starting boards.
    pub fn from_variant(variant: &Variant) -> Grid {
        Grid::with_initial(variant.initial())
    }

    fn with_initial(initial: CellMask) -> Grid {
        Grid { initial, state: initial, derived: Cell::new(Derived::STALE) }
    }

    /// The starting pattern.
    pub fn initial(&self) -> CellMask {
        self.initial
    }

    /// The current pattern.
    pub fn state(&self) -> CellMask {
        self.state
    }

    /// Whether the cell at `coord` is currently active.
    pub fn is_active(&self, coord: &Coord) -> Result<bool> {
        self.get(coord)
    }

    /// The number of active cells.
    pub fn active_count(&self) -> usize {
        self.derived().active as usize
    }

    /// The lowest-index active cell, if any.
    pub fn first_active(&self) -> Option<CellIndex> {
        self.derived().first_active
    }

    /// Whether every cell is inactive.
    #[inline]
    pub fn is_solved(&self) -> bool {
        self.active_count() == 0
    }

    /// The sorted indices of the currently active cells.
    pub fn active_cells(&self) -> Vec<CellIndex> {
        self.state.iter().collect()
    }

    /// Rewinds the grid to its starting pattern.
    #[inline]
    pub fn reset(&mut self) {
        self.state = self.initial;
        self.mark_stale();
    }

    #[inline]
    fn mark_stale(&self) {
        self.derived.set(Derived::STALE);
    }

    fn derived(&self) -> Derived {
        let cached = self.derived.get();
        if !cached.stale {
            return cached;
        }
        let fresh = Derived {
            stale: false,
            active: self.state.len() as u8,
            first_active: self.state.lowest(),
        };
        self.derived.set(fresh);
        fresh
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pretty())
    }
}
