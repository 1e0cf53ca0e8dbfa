use std::sync::OnceLock;

use crate::hex_grid::prelude::*;

static ADJACENCY: OnceLock<Adjacency> = OnceLock::new();

/// Precomputed hex-grid neighbourhoods for every cell on the board.
///
/// The same relation is stored three ways: a sorted neighbour list for iteration, a mask for clicks, and a dense
/// table for constant-time pair queries. It is built once and never changes.
#[derive(Debug)]
pub struct Adjacency {
    /// Sorted neighbour indices; only the first `degrees[i]` entries of row `i` are meaningful.
    neighbours: [[CellIndex; MAX_NEIGHBOURS]; CELL_COUNT],

    degrees: [u8; CELL_COUNT],

    /// The cells a click on the given cell flips.
    masks: [CellMask; CELL_COUNT],

    table: Box<[[bool; CELL_COUNT]; CELL_COUNT]>,
}

impl Adjacency {
    /// The process-wide adjacency tables.
    #[inline]
    pub fn get() -> &'static Adjacency {
        ADJACENCY.get_or_init(Adjacency::build)
    }

    fn build() -> Adjacency {
        let mut adjacency = Adjacency {
            neighbours: [[0; MAX_NEIGHBOURS]; CELL_COUNT],
            degrees: [0; CELL_COUNT],
            masks: [CellMask::empty(); CELL_COUNT],
            table: Box::new([[false; CELL_COUNT]; CELL_COUNT]),
        };

        for index in 0..CELL_COUNT {
            let coord = Coord::from_index_unchecked(index as CellIndex);
            let mut found = coord.hex_neighbours().map(|c| c.index()).collect::<Vec<CellIndex>>();
            found.sort_unstable();

            adjacency.degrees[index] = found.len() as u8;
            adjacency.neighbours[index][..found.len()].copy_from_slice(&found);
            adjacency.masks[index] = CellMask::from_cells(found.iter().copied());
            for &other in &found {
                adjacency.table[index][other as usize] = true;
            }
        }
        adjacency
    }

    /// The sorted neighbours of a cell.
    #[inline]
    pub fn neighbours(&self, index: CellIndex) -> &[CellIndex] {
        let i = index as usize;
        &self.neighbours[i][..self.degrees[i] as usize]
    }

    /// The cells a click on `index` toggles.
    #[inline]
    pub fn mask(&self, index: CellIndex) -> &CellMask {
        &self.masks[index as usize]
    }

    /// Whether two cells share an edge.
    #[inline]
    pub fn adjacent(&self, a: CellIndex, b: CellIndex) -> bool {
        self.table[a as usize][b as usize]
    }

    /// The combined effect of clicking every cell in `clicks` on an empty board.
    pub fn pattern(&self, clicks: &[CellIndex]) -> CellMask {
        clicks.iter().fold(CellMask::empty(), |mut acc, &i| {
            acc.toggle_inplace(self.mask(i));
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_symmetric() {
        let adjacency = Adjacency::get();
        for a in 0..CELL_COUNT as CellIndex {
            for b in 0..CELL_COUNT as CellIndex {
                assert_eq!(adjacency.adjacent(a, b), adjacency.adjacent(b, a), "cells {a} and {b}");
            }
        }
    }

    #[test]
    fn representations_agree() {
        let adjacency = Adjacency::get();
        for a in 0..CELL_COUNT as CellIndex {
            let listed = adjacency.neighbours(a);
            assert!(listed.windows(2).all(|w| w[0] < w[1]));
            assert!(!adjacency.adjacent(a, a));
            assert_eq!(adjacency.mask(a).iter().collect::<Vec<_>>(), listed);
            let counted = (0..CELL_COUNT as CellIndex).filter(|&b| adjacency.adjacent(a, b)).count();
            assert_eq!(counted, listed.len());
        }
    }

    #[test]
    fn interior_cell_neighbourhood() {
        let adjacency = Adjacency::get();
        let cell = Coord::new(3, 6).unwrap().index();
        let packed = adjacency.neighbours(cell).iter()
            .map(|&i| Coord::from_index_unchecked(i).packed())
            .collect::<Vec<_>>();
        assert_eq!(packed, vec![206, 207, 305, 307, 406, 407]);
    }
}
