use crate::hex_grid::prelude::*;

impl Grid {
    /// Validates a raw linear index.
    pub(crate) fn check_index(index: usize) -> Result<CellIndex> {
        if index < CELL_COUNT {
            Ok(index as CellIndex)
        } else {
            Err(anyhow!("cell index {index} out of range 0..{CELL_COUNT}"))
        }
    }

    /// Gets the state of the cell at a given coordinate.
    pub(super) fn get(&self, coord: &Coord) -> Result<bool> {
        if coord.in_bounds() {
            Ok(self.get_unchecked(coord.index()))
        } else {
            Err(anyhow!("invalid coordinate ({:02}, {:02})", coord.row, coord.col))
        }
    }

    /// Unchecked accessor into the grid; engine use only.
    #[inline]
    pub(super) fn get_unchecked(&self, index: CellIndex) -> bool {
        self.state.contains(index)
    }
}
