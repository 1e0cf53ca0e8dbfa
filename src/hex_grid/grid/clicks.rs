use crate::hex_grid::prelude::*;

impl Grid {
    /// Clicks a cell, flipping each of its neighbours.
    pub fn click(&mut self, index: usize) -> Result<&mut Self> {
        let index = Grid::check_index(index)?;
        self.click_unchecked(index);
        Ok(self)
    }

    /// Clicks every cell in `indices`; the order does not matter.
    pub fn click_all(&mut self, indices: &[usize]) -> Result<&mut Self> {
        let checked = indices.iter()
            .map(|&i| Grid::check_index(i))
            .collect::<Result<Vec<CellIndex>>>()?;
        self.click_all_unchecked(&checked);
        Ok(self)
    }

    /// Clicks a coordinate.
    pub fn click_coord(&mut self, coord: &Coord) -> Result<&mut Self> {
        if !coord.in_bounds() {
            return Err(anyhow!("invalid coordinate {coord}"));
        }
        self.click_unchecked(coord.index());
        Ok(self)
    }

    /// Clicks a cell with no checks; engine use only.
    #[inline]
    pub fn click_unchecked(&mut self, index: CellIndex) {
        self.state.toggle_inplace(Adjacency::get().mask(index));
        self.mark_stale();
    }

    /// Clicks a whole combination with no checks; engine use only.
    ///
    /// The masks are folded together first so the board and its cache are touched once per combination.
    #[inline]
    pub fn click_all_unchecked(&mut self, indices: &[CellIndex]) {
        let adjacency = Adjacency::get();
        let mut flips = CellMask::empty();
        for &index in indices {
            flips.toggle_inplace(adjacency.mask(index));
        }
        self.state.toggle_inplace(&flips);
        self.mark_stale();
    }
}
