use crate::hex_grid::prelude::*;

const WORD_BITS: usize = 64;

/// A set of cells on the board, one bit per linear index, packed into two 64-bit words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellMask(U128);

impl CellMask {
    /// The empty set.
    pub const fn empty() -> CellMask {
        CellMask(U128([0, 0]))
    }

    /// The set containing every cell on the board.
    pub fn full() -> CellMask {
        let high_bits = CELL_COUNT - WORD_BITS;
        CellMask(U128([u64::MAX, (1u64 << high_bits) - 1]))
    }

    /// The set containing a single cell.
    #[inline]
    pub(crate) fn single(index: CellIndex) -> CellMask {
        debug_assert!((index as usize) < CELL_COUNT, "cell index {index} is off the board");
        let mut words = [0u64; 2];
        words[index as usize / WORD_BITS] = 1u64 << (index as usize % WORD_BITS);
        CellMask(U128(words))
    }

    /// The set of the given linear indices; fails if any of them is off the board.
    pub fn from_indices(indices: &[usize]) -> Result<CellMask> {
        let mut mask = CellMask::empty();
        for &index in indices {
            mask.try_insert(index)?;
        }
        Ok(mask)
    }

    /// The set of the given coordinates; fails if any of them is off the board.
    pub fn from_coords(coords: &[Coord]) -> Result<CellMask> {
        if let Some(bad) = coords.iter().find(|c| !c.in_bounds()) {
            return Err(anyhow!("invalid coordinate {bad}"));
        }
        Ok(CellMask::from_cells(coords.iter().map(|c| c.index())))
    }

    /// Engine use only: the set of indices already known to be on the board.
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = CellIndex>) -> CellMask {
        let mut mask = CellMask::empty();
        cells.into_iter().for_each(|index| { mask.insert(index); });
        mask
    }

    /// Whether every member is a cell of the board.
    pub fn on_board(&self) -> bool {
        self.intersect(&CellMask::full()) == *self
    }

    /// The raw words, low bits first.
    pub fn words(&self) -> [u64; 2] {
        self.0.0
    }

    #[inline]
    pub fn contains(&self, index: CellIndex) -> bool {
        (index as usize) < CELL_COUNT && self.0.bit(index as usize)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.0.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// The lowest index in the set, if any.
    #[inline]
    pub fn lowest(&self) -> Option<CellIndex> {
        (!self.is_empty()).then(|| self.0.trailing_zeros() as CellIndex)
    }

    /// The highest index in the set, if any.
    pub fn highest(&self) -> Option<CellIndex> {
        (!self.is_empty()).then(|| (127 - self.0.leading_zeros()) as CellIndex)
    }

    /// Adds a cell, rejecting indices off the board.
    pub fn try_insert(&mut self, index: usize) -> Result<&mut Self> {
        if index >= CELL_COUNT {
            return Err(anyhow!("cell index {index} is off the board"));
        }
        Ok(self.insert(index as CellIndex))
    }

    pub(crate) fn insert(&mut self, index: CellIndex) -> &mut Self {
        self.0 = self.0 | CellMask::single(index).0;
        self
    }

    pub(crate) fn remove(&mut self, index: CellIndex) -> &mut Self {
        self.0 = self.0 & !CellMask::single(index).0;
        self
    }

    /// Flips every cell in `other`; the core of a click.
    #[inline]
    pub fn toggle_inplace(&mut self, other: &CellMask) -> &mut Self {
        self.0 = self.0 ^ other.0;
        self
    }

    #[inline]
    pub fn symmetric_difference(&self, other: &CellMask) -> CellMask {
        CellMask(self.0 ^ other.0)
    }

    #[inline]
    pub fn intersect(&self, other: &CellMask) -> CellMask {
        CellMask(self.0 & other.0)
    }

    pub fn union(&self, other: &CellMask) -> CellMask {
        CellMask(self.0 | other.0)
    }

    /// Iterates the members in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + use<> {
        let mut rest = *self;
        std::iter::from_fn(move || {
            let lowest = rest.lowest()?;
            rest.remove(lowest);
            Some(lowest)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterate() {
        let elements = BTreeSet::from_iter([0u8, 5, 63, 64, 99, 108]);
        let mask = CellMask::from_cells(elements.iter().copied());
        let recovered = mask.iter().collect::<BTreeSet<_>>();

        assert_eq!(elements, recovered);
        assert_eq!(mask.len(), 6);
        assert_eq!(mask.lowest(), Some(0));
        assert_eq!(mask.highest(), Some(108));
    }

    #[test]
    fn full_mask_covers_the_board_only() {
        let full = CellMask::full();
        assert_eq!(full.len(), CELL_COUNT);
        assert!(full.contains(108));
        assert!(!full.contains(109));
        assert_eq!(CellMask::empty().lowest(), None);
    }

    #[test]
    fn toggling_twice_is_identity() {
        let mut mask = CellMask::from_cells([3u8, 70]);
        let flip = CellMask::from_cells([3u8, 4, 100]);
        mask.toggle_inplace(&flip);
        assert_eq!(mask.iter().collect::<Vec<_>>(), vec![4, 70, 100]);
        mask.toggle_inplace(&flip);
        assert_eq!(mask, CellMask::from_cells([3u8, 70]));
    }

    #[test]
    fn off_board_cells_are_faults() {
        assert!(CellMask::from_indices(&[0, 108]).is_ok());
        assert!(CellMask::from_indices(&[3, CELL_COUNT]).is_err());
        assert!(CellMask::from_indices(&[200]).is_err());
        assert!(CellMask::empty().try_insert(127).is_err());
        assert!(CellMask::from_coords(&[Coord { row: 1, col: 15 }]).is_err());
        assert!(!CellMask::full().contains(200));
        assert!(CellMask::full().on_board());

        let stray = CellMask(U128([1, 1 << 60]));
        assert!(!stray.on_board());
        assert!(Grid::new(stray).is_err());
        assert!(Grid::new(CellMask::full()).is_ok());
    }
}
