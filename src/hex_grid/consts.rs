pub const ROWS: usize = 7;
pub const EVEN_ROW_WIDTH: usize = 16;
pub const ODD_ROW_WIDTH: usize = 15;
pub const CELL_COUNT: usize = 109;

/// The most neighbours any one cell can have on a hex grid.
pub const MAX_NEIGHBOURS: usize = 6;

/// The largest supported number of clicks per combination.
pub const MAX_CLICKS: usize = 8;

/// The linear index of the first cell in each row, followed by the total cell count.
pub const ROW_OFFSETS: [usize; ROWS + 1] = [0, 16, 31, 47, 62, 78, 93, 109];

/// Packed coordinates are `row * PACKED_ROW_STRIDE + col`.
pub const PACKED_ROW_STRIDE: usize = 100;

/// A linear cell index; every index on the board fits in a byte.
pub type CellIndex = u8;

/// The number of columns in the given row.
#[inline]
pub const fn row_width(row: usize) -> usize {
    if row % 2 == 0 { EVEN_ROW_WIDTH } else { ODD_ROW_WIDTH }
}
