use std::sync::OnceLock;

use crate::hex_grid::prelude::*;

/// A cell on the hex board; rows alternate between 16 and 15 columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

/// The two interchangeable ways of writing a cell down as a single number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// `row * 100 + col`, easy to read in logs.
    Packed,
    /// Row-major position in `0..CELL_COUNT`.
    Index,
}

impl std::str::FromStr for Encoding {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "packed" | "p" => Ok(Encoding::Packed),
            "index" | "i"  => Ok(Encoding::Index),
            _              => Err(anyhow!("unsupported coordinate encoding {s}"))
        }
    }
}

impl std::str::FromStr for Coord {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let packed = s.trim().parse::<usize>()
            .with_context(|| format!("expected a packed coordinate (row * 100 + col); received {s}"))?;
        Coord::decode(packed, Encoding::Packed)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Lookup tables between the two encodings, built once per process.
struct CoordTables {
    by_index: [Coord; CELL_COUNT],
    by_packed: Box<[Option<CellIndex>; ROWS * PACKED_ROW_STRIDE]>,
}

static COORD_TABLES: OnceLock<CoordTables> = OnceLock::new();

impl CoordTables {
    fn get() -> &'static CoordTables {
        COORD_TABLES.get_or_init(|| {
            let mut by_index = [Coord { row: 0, col: 0 }; CELL_COUNT];
            let mut by_packed = Box::new([None; ROWS * PACKED_ROW_STRIDE]);
            for row in 0..ROWS {
                for col in 0..row_width(row) {
                    let index = ROW_OFFSETS[row] + col;
                    by_index[index] = Coord { row, col };
                    by_packed[row * PACKED_ROW_STRIDE + col] = Some(index as CellIndex);
                }
            }
            CoordTables { by_index, by_packed }
        })
    }
}

impl Coord {
    /// Constructs a coordinate, checking that it lies on the board.
    pub fn new(row: usize, col: usize) -> Result<Coord> {
        let coord = Coord { row, col };
        if coord.in_bounds() {
            Ok(coord)
        } else {
            Err(anyhow!("invalid coordinate ({row}, {col})"))
        }
    }

    /// Determines whether or not the coord is on the board.
    pub fn in_bounds(&self) -> bool {
        self.row < ROWS && self.col < row_width(self.row)
    }

    /// The coordinate at a linear index.
    pub fn from_index(index: usize) -> Result<Coord> {
        if index < CELL_COUNT {
            Ok(Coord::from_index_unchecked(index as CellIndex))
        } else {
            Err(anyhow!("cell index {index} out of range 0..{CELL_COUNT}"))
        }
    }

    /// Table lookup with no bounds check; engine use only.
    #[inline]
    pub fn from_index_unchecked(index: CellIndex) -> Coord {
        CoordTables::get().by_index[index as usize]
    }

    /// The linear index of this cell.
    pub fn index(&self) -> CellIndex {
        (ROW_OFFSETS[self.row] + self.col) as CellIndex
    }

    /// The packed (`row * 100 + col`) form of this cell.
    pub fn packed(&self) -> usize {
        self.row * PACKED_ROW_STRIDE + self.col
    }

    /// Writes the cell in the requested encoding.
    pub fn encode(&self, encoding: Encoding) -> usize {
        match encoding {
            Encoding::Packed => self.packed(),
            Encoding::Index  => self.index() as usize,
        }
    }

    /// Reads a cell written in the given encoding.
    pub fn decode(value: usize, encoding: Encoding) -> Result<Coord> {
        match encoding {
            Encoding::Index  => Coord::from_index(value),
            Encoding::Packed => {
                CoordTables::get().by_packed.get(value).copied().flatten()
                    .map(Coord::from_index_unchecked)
                    .ok_or_else(|| anyhow!("invalid packed coordinate {value:03}"))
            }
        }
    }

    /// Converts a value between encodings.
    pub fn convert(value: usize, from: Encoding, to: Encoding) -> Result<usize> {
        Coord::decode(value, from).map(|c| c.encode(to))
    }

    /// Every on-board neighbour of this cell, in no particular order.
    pub fn hex_neighbours(&self) -> impl Iterator<Item = Coord> + use<> {
        let offsets = match self.row % 2 {
            0 => &EVEN_ROW_OFFSETS,
            _ => &ODD_ROW_OFFSETS
        };
        let origin = OffsetCoord::from(*self);
        offsets.iter()
            .map(move |offset| origin + *offset)
            .filter_map(|candidate| candidate.coerce())
    }
}

/// Simple signed offset pair that can be used to calculate neighbours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OffsetCoord {
    pub rows: isize,
    pub cols: isize,
}

/// Offsets from a cell on a (wide) even row to its neighbours.
///
/// Odd rows are one column shorter and sit between the cells of the even rows, so an even cell at column `c`
/// touches columns `c - 1` and `c` of the rows above and below.
pub static EVEN_ROW_OFFSETS: [OffsetCoord; MAX_NEIGHBOURS] = [
    OffsetCoord { rows: -1, cols: -1 },
    OffsetCoord { rows: -1, cols: 0 },
    OffsetCoord { rows: 0, cols: -1 },
    OffsetCoord { rows: 0, cols: 1 },
    OffsetCoord { rows: 1, cols: -1 },
    OffsetCoord { rows: 1, cols: 0 },
];

/// Offsets from a cell on a (narrow) odd row to its neighbours.
pub static ODD_ROW_OFFSETS: [OffsetCoord; MAX_NEIGHBOURS] = [
    OffsetCoord { rows: -1, cols: 0 },
    OffsetCoord { rows: -1, cols: 1 },
    OffsetCoord { rows: 0, cols: -1 },
    OffsetCoord { rows: 0, cols: 1 },
    OffsetCoord { rows: 1, cols: 0 },
    OffsetCoord { rows: 1, cols: 1 },
];

impl OffsetCoord {
    /// Turns the offset back into a coordinate if it lands on the board.
    pub fn coerce(&self) -> Option<Coord> {
        if self.rows < 0 || self.cols < 0 {
            return None;
        }
        let coord = Coord { row: self.rows as usize, col: self.cols as usize };
        coord.in_bounds().then_some(coord)
    }
}

impl From<Coord> for OffsetCoord {
    fn from(value: Coord) -> Self {
        OffsetCoord {
            rows: value.row as isize,
            cols: value.col as isize,
        }
    }
}

impl std::ops::Add<OffsetCoord> for OffsetCoord {
    type Output = OffsetCoord;
    fn add(self, rhs: OffsetCoord) -> Self::Output {
        OffsetCoord {
            rows: self.rows + rhs.rows,
            cols: self.cols + rhs.cols,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodings_round_trip_every_cell() {
        for index in 0..CELL_COUNT {
            let coord = Coord::from_index(index).unwrap();
            assert!(coord.in_bounds());
            assert_eq!(coord.index() as usize, index);
            assert_eq!(Coord::decode(coord.packed(), Encoding::Packed).unwrap(), coord);
            assert_eq!(Coord::convert(index, Encoding::Index, Encoding::Packed).unwrap(), coord.packed());
        }
        assert_eq!(Coord::from_index(CELL_COUNT - 1).unwrap(), Coord { row: 6, col: 15 });
        assert_eq!(Coord::decode(308, Encoding::Packed).unwrap().index() as usize, ROW_OFFSETS[3] + 8);
        assert_eq!(Coord::decode(308, Encoding::Packed).unwrap().index(), 55);
    }

    #[test]
    fn invalid_arguments_are_faults() {
        assert!(Coord::from_index(CELL_COUNT).is_err());
        assert!(Coord::new(1, 15).is_err()); // odd rows only have 15 columns
        assert!(Coord::new(7, 0).is_err());
        assert!(Coord::decode(115, Encoding::Packed).is_err());
        assert!(Coord::decode(10_000, Encoding::Packed).is_err());
        assert!("hex".parse::<Encoding>().is_err());
        assert!("2x8".parse::<Coord>().is_err());
        assert_eq!("208".parse::<Coord>().unwrap(), Coord { row: 2, col: 8 });
    }

    #[test]
    fn corner_cells_have_fewer_neighbours() {
        assert_eq!(Coord { row: 0, col: 0 }.hex_neighbours().count(), 2);
        assert_eq!(Coord { row: 1, col: 0 }.hex_neighbours().count(), 5);
        assert_eq!(Coord { row: 3, col: 7 }.hex_neighbours().count(), 6);
        assert_eq!(Coord { row: 6, col: 15 }.hex_neighbours().count(), 2);
    }
}
