use crate::hex_grid::prelude::*;

/// The named starting boards.
///
/// Apart from `Blank` and `Custom`, each board is the pattern left behind by clicking a few cells on an empty grid,
/// so every one of them has a known solution with that many clicks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Variant {
    /// Nothing active.
    Blank,
    /// One click at (3,7).
    Single,
    /// Two clicks far apart, at (1,3) and (5,11).
    Pair,
    /// Four clicks at (2,8), (3,6), (3,8) and (4,7).
    Quartet,
    /// A literal set of active cells.
    Custom(CellMask),
}

impl std::str::FromStr for Variant {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blank"   => Ok(Variant::Blank),
            "single"  => Ok(Variant::Single),
            "pair"    => Ok(Variant::Pair),
            "quartet" => Ok(Variant::Quartet),
            _         => Err(anyhow!("unknown board variant {s}"))
        }
    }
}

impl Variant {
    /// The named variants in order.
    pub fn all() -> [Variant; 4] {
        [Variant::Blank, Variant::Single, Variant::Pair, Variant::Quartet]
    }

    /// A custom board with the given active cells.
    pub fn custom(active: &[Coord]) -> Result<Variant> {
        let mask = CellMask::from_coords(active).context("custom board")?;
        Ok(Variant::Custom(mask))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Blank     => "blank",
            Variant::Single    => "single",
            Variant::Pair      => "pair",
            Variant::Quartet   => "quartet",
            Variant::Custom(_) => "custom",
        }
    }

    /// The clicks (packed coordinates) whose pattern forms this board, if it is one of the generated boards.
    pub fn seed_clicks(&self) -> &'static [usize] {
        match self {
            Variant::Single  => &[307],
            Variant::Pair    => &[103, 511],
            Variant::Quartet => &[208, 306, 308, 407],
            _                => &[]
        }
    }

    /// The starting active cells.
    pub fn initial(&self) -> CellMask {
        match self {
            Variant::Custom(mask) => *mask,
            _ => {
                let clicks = self.seed_clicks().iter()
                    .map(|&p| Coord { row: p / PACKED_ROW_STRIDE, col: p % PACKED_ROW_STRIDE }.index())
                    .collect::<Vec<_>>();
                Adjacency::get().pattern(&clicks)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_clicks_are_on_the_board() {
        for variant in Variant::all() {
            for &packed in variant.seed_clicks() {
                assert!(Coord::decode(packed, Encoding::Packed).is_ok(), "{} seed {packed}", variant.name());
            }
            assert_eq!(variant.name().parse::<Variant>().unwrap(), variant);
        }
    }

    #[test]
    fn generated_boards_are_not_blank() {
        assert!(Variant::Blank.initial().is_empty());
        assert_eq!(Variant::Single.initial().len(), 6);
        assert_eq!(Variant::Pair.initial().len(), 12);
        assert!(!Variant::Quartet.initial().is_empty());
    }

    #[test]
    fn custom_boards_hold_their_cells() {
        let cells = [Coord::new(2, 8).unwrap(), Coord::new(4, 7).unwrap()];
        let variant = Variant::custom(&cells).unwrap();
        assert_eq!(variant.initial().len(), 2);
        assert!(Variant::custom(&[Coord { row: 1, col: 15 }]).is_err());
        assert!("spiral".parse::<Variant>().is_err());
    }
}
