use regex::Regex;

use crate::hex_grid::prelude::*;

/// A list of cells written either as packed numbers (`208,306`) or as `(row,col)` pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellList {
    pub repr: String,
    pub coords: Vec<Coord>,
}

impl std::str::FromStr for CellList {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let pattern = Regex::new(r"\(\s*(?<row>[0-9]+)\s*,\s*(?<col>[0-9]+)\s*\)|(?<packed>[0-9]+)")?;
        let leftover = pattern.replace_all(s, "");
        if let Some(junk) = leftover.chars().find(|ch| !(ch.is_whitespace() || *ch == ',' || *ch == '{' || *ch == '}')) {
            return Err(anyhow!("unexpected character {junk:?} in cell list {s}"));
        }

        let mut coords = vec![];
        for captures in pattern.captures_iter(s) {
            let coord = match captures.name("packed") {
                Some(packed) => packed.as_str().parse::<Coord>()?,
                None => {
                    let [row, col] = ["row", "col"].map(|name| {
                        captures.name(name).map_or("", |m| m.as_str()).parse::<usize>()
                    });
                    Coord::new(row?, col?)?
                }
            };
            coords.push(coord);
        }
        Ok(CellList { repr: s.to_owned(), coords })
    }
}

impl CellList {
    /// The cells in linear-index form.
    pub fn indices(&self) -> Vec<CellIndex> {
        self.coords.iter().map(|c| c.index()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        let packed = "208,306, 308 407".parse::<CellList>().unwrap();
        let tuples = "{(2,8), (3,6), (3, 8), (4,7)}".parse::<CellList>().unwrap();
        assert_eq!(packed.coords, tuples.coords);
        assert_eq!(packed.coords[1], Coord { row: 3, col: 6 });
    }

    #[test]
    fn rejects_bad_cells() {
        assert!("208,x".parse::<CellList>().is_err());
        assert!("(1,15)".parse::<CellList>().is_err());
        assert!("999".parse::<CellList>().is_err());
    }
}
