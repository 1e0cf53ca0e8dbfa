use itertools::Itertools;

use crate::hex_grid::prelude::*;

impl Grid {
    /// Pretty-prints the board, indenting the narrow rows so the hex layout reads correctly.
    pub fn pretty(&self) -> String {
        (0..ROWS).map(|row| {
            let indent = if row % 2 == 0 { "" } else { " " };
            let cells = (0..row_width(row)).map(|col| {
                let index = (ROW_OFFSETS[row] + col) as CellIndex;
                if self.get_unchecked(index) { "#" } else { "." }
            }).join(" ");
            format!("{indent}{cells}")
        }).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_marks_active_cells() {
        let grid = Grid::new(CellMask::from_indices(&[0, 16]).unwrap()).unwrap();
        let rendered = grid.pretty();
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), ROWS);
        assert!(lines[0].starts_with("# ."));
        assert!(lines[1].starts_with(" # ."));
        assert_eq!(rendered.matches('#').count(), 2);
    }
}
