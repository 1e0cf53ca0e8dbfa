/*
 *  The hexagonal toggle board: seven rows of alternating width, where a click flips every neighbour of the clicked cell.
 */

pub(crate) mod adjacency;
pub(crate) mod consts;
pub mod coords;
pub(crate) mod grid;
pub mod masks;
pub mod notation;
pub mod variants;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        adjacency::Adjacency,
        consts::*,
        coords::{Coord, Encoding},
        grid::Grid,
        masks::CellMask,
        notation::CellList,
        variants::Variant
    };
}
