pub mod console;
pub mod hex_grid;
pub mod search;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;
        pub use primitive_types::U128;

        pub use std::{
            collections::{BTreeSet, HashMap},
            sync::Arc,
            time::{Duration, Instant}
        };
    }
}

pub mod prelude {
    pub use super::console::*;
    pub use super::hex_grid::prelude::*;
    pub use super::search::prelude::*;
    pub use super::utils::prelude::*;
}
