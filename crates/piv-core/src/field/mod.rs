pub mod driver;
pub mod grid;
pub mod types;

pub use driver::{
    extended_search_area_piv, extended_search_area_piv_with_progress, process_cell, PivSettings,
};
pub use grid::{field_shape, get_coordinates, GridSpec};
pub use types::{CellResult, CellStatus, Coordinates, VectorField};
