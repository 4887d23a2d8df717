pub use dir::Dir;
pub use grid_point::{GridDim, GridPoint};

mod dir;
mod grid_point;
