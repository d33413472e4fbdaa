pub mod d2q9;
pub mod global_variables;
pub mod io;
pub mod post;

pub use global_variables::*;

use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeType {
    Fluid = 0,
    Solid = 1,
}

#[derive(Clone, Debug)]
pub struct Residuals {
    pub density: Float,
    pub velocity: Vec<Float>,
}

#[derive(Debug, Error)]
pub enum LbmError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("invalid value `{value}` for parameter `{key}`")]
    InvalidParameter { key: String, value: String },
    #[error(
        "the lattice {nx} x {ny} is too small: both dimensions must be at least {min}",
        min = MIN_DIMENSION
    )]
    InvalidDimensions { nx: usize, ny: usize },
    #[error("the obstacle cell ({x}, {y}) is outside the interior of the lattice")]
    ObstacleOutOfBounds { x: i64, y: i64 },
}
