pub mod boundary;
pub mod coord;
pub mod tiling;

pub use boundary::BoundingBox;
pub use coord::degree_dist;
pub use coord::sphere_dist;
pub use coord::Coord;
pub use tiling::Tile;
pub use tiling::Tiling;
