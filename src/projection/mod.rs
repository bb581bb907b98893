//! Coordinate reference systems and transforms

pub mod coordinate;
pub mod crs;
pub mod grid_mapping;
pub mod transformer;

pub use coordinate::Coordinate;
pub use crs::{CoordinateSystem, Projection};
pub use grid_mapping::{AttrValue, GridMapping, ProjectionBuilder};
pub use transformer::Transformer;
