//! Ellipsoidal geodesics along trajectories

pub mod geodesic;
pub mod steps;

pub use geodesic::{inverse, Inverse};
pub use steps::{GeodesicArrays, TimeToNext};
