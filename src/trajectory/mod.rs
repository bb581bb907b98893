//! Trajectory data model

pub mod attrs;
pub mod dataset;
pub mod fields;
pub mod georef;
pub mod layout;

pub use attrs::CfAttributes;
pub use dataset::TrajectorySet;
pub use fields::CoordinateFieldNames;
pub use georef::CrsWarning;
pub use layout::Layout;
