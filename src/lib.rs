//! trajkit - Trajectory analytics for drifters and particle simulations
//!
//! trajkit works on sets of trajectories stored as `[trajectory, observation]`
//! arrays, either sampled on one shared time axis or with ragged
//! per-trajectory observations. It provides coordinate reference system
//! handling, geodesic step metrics, convex hulls, skill scores and reshaping
//! of ragged observation axes.
//!
//! # Examples
//!
//! ## Distances and speed
//!
//! ```no_run
//! use chrono::{Duration, TimeZone, Utc};
//! use ndarray::array;
//! use trajkit::{CoordinateFieldNames, Layout, TrajectorySet};
//!
//! let t0 = Utc.with_ymd_and_hms(2022, 10, 7, 0, 0, 0).unwrap();
//! let times = array![[Some(t0), Some(t0 + Duration::hours(1)), Some(t0 + Duration::hours(2))]];
//!
//! let set = TrajectorySet::new(
//!     CoordinateFieldNames::lonlat(),
//!     array![[4.0, 4.1, 4.3]],
//!     array![[60.0, 60.05, 60.1]],
//!     Layout::observations(times),
//! )?;
//!
//! let distance = set.distance_to_next()?;
//! let speed = set.speed()?;
//! println!("Step lengths: {}, speeds: {}", distance, speed);
//! # Ok::<(), trajkit::Error>(())
//! ```
//!
//! ## Regridding ragged trajectories
//!
//! ```no_run
//! # fn load() -> trajkit::TrajectorySet { unimplemented!() }
//! use trajkit::TimeSpec;
//!
//! let set = load();
//!
//! let condensed = set.condense_obs()?;
//! let hourly = condensed.gridtime(&TimeSpec::frequency("h")?, None)?;
//! println!("Hull area: {} m²", hourly.hull_area()?);
//! # Ok::<(), trajkit::Error>(())
//! ```

pub mod error;
pub mod types;
pub mod projection;
pub mod trajectory;
pub mod geodesy;
pub mod hull;
pub mod skill;
pub mod reshape;

pub use error::{Error, Result};
pub use types::{Dimensions, Timestamp};
pub use projection::{Coordinate, CoordinateSystem, GridMapping, Projection, Transformer};
pub use trajectory::{CfAttributes, CoordinateFieldNames, CrsWarning, Layout, TrajectorySet};
pub use geodesy::{GeodesicArrays, TimeToNext};
pub use hull::ConvexHull;
pub use skill::{SkillMethod, SkillOptions};
pub use reshape::{ObsSelection, TimeSpec};
