//! Core data types for trajkit

use chrono::{DateTime, Utc};

/// A point in time; `None` marks a missing time (NaT)
pub type Timestamp = Option<DateTime<Utc>>;

/// Shape of a trajectory set: trajectories × observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub trajectories: usize,
    pub observations: usize,
}

impl Dimensions {
    /// Creates new dimensions
    pub fn new(trajectories: usize, observations: usize) -> Self {
        Self {
            trajectories,
            observations,
        }
    }

    /// The `(trajectory, observation)` shape tuple used by ndarray
    pub fn shape(&self) -> (usize, usize) {
        (self.trajectories, self.observations)
    }
}

impl From<(usize, usize)> for Dimensions {
    fn from((trajectories, observations): (usize, usize)) -> Self {
        Self::new(trajectories, observations)
    }
}
