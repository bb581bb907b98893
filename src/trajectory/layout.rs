//! Observation layouts: shared time axis (1D) or per-trajectory observations (2D)

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::types::{Dimensions, Timestamp};

/// Default name of the observation dimension of 2D sets
pub const DEFAULT_OBS_DIM: &str = "obs";

/// Default name of the time dimension of 1D sets
pub const DEFAULT_TIME_DIM: &str = "time";

/// How observations are indexed
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// Every trajectory is sampled on one shared, time-indexed axis
    OneD {
        time_dim: String,
        time: Array1<Timestamp>,
    },
    /// Each trajectory has its own observations, optionally timed
    TwoD {
        obs_dim: String,
        time: Option<Array2<Timestamp>>,
    },
}

impl Layout {
    /// A 2D layout without times
    pub fn untimed() -> Self {
        Layout::TwoD {
            obs_dim: DEFAULT_OBS_DIM.to_string(),
            time: None,
        }
    }

    /// A 2D layout with per-observation times
    pub fn observations(time: Array2<Timestamp>) -> Self {
        Layout::TwoD {
            obs_dim: DEFAULT_OBS_DIM.to_string(),
            time: Some(time),
        }
    }

    /// A 1D layout on a shared time axis
    pub fn gridded(time: Array1<Timestamp>) -> Self {
        Layout::OneD {
            time_dim: DEFAULT_TIME_DIM.to_string(),
            time,
        }
    }

    pub fn is_1d(&self) -> bool {
        matches!(self, Layout::OneD { .. })
    }

    pub fn is_2d(&self) -> bool {
        matches!(self, Layout::TwoD { .. })
    }

    /// Name of the observation axis
    pub fn obs_dim(&self) -> &str {
        match self {
            Layout::OneD { time_dim, .. } => time_dim,
            Layout::TwoD { obs_dim, .. } => obs_dim,
        }
    }

    pub fn has_time(&self) -> bool {
        match self {
            Layout::OneD { .. } => true,
            Layout::TwoD { time, .. } => time.is_some(),
        }
    }

    /// Time of one observation, `None` when missing or untimed
    pub fn time_at(&self, trajectory: usize, obs: usize) -> Timestamp {
        match self {
            Layout::OneD { time, .. } => time.get(obs).copied().flatten(),
            Layout::TwoD { time: Some(time), .. } => time.get((trajectory, obs)).copied().flatten(),
            Layout::TwoD { time: None, .. } => None,
        }
    }

    /// Times along one trajectory; `None` for untimed layouts
    pub fn time_row(&self, trajectory: usize) -> Option<Vec<Timestamp>> {
        match self {
            Layout::OneD { time, .. } => Some(time.to_vec()),
            Layout::TwoD { time: Some(time), .. } => Some(time.row(trajectory).to_vec()),
            Layout::TwoD { time: None, .. } => None,
        }
    }

    /// Checks the time coordinate against the position shape
    pub fn validate(&self, dims: Dimensions) -> Result<()> {
        match self {
            Layout::OneD { time, time_dim } if time.len() != dims.observations => {
                Err(Error::Shape(format!(
                    "time axis '{}' has {} entries, positions have {} observations",
                    time_dim,
                    time.len(),
                    dims.observations
                )))
            }
            Layout::TwoD { time: Some(time), .. } if time.dim() != dims.shape() => {
                Err(Error::Shape(format!(
                    "time has shape {:?}, positions have shape {:?}",
                    time.dim(),
                    dims.shape()
                )))
            }
            _ => Ok(()),
        }
    }
}
