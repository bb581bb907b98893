//! Reshaping of ragged observation axes
//!
//! Every operation returns a new [`TrajectorySet`]; the input is never
//! modified. Trajectories are never dropped, even when an operation leaves
//! them without observations.

pub mod condense;
pub mod convert;
pub mod grid;
pub mod select;

use std::collections::BTreeMap;

use ndarray::{Array2, Axis};

use crate::trajectory::layout::DEFAULT_OBS_DIM;
use crate::trajectory::{Layout, TrajectorySet};

pub use grid::TimeSpec;
pub use select::ObsSelection;

impl TrajectorySet {
    /// Copy of this set with new data arrays and the same metadata
    pub(crate) fn with_data(
        &self,
        x: Array2<f64>,
        y: Array2<f64>,
        layout: Layout,
        status: Option<Array2<Option<i32>>>,
        variables: BTreeMap<String, Array2<f64>>,
    ) -> TrajectorySet {
        TrajectorySet {
            names: self.names.clone(),
            x,
            y,
            layout,
            status,
            variables,
            labels: self.labels.clone(),
            grid_mapping: self.grid_mapping.clone(),
            attributes: self.attributes.clone(),
            crs: self.crs.clone(),
        }
    }

    /// Observation-indexed set whose row `t` holds observations `picks[t]`
    /// of this set, padded with missing values to the longest row
    pub(crate) fn gather_rows(&self, picks: &[Vec<usize>]) -> TrajectorySet {
        let width = picks.iter().map(Vec::len).max().unwrap_or(0);
        let dim = (self.n_trajectories(), width);

        let take_f64 = |src: &Array2<f64>| {
            let mut out = Array2::from_elem(dim, f64::NAN);
            for (t, row) in picks.iter().enumerate() {
                for (k, &j) in row.iter().enumerate() {
                    out[[t, k]] = src[[t, j]];
                }
            }
            out
        };

        let time = self.layout.has_time().then(|| {
            let mut out = Array2::from_elem(dim, None);
            for (t, row) in picks.iter().enumerate() {
                for (k, &j) in row.iter().enumerate() {
                    out[[t, k]] = self.layout.time_at(t, j);
                }
            }
            out
        });

        let status = self.status.as_ref().map(|src| {
            let mut out = Array2::from_elem(dim, None);
            for (t, row) in picks.iter().enumerate() {
                for (k, &j) in row.iter().enumerate() {
                    out[[t, k]] = src[[t, j]];
                }
            }
            out
        });

        let variables = self
            .variables
            .iter()
            .map(|(name, values)| (name.clone(), take_f64(values)))
            .collect();

        let obs_dim = match &self.layout {
            Layout::TwoD { obs_dim, .. } => obs_dim.clone(),
            Layout::OneD { .. } => DEFAULT_OBS_DIM.to_string(),
        };

        self.with_data(
            take_f64(&self.x),
            take_f64(&self.y),
            Layout::TwoD { obs_dim, time },
            status,
            variables,
        )
    }

    /// Same-layout set keeping only observation columns `cols`
    pub(crate) fn gather_columns(&self, cols: &[usize]) -> TrajectorySet {
        let layout = match &self.layout {
            Layout::OneD { time_dim, time } => Layout::OneD {
                time_dim: time_dim.clone(),
                time: time.select(Axis(0), cols),
            },
            Layout::TwoD { obs_dim, time } => Layout::TwoD {
                obs_dim: obs_dim.clone(),
                time: time.as_ref().map(|t| t.select(Axis(1), cols)),
            },
        };

        self.with_data(
            self.x.select(Axis(1), cols),
            self.y.select(Axis(1), cols),
            layout,
            self.status.as_ref().map(|s| s.select(Axis(1), cols)),
            self.variables
                .iter()
                .map(|(name, values)| (name.clone(), values.select(Axis(1), cols)))
                .collect(),
        )
    }
}
