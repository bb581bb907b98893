//! The trajectory set: positions, times and carried fields on a ragged grid

use std::collections::BTreeMap;

use ndarray::{Array2, Zip};

use crate::error::{Error, Result};
use crate::projection::{CoordinateSystem, GridMapping};
use crate::trajectory::fields::CoordinateFieldNames;
use crate::trajectory::layout::Layout;
use crate::types::{Dimensions, Timestamp};

/// A collection of trajectories sharing an observation axis
///
/// Positions, status and carried variables are `[trajectory, observation]`
/// arrays of identical shape. The coordinate system is resolved once when the
/// set is built and is only recomputed when a new set is derived with a
/// different grid mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySet {
    pub(crate) names: CoordinateFieldNames,
    pub(crate) x: Array2<f64>,
    pub(crate) y: Array2<f64>,
    pub(crate) layout: Layout,
    pub(crate) status: Option<Array2<Option<i32>>>,
    pub(crate) variables: BTreeMap<String, Array2<f64>>,
    pub(crate) labels: Vec<String>,
    pub(crate) grid_mapping: Option<GridMapping>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) crs: CoordinateSystem,
}

impl TrajectorySet {
    /// Creates a trajectory set from position arrays
    pub fn new(
        names: CoordinateFieldNames,
        x: Array2<f64>,
        y: Array2<f64>,
        layout: Layout,
    ) -> Result<Self> {
        if x.dim() != y.dim() {
            return Err(Error::Shape(format!(
                "{} has shape {:?} but {} has shape {:?}",
                names.x,
                x.dim(),
                names.y,
                y.dim()
            )));
        }

        let dims = Dimensions::from(x.dim());
        layout.validate(dims)?;

        let crs = CoordinateSystem::resolve(None, &names)?;
        let labels = (0..dims.trajectories).map(|i| i.to_string()).collect();

        Ok(Self {
            names,
            x,
            y,
            layout,
            status: None,
            variables: BTreeMap::new(),
            labels,
            grid_mapping: None,
            attributes: BTreeMap::new(),
            crs,
        })
    }

    /// Attaches a grid mapping and resolves the coordinate system from it
    pub fn with_grid_mapping(mut self, grid_mapping: GridMapping) -> Result<Self> {
        self.crs = CoordinateSystem::resolve(Some(&grid_mapping), &self.names)?;
        self.grid_mapping = Some(grid_mapping);
        Ok(self)
    }

    /// Attaches per-observation status codes (`Some(0)` is active)
    pub fn with_status(mut self, status: Array2<Option<i32>>) -> Result<Self> {
        self.check_shape("status", status.dim())?;
        self.status = Some(status);
        Ok(self)
    }

    /// Attaches a per-observation variable carried through reshaping
    pub fn with_variable(mut self, name: &str, values: Array2<f64>) -> Result<Self> {
        if name == self.names.x || name == self.names.y {
            return Err(Error::Configuration(format!("'{}' is a position field", name)));
        }
        self.check_shape(name, values.dim())?;
        self.variables.insert(name.to_string(), values);
        Ok(self)
    }

    /// Replaces the trajectory labels
    pub fn with_labels<S: Into<String>>(mut self, labels: Vec<S>) -> Result<Self> {
        if labels.len() != self.n_trajectories() {
            return Err(Error::Shape(format!(
                "{} labels for {} trajectories",
                labels.len(),
                self.n_trajectories()
            )));
        }
        self.labels = labels.into_iter().map(Into::into).collect();
        Ok(self)
    }

    /// Adds a global attribute
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    fn check_shape(&self, what: &str, dim: (usize, usize)) -> Result<()> {
        if dim != self.x.dim() {
            return Err(Error::Shape(format!(
                "{} has shape {:?}, positions have shape {:?}",
                what,
                dim,
                self.x.dim()
            )));
        }
        Ok(())
    }

    pub fn dims(&self) -> Dimensions {
        Dimensions::from(self.x.dim())
    }

    pub fn n_trajectories(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_observations(&self) -> usize {
        self.x.ncols()
    }

    pub fn names(&self) -> &CoordinateFieldNames {
        &self.names
    }

    /// Native x coordinates (usually longitude)
    pub fn tx(&self) -> &Array2<f64> {
        &self.x
    }

    /// Native y coordinates (usually latitude)
    pub fn ty(&self) -> &Array2<f64> {
        &self.y
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn is_1d(&self) -> bool {
        self.layout.is_1d()
    }

    pub fn is_2d(&self) -> bool {
        self.layout.is_2d()
    }

    pub fn status(&self) -> Option<&Array2<Option<i32>>> {
        self.status.as_ref()
    }

    pub fn variable(&self, name: &str) -> Option<&Array2<f64>> {
        self.variables.get(name)
    }

    pub fn variables(&self) -> &BTreeMap<String, Array2<f64>> {
        &self.variables
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn grid_mapping(&self) -> Option<&GridMapping> {
        self.grid_mapping.as_ref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The coordinate system resolved when the set was built
    pub fn crs(&self) -> &CoordinateSystem {
        &self.crs
    }

    /// Time of one observation
    pub fn time_at(&self, trajectory: usize, obs: usize) -> Timestamp {
        self.layout.time_at(trajectory, obs)
    }

    /// Whether each observation exists: its time is present for timed sets,
    /// both coordinates are finite otherwise
    pub fn observed(&self) -> Array2<bool> {
        match &self.layout {
            Layout::TwoD { time: Some(time), .. } => time.map(Option::is_some),
            Layout::OneD { time, .. } => {
                Array2::from_shape_fn(self.x.dim(), |(_, j)| time[j].is_some())
            }
            Layout::TwoD { time: None, .. } => self.finite_positions(),
        }
    }

    /// Whether both coordinates of each observation are finite
    pub fn finite_positions(&self) -> Array2<bool> {
        Zip::from(&self.x)
            .and(&self.y)
            .map_collect(|x, y| x.is_finite() && y.is_finite())
    }

    /// Finite positions that are also active (`status == 0`) when status is present
    pub fn active_positions(&self) -> Array2<bool> {
        let mut mask = self.finite_positions();
        if let Some(status) = &self.status {
            Zip::from(&mut mask)
                .and(status)
                .for_each(|m, s| *m = *m && *s == Some(0));
        }
        mask
    }

    /// Index of the last finite position along each trajectory
    pub fn index_of_last(&self) -> Vec<Option<usize>> {
        self.finite_positions()
            .rows()
            .into_iter()
            .map(|row| row.iter().rposition(|&v| v))
            .collect()
    }

    /// Every present time in the set
    pub fn times(&self) -> Vec<chrono::DateTime<chrono::Utc>> {
        match &self.layout {
            Layout::OneD { time, .. } => time.iter().flatten().copied().collect(),
            Layout::TwoD { time: Some(time), .. } => time.iter().flatten().copied().collect(),
            Layout::TwoD { time: None, .. } => Vec::new(),
        }
    }
}
