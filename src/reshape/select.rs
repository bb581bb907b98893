//! Per-trajectory selection of observations by time window or index

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::trajectory::{Layout, TrajectorySet};

/// Observations to pick from each trajectory, counted among its existing
/// observations; negative positions count from the end
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObsSelection {
    Index(isize),
    Indices(Vec<isize>),
    Slice {
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    },
}

impl ObsSelection {
    /// Positions selected from a sequence of length `len`
    ///
    /// Indices beyond either end are skipped.
    fn resolve(&self, len: usize) -> Result<Vec<usize>> {
        let n = len as isize;
        let wrap = |i: isize| if i < 0 { i + n } else { i };
        let in_range = |i: isize| (0..n).contains(&i);

        match self {
            ObsSelection::Index(i) => Ok(Some(wrap(*i))
                .filter(|&i| in_range(i))
                .map(|i| i as usize)
                .into_iter()
                .collect()),
            ObsSelection::Indices(indices) => Ok(indices
                .iter()
                .map(|&i| wrap(i))
                .filter(|&i| in_range(i))
                .map(|i| i as usize)
                .collect()),
            ObsSelection::Slice { step: 0, .. } => {
                Err(Error::Configuration("slice step cannot be zero".to_string()))
            }
            ObsSelection::Slice { start, stop, step } if *step > 0 => {
                let start = start.map(wrap).unwrap_or(0).clamp(0, n);
                let stop = stop.map(wrap).unwrap_or(n).clamp(0, n);
                Ok((start..stop).step_by(*step as usize).map(|i| i as usize).collect())
            }
            ObsSelection::Slice { start, stop, step } => {
                let start = start.map(wrap).unwrap_or(n - 1).clamp(-1, n - 1);
                let stop = stop.map(wrap).unwrap_or(-1).clamp(-1, n - 1);

                let mut picked = Vec::new();
                let mut i = start;
                while i > stop {
                    picked.push(i as usize);
                    i += step;
                }
                Ok(picked)
            }
        }
    }
}

impl From<isize> for ObsSelection {
    fn from(i: isize) -> Self {
        ObsSelection::Index(i)
    }
}

impl From<Vec<isize>> for ObsSelection {
    fn from(indices: Vec<isize>) -> Self {
        ObsSelection::Indices(indices)
    }
}

fn within(t: Option<DateTime<Utc>>, t0: Option<DateTime<Utc>>, t1: Option<DateTime<Utc>>) -> bool {
    match t {
        Some(t) => t0.map_or(true, |t0| t >= t0) && t1.map_or(true, |t1| t <= t1),
        None => false,
    }
}

impl TrajectorySet {
    /// Observations with times between `t0` and `t1`, both inclusive and
    /// either open when `None`
    ///
    /// Observation-indexed sets are condensed per trajectory; trajectories
    /// left without observations are kept.
    pub fn seltime(
        &self,
        t0: Option<DateTime<Utc>>,
        t1: Option<DateTime<Utc>>,
    ) -> Result<TrajectorySet> {
        match &self.layout {
            Layout::OneD { time, .. } => {
                let cols: Vec<usize> = (0..time.len())
                    .filter(|&j| within(time[j], t0, t1))
                    .collect();
                Ok(self.gather_columns(&cols))
            }
            Layout::TwoD { time: Some(time), .. } => {
                let picks: Vec<Vec<usize>> = time
                    .rows()
                    .into_iter()
                    .map(|row| (0..row.len()).filter(|&j| within(row[j], t0, t1)).collect())
                    .collect();
                Ok(self.gather_rows(&picks))
            }
            Layout::TwoD { time: None, .. } => {
                Err(Error::UndefinedOperation("seltime requires a time coordinate".to_string()))
            }
        }
    }

    /// Observations picked by position among the existing observations of
    /// each trajectory
    pub fn iseltime(&self, selection: &ObsSelection) -> Result<TrajectorySet> {
        if let Layout::OneD { time, .. } = &self.layout {
            let timed: Vec<usize> = (0..time.len()).filter(|&j| time[j].is_some()).collect();
            let cols: Vec<usize> = selection
                .resolve(timed.len())?
                .into_iter()
                .map(|k| timed[k])
                .collect();
            return Ok(self.gather_columns(&cols));
        }

        let picks = self
            .observed()
            .rows()
            .into_iter()
            .map(|row| -> Result<Vec<usize>> {
                let present: Vec<usize> = (0..row.len()).filter(|&j| row[j]).collect();
                Ok(selection
                    .resolve(present.len())?
                    .into_iter()
                    .map(|k| present[k])
                    .collect())
            })
            .collect::<Result<Vec<Vec<usize>>>>()?;

        Ok(self.gather_rows(&picks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::dataset::tests::{hours, ragged};

    #[test]
    fn test_resolve_indices() {
        assert_eq!(ObsSelection::Index(-1).resolve(5).unwrap(), vec![4]);
        assert_eq!(ObsSelection::Index(7).resolve(5).unwrap(), Vec::<usize>::new());
        assert_eq!(ObsSelection::Indices(vec![0, -1, 9]).resolve(5).unwrap(), vec![0, 4]);
    }

    #[test]
    fn test_resolve_slices() {
        let slice = |start, stop, step| ObsSelection::Slice { start, stop, step };

        assert_eq!(slice(None, None, 2).resolve(5).unwrap(), vec![0, 2, 4]);
        assert_eq!(slice(Some(1), Some(-1), 1).resolve(5).unwrap(), vec![1, 2, 3]);
        assert_eq!(slice(None, None, -1).resolve(4).unwrap(), vec![3, 2, 1, 0]);
        assert_eq!(slice(Some(-2), None, -1).resolve(4).unwrap(), vec![2, 1, 0]);
        assert_eq!(slice(Some(10), Some(20), 1).resolve(4).unwrap(), Vec::<usize>::new());
        assert!(matches!(slice(None, None, 0).resolve(4), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_iseltime_first_and_last() {
        let set = ragged();
        let selected = set.iseltime(&ObsSelection::Indices(vec![0, -1])).unwrap();

        assert_eq!(selected.dims().shape(), (2, 2));
        assert_eq!(selected.tx().row(0).to_vec(), vec![1.0, 5.0]);
        assert_eq!(selected.tx().row(1).to_vec(), vec![11.0, 14.0]);
        assert_eq!(selected.time_at(1, 1), hours(8));
    }

    #[test]
    fn test_iseltime_gridded() {
        let set = ragged().gridtime(&"h".parse().unwrap(), None).unwrap();
        let selected = set.iseltime(&ObsSelection::Index(-1)).unwrap();

        assert!(selected.is_1d());
        assert_eq!(selected.n_observations(), 1);
        assert_eq!(selected.time_at(0, 0), hours(8));
        assert_eq!(selected.tx()[[1, 0]], 14.0);
    }

    #[test]
    fn test_seltime_window() {
        let selected = ragged().seltime(hours(3), hours(6)).unwrap();

        assert_eq!(selected.dims().shape(), (2, 2));
        assert_eq!(selected.tx().row(0).to_vec(), vec![4.0, 5.0]);
        assert_eq!(selected.tx().row(1).to_vec(), vec![11.0, 12.0]);
    }

    #[test]
    fn test_seltime_keeps_empty_trajectories() {
        let selected = ragged().seltime(None, hours(1)).unwrap();

        assert_eq!(selected.n_trajectories(), 2);
        assert_eq!(selected.tx().row(0).to_vec(), vec![1.0, 2.0]);
        assert!(selected.tx().row(1).iter().all(|v| v.is_nan()));
        assert_eq!(selected.labels(), ragged().labels());
    }

    #[test]
    fn test_seltime_gridded() {
        let set = ragged().gridtime(&"h".parse().unwrap(), None).unwrap();
        let selected = set.seltime(hours(2), None).unwrap();

        assert!(selected.is_1d());
        assert_eq!(selected.n_observations(), 7);
        assert_eq!(selected.time_at(0, 0), hours(2));
    }
}
