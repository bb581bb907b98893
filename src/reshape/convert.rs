//! Conversion between the time-indexed (1D) and observation-indexed (2D) layouts

use log::debug;
use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::trajectory::layout::DEFAULT_TIME_DIM;
use crate::trajectory::{Layout, TrajectorySet};

impl TrajectorySet {
    /// Re-indexes a single trajectory by its times
    ///
    /// Observations without a time are dropped.
    pub fn to_1d(&self) -> Result<TrajectorySet> {
        if self.n_trajectories() != 1 {
            return Err(Error::Shape(format!(
                "to_1d requires exactly one trajectory, got {}",
                self.n_trajectories()
            )));
        }
        if self.is_1d() {
            return Ok(self.clone());
        }

        let row = self
            .layout
            .time_row(0)
            .ok_or_else(|| {
                Error::UndefinedOperation("to_1d requires a time coordinate".to_string())
            })?;

        let cols: Vec<usize> = row
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_some())
            .map(|(j, _)| j)
            .collect();

        let mut set = self.gather_columns(&cols);
        set.layout = Layout::OneD {
            time_dim: DEFAULT_TIME_DIM.to_string(),
            time: cols.iter().map(|&j| row[j]).collect::<Array1<_>>(),
        };

        debug!("Converted trajectory to 1D with {} times", cols.len());
        Ok(set)
    }

    /// Gives every trajectory of a time-indexed set its own observation axis
    /// named `obs_dim`
    pub fn to_2d(&self, obs_dim: &str) -> Result<TrajectorySet> {
        let time = match &self.layout {
            Layout::OneD { time, .. } => time,
            Layout::TwoD { .. } => {
                return Err(Error::Shape("to_2d requires a time-indexed (1D) set".to_string()));
            }
        };

        let times = Array2::from_shape_fn(self.x.dim(), |(_, j)| time[j]);

        let mut set = self.clone();
        set.layout = Layout::TwoD {
            obs_dim: obs_dim.to_string(),
            time: Some(times),
        };
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::dataset::tests::{hours, ragged};
    use crate::trajectory::CoordinateFieldNames;
    use ndarray::array;

    fn single() -> TrajectorySet {
        TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[5.0, 5.1, 5.3]],
            array![[60.0, 60.2, 60.1]],
            Layout::observations(array![[hours(0), hours(1), hours(3)]]),
        )
        .unwrap()
        .with_variable("sst", array![[7.5, 7.4, 7.2]])
        .unwrap()
    }

    #[test]
    fn test_round_trip() {
        let set = single();
        let gridded = set.to_1d().unwrap();

        assert!(gridded.is_1d());
        assert_eq!(gridded.layout().obs_dim(), "time");
        assert_eq!(gridded.time_at(0, 2), hours(3));

        assert_eq!(gridded.to_2d("obs").unwrap(), set);
    }

    #[test]
    fn test_to_1d_drops_missing_times() {
        let set = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[5.0, f64::NAN, 5.3]],
            array![[60.0, f64::NAN, 60.1]],
            Layout::observations(array![[hours(0), None, hours(2)]]),
        )
        .unwrap();

        let gridded = set.to_1d().unwrap();
        assert_eq!(gridded.n_observations(), 2);
        assert_eq!(gridded.tx().row(0).to_vec(), vec![5.0, 5.3]);
    }

    #[test]
    fn test_to_1d_requires_single_trajectory() {
        assert!(matches!(ragged().to_1d(), Err(Error::Shape(_))));
    }

    #[test]
    fn test_to_1d_requires_time() {
        let set = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[5.0, 5.1]],
            array![[60.0, 60.2]],
            Layout::untimed(),
        )
        .unwrap();
        assert!(matches!(set.to_1d(), Err(Error::UndefinedOperation(_))));
    }

    #[test]
    fn test_to_2d_broadcasts_time() {
        let set = ragged().gridtime(&"h".parse().unwrap(), None).unwrap();
        let expanded = set.to_2d("obs").unwrap();

        assert!(expanded.is_2d());
        assert_eq!(expanded.time_at(1, 3), set.time_at(0, 3));
        assert!(matches!(expanded.to_2d("obs"), Err(Error::Shape(_))));
    }
}
