//! Linear interpolation of trajectories onto new time axes

use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use log::debug;
use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::trajectory::layout::{DEFAULT_OBS_DIM, DEFAULT_TIME_DIM};
use crate::trajectory::{Layout, TrajectorySet};
use crate::types::Timestamp;

/// Target time axis of [`TrajectorySet::gridtime`]
#[derive(Debug, Clone, PartialEq)]
pub enum TimeSpec {
    /// Explicit, strictly increasing times
    Times(Vec<DateTime<Utc>>),
    /// Fixed interval spanning the time coverage of the set
    Frequency(TimeDelta),
}

impl TimeSpec {
    /// Parses a frequency such as `"h"`, `"6h"`, `"30min"`, `"D"` or `"15s"`
    pub fn frequency(freq: &str) -> Result<Self> {
        parse_frequency(freq).map(TimeSpec::Frequency)
    }

    fn resolve(&self, coverage: &[DateTime<Utc>]) -> Result<Vec<DateTime<Utc>>> {
        match self {
            TimeSpec::Times(times) => {
                if times.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(Error::Configuration(
                        "target times must be strictly increasing".to_string(),
                    ));
                }
                Ok(times.clone())
            }
            TimeSpec::Frequency(step) => {
                if *step <= TimeDelta::zero() {
                    return Err(Error::Configuration(format!(
                        "frequency must be positive, got {}",
                        step
                    )));
                }
                let (Some(&start), Some(&end)) = (coverage.iter().min(), coverage.iter().max())
                else {
                    return Ok(Vec::new());
                };

                let mut times = Vec::new();
                let mut t = start;
                while t <= end {
                    times.push(t);
                    t += *step;
                }
                Ok(times)
            }
        }
    }
}

impl FromStr for TimeSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        TimeSpec::frequency(s)
    }
}

fn parse_frequency(freq: &str) -> Result<TimeDelta> {
    let invalid = || Error::Configuration(format!("invalid frequency '{}'", freq));

    let freq = freq.trim();
    let split = freq.find(|c: char| !c.is_ascii_digit()).unwrap_or(freq.len());
    let (count, unit) = freq.split_at(split);

    let count: i32 = if count.is_empty() {
        1
    } else {
        count.parse().map_err(|_| invalid())?
    };
    if count == 0 {
        return Err(invalid());
    }

    let unit = match unit {
        "W" | "w" => TimeDelta::weeks(1),
        "D" | "d" => TimeDelta::days(1),
        "h" | "H" => TimeDelta::hours(1),
        "min" | "T" => TimeDelta::minutes(1),
        "s" | "S" => TimeDelta::seconds(1),
        "ms" | "L" => TimeDelta::milliseconds(1),
        _ => return Err(invalid()),
    };

    unit.checked_mul(count).ok_or_else(invalid)
}

fn fractional_seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) * 1e-9
}

/// Where one target time falls along a trajectory
#[derive(Debug, Clone, Copy, PartialEq)]
enum Sample {
    Missing,
    Exact(usize),
    Between(usize, usize, f64),
}

/// Locates every target time among the timed observations of one trajectory
fn plan(source: &[Timestamp], targets: &[Timestamp]) -> Vec<Sample> {
    let mut known: Vec<(DateTime<Utc>, usize)> = source
        .iter()
        .enumerate()
        .filter_map(|(j, t)| t.map(|t| (t, j)))
        .collect();
    known.sort_by_key(|&(t, _)| t);
    known.dedup_by_key(|&mut (t, _)| t);

    targets
        .iter()
        .map(|target| {
            let Some(target) = *target else {
                return Sample::Missing;
            };
            let k = known.partition_point(|&(t, _)| t < target);
            match known.get(k) {
                Some(&(t, j)) if t == target => Sample::Exact(j),
                Some(&(t1, j1)) if k > 0 => {
                    let (t0, j0) = known[k - 1];
                    let w = fractional_seconds(target - t0) / fractional_seconds(t1 - t0);
                    Sample::Between(j0, j1, w)
                }
                _ => Sample::Missing,
            }
        })
        .collect()
}

fn apply(values: &Array2<f64>, plans: &[Vec<Sample>], width: usize) -> Array2<f64> {
    Array2::from_shape_fn((plans.len(), width), |(t, k)| match plans[t][k] {
        Sample::Missing => f64::NAN,
        Sample::Exact(j) => values[[t, j]],
        Sample::Between(j0, j1, w) => {
            let (a, b) = (values[[t, j0]], values[[t, j1]]);
            a + w * (b - a)
        }
    })
}

impl TrajectorySet {
    fn source_times(&self, op: &str) -> Result<Vec<Vec<Timestamp>>> {
        (0..self.n_trajectories())
            .map(|t| {
                self.layout
                    .time_row(t)
                    .ok_or_else(|| {
                        Error::UndefinedOperation(format!("{} requires a time coordinate", op))
                    })
            })
            .collect()
    }

    fn interpolated(&self, plans: &[Vec<Sample>], width: usize, layout: Layout) -> TrajectorySet {
        let variables = self
            .variables
            .iter()
            .map(|(name, values)| (name.clone(), apply(values, plans, width)))
            .collect();

        self.with_data(
            apply(&self.x, plans, width),
            apply(&self.y, plans, width),
            layout,
            None,
            variables,
        )
    }

    /// Interpolates every trajectory onto one shared time axis
    ///
    /// Times outside the observed span of a trajectory give missing values.
    /// The result is time-indexed (1D); its time dimension is named
    /// `time_dim`, or keeps the current name.
    pub fn gridtime(&self, times: &TimeSpec, time_dim: Option<&str>) -> Result<TrajectorySet> {
        let source = self.source_times("gridtime")?;
        let targets: Vec<Timestamp> = times.resolve(&self.times())?.into_iter().map(Some).collect();

        let plans: Vec<Vec<Sample>> = source
            .into_par_iter()
            .map(|row| plan(&row, &targets))
            .collect();

        let time_dim = match (time_dim, &self.layout) {
            (Some(name), _) => name.to_string(),
            (None, Layout::OneD { time_dim, .. }) => time_dim.clone(),
            (None, Layout::TwoD { .. }) => DEFAULT_TIME_DIM.to_string(),
        };
        debug!("Gridding {} trajectories onto {} times", self.n_trajectories(), targets.len());

        let layout = Layout::OneD {
            time_dim,
            time: Array1::from(targets.clone()),
        };
        Ok(self.interpolated(&plans, targets.len(), layout))
    }

    /// Interpolates every trajectory onto its own target times
    ///
    /// Row `t` of `times` holds the targets of trajectory `t`; the result is
    /// observation-indexed (2D).
    pub fn gridobs(&self, times: &Array2<Timestamp>) -> Result<TrajectorySet> {
        if times.nrows() != self.n_trajectories() {
            return Err(Error::Shape(format!(
                "target times have {} rows, set has {} trajectories",
                times.nrows(),
                self.n_trajectories()
            )));
        }

        let source = self.source_times("gridobs")?;
        let plans: Vec<Vec<Sample>> = source
            .into_par_iter()
            .enumerate()
            .map(|(t, row)| plan(&row, &times.row(t).to_vec()))
            .collect();

        let obs_dim = match &self.layout {
            Layout::TwoD { obs_dim, .. } => obs_dim.clone(),
            Layout::OneD { .. } => DEFAULT_OBS_DIM.to_string(),
        };
        debug!(
            "Gridding {} trajectories onto {} observations",
            self.n_trajectories(),
            times.ncols()
        );

        let layout = Layout::TwoD {
            obs_dim,
            time: Some(times.clone()),
        };
        Ok(self.interpolated(&plans, times.ncols(), layout))
    }
}
