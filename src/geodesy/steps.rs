//! Per-step distance, direction, time and speed along trajectories

use chrono::TimeDelta;
use ndarray::{Array2, Zip};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::geodesy::geodesic::{inverse, Inverse};
use crate::trajectory::{Layout, TrajectorySet};
use crate::types::Timestamp;

/// Distance and azimuths on a `[trajectory, observation]` grid
#[derive(Debug, Clone, PartialEq)]
pub struct GeodesicArrays {
    /// Distance [m]
    pub distance: Array2<f64>,
    /// Forward azimuth [deg]
    pub az_fwd: Array2<f64>,
    /// Back azimuth [deg]
    pub az_bwd: Array2<f64>,
}

impl GeodesicArrays {
    fn from_rows(rows: Vec<Vec<Inverse>>, dim: (usize, usize)) -> Self {
        let pick = |f: fn(&Inverse) -> f64| Array2::from_shape_fn(dim, |(i, j)| f(&rows[i][j]));

        Self {
            distance: pick(|s: &Inverse| s.distance),
            az_fwd: pick(|s: &Inverse| s.az_fwd),
            az_bwd: pick(|s: &Inverse| s.az_bwd),
        }
    }
}

/// Time from each observation to the next
#[derive(Debug, Clone, PartialEq)]
pub enum TimeToNext {
    /// A fixed interval shared by every observation (uniform 1D sets)
    Fixed(TimeDelta),
    /// One interval per observation; `None` where either time is missing
    Steps(Array2<Option<TimeDelta>>),
}

fn delta_seconds(delta: Option<TimeDelta>) -> f64 {
    delta
        .and_then(|d| d.num_microseconds())
        .map(|us| us as f64 * 1e-6)
        .unwrap_or(f64::NAN)
}

impl TimeToNext {
    /// Intervals in seconds on a grid of `dim`; missing intervals are NaN
    pub fn seconds(&self, dim: (usize, usize)) -> Array2<f64> {
        match self {
            TimeToNext::Fixed(delta) => Array2::from_elem(dim, delta_seconds(Some(*delta))),
            TimeToNext::Steps(steps) => steps.map(|d| delta_seconds(*d)),
        }
    }
}

/// Differences to the next element, the last one repeating its predecessor
fn deltas_to_next(times: &[Timestamp]) -> Vec<Option<TimeDelta>> {
    let mut deltas: Vec<Option<TimeDelta>> = times
        .windows(2)
        .map(|w| match (w[0], w[1]) {
            (Some(a), Some(b)) => Some(b - a),
            _ => None,
        })
        .collect();

    if let Some(&last) = deltas.last() {
        deltas.push(last);
    } else if !times.is_empty() {
        deltas.push(None);
    }
    deltas
}

/// Geodesic steps along one trajectory, the last repeating its predecessor
fn steps_along(lon: &[f64], lat: &[f64]) -> Vec<Inverse> {
    let n = lon.len();
    let mut steps: Vec<Inverse> = (0..n.saturating_sub(1))
        .map(|i| inverse(lon[i], lat[i], lon[i + 1], lat[i + 1]))
        .collect();

    match steps.last() {
        Some(&last) => steps.push(last),
        None if n == 1 => steps.push(Inverse::nan()),
        None => {}
    }

    // a lone valid position has no successor and no predecessor to repeat
    let valid: Vec<usize> = (0..n).filter(|&i| lon[i].is_finite() && lat[i].is_finite()).collect();
    if let [only] = valid.as_slice() {
        steps[*only] = Inverse::zero();
    }

    steps
}

impl TrajectorySet {
    /// Distance, forward and back azimuth from each position to the next
    pub fn geodesic_steps(&self) -> Result<GeodesicArrays> {
        let (lon, lat) = self.geographic("distance_to_next")?;
        let dim = lon.dim();

        let rows: Vec<Vec<Inverse>> = (0..dim.0)
            .into_par_iter()
            .map(|t| {
                let lon_row = lon.row(t).to_vec();
                let lat_row = lat.row(t).to_vec();
                steps_along(&lon_row, &lat_row)
            })
            .collect();

        Ok(GeodesicArrays::from_rows(rows, dim))
    }

    /// Distance [m] from each position to the next along trajectories
    ///
    /// Same shape as the positions; the last observation repeats the
    /// previous step.
    pub fn distance_to_next(&self) -> Result<Array2<f64>> {
        self.geodesic_steps().map(|s| s.distance)
    }

    /// Forward azimuth [deg, -180..180] from each position to the next
    pub fn azimuth_to_next(&self) -> Result<Array2<f64>> {
        self.geodesic_steps().map(|s| s.az_fwd)
    }

    /// Time from each observation to the next
    ///
    /// 1D sets on a uniform time axis reduce to a single fixed interval.
    pub fn time_to_next(&self) -> Result<TimeToNext> {
        match &self.layout {
            Layout::OneD { time, .. } => {
                let deltas = deltas_to_next(&time.to_vec());

                if let Some(first) = deltas.first().copied().flatten() {
                    if deltas.len() > 1 && deltas.iter().all(|d| *d == Some(first)) {
                        return Ok(TimeToNext::Fixed(first));
                    }
                }

                let steps = Array2::from_shape_fn(self.x.dim(), |(_, j)| deltas[j]);
                Ok(TimeToNext::Steps(steps))
            }
            Layout::TwoD { time: Some(time), .. } => {
                let mut steps = Array2::from_elem(time.dim(), None);
                for (t, row) in time.rows().into_iter().enumerate() {
                    for (j, d) in deltas_to_next(&row.to_vec()).into_iter().enumerate() {
                        steps[[t, j]] = d;
                    }
                }
                Ok(TimeToNext::Steps(steps))
            }
            Layout::TwoD { time: None, .. } => Err(Error::UndefinedOperation(
                "time_to_next requires a time coordinate".to_string(),
            )),
        }
    }

    /// Speed [m/s] from each position to the next
    ///
    /// A zero time step gives an infinite (or NaN for zero distance) speed;
    /// callers mask those.
    pub fn speed(&self) -> Result<Array2<f64>> {
        let distance = self.distance_to_next()?;
        let seconds = self.time_to_next()?.seconds(distance.dim());
        Ok(distance / seconds)
    }

    /// East (u) and north (v) velocity components [m/s]
    pub fn velocity_components(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        let speed = self.speed()?;
        let azimuth = self.azimuth_to_next()?;

        // compass azimuth (clockwise from north) to math angle (counter-clockwise from east)
        let theta = azimuth.mapv(|az| (90.0 - az).to_radians());

        let u = Zip::from(&speed).and(&theta).map_collect(|s, th| s * th.cos());
        let v = Zip::from(&speed).and(&theta).map_collect(|s, th| s * th.sin());
        Ok((u, v))
    }

    /// Distance and azimuths from each position to the matching position in `other`
    ///
    /// `other` is broadcast to this set's shape, so a single trajectory or a
    /// single observation can be compared against all of them.
    pub fn distance_to(&self, other: &TrajectorySet) -> Result<GeodesicArrays> {
        let (lon, lat) = self.geographic("distance_to")?;
        let (olon, olat) = other.geographic("distance_to")?;
        let dim = lon.dim();

        let broadcast_err = || {
            Error::Shape(format!(
                "cannot broadcast other dataset of shape {:?} to {:?}",
                olon.dim(),
                dim
            ))
        };
        let olon = olon.broadcast(dim).ok_or_else(broadcast_err)?;
        let olat = olat.broadcast(dim).ok_or_else(broadcast_err)?;

        let rows: Vec<Vec<Inverse>> = (0..dim.0)
            .map(|t| {
                (0..dim.1)
                    .map(|j| inverse(lon[[t, j]], lat[[t, j]], olon[[t, j]], olat[[t, j]]))
                    .collect()
            })
            .collect();

        Ok(GeodesicArrays::from_rows(rows, dim))
    }
}
