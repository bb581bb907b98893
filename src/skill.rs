//! Skill scores comparing two sets of trajectories

use std::str::FromStr;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geodesy::inverse;
use crate::projection::Coordinate;
use crate::trajectory::TrajectorySet;

/// Skill-score method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillMethod {
    /// Liu & Weissberg (2011) normalized cumulative separation
    #[default]
    LiuWeissberg,
}

impl SkillMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SkillMethod::LiuWeissberg => "liu-weissberg",
        }
    }
}

impl FromStr for SkillMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "liu-weissberg" => Ok(SkillMethod::LiuWeissberg),
            other => Err(Error::Configuration(format!("unknown skill-score method '{}'", other))),
        }
    }
}

fn default_tolerance() -> f64 {
    1.0
}

/// Parameters of the skill-score methods
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillOptions {
    /// Liu-Weissberg tolerance threshold `n`
    #[serde(default = "default_tolerance")]
    pub tolerance_threshold: f64,
}

impl Default for SkillOptions {
    fn default() -> Self {
        Self {
            tolerance_threshold: default_tolerance(),
        }
    }
}

/// Distance between two positions in the units the score is computed in
type Metric = fn(Coordinate, Coordinate) -> f64;

fn geodesic(a: Coordinate, b: Coordinate) -> f64 {
    inverse(a.x, a.y, b.x, b.y).distance
}

fn euclidean(a: Coordinate, b: Coordinate) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Liu-Weissberg skill of `model` against the reference path `obs`
///
/// Both paths hold only the overlapping samples, in time order.
fn liu_weissberg(obs: &[Coordinate], model: &[Coordinate], metric: Metric, tolerance: f64) -> f64 {
    if obs.is_empty() {
        return f64::NAN;
    }

    let separation: f64 = obs.iter().zip(model).skip(1).map(|(&o, &m)| metric(o, m)).sum();
    if separation == 0.0 {
        return 1.0;
    }

    let lengths: f64 = obs
        .windows(2)
        .scan(0.0, |cumulative, w| {
            *cumulative += metric(w[0], w[1]);
            Some(*cumulative)
        })
        .sum();
    if lengths == 0.0 {
        return 0.0;
    }

    (1.0 - separation / lengths / tolerance).max(0.0)
}

fn overlapping(
    x: &Array2<f64>,
    y: &Array2<f64>,
    ox: &Array2<f64>,
    oy: &Array2<f64>,
    t: usize,
) -> (Vec<Coordinate>, Vec<Coordinate>) {
    (0..x.ncols())
        .map(|j| {
            (
                Coordinate::new(x[[t, j]], y[[t, j]]),
                Coordinate::new(ox[[t, j]], oy[[t, j]]),
            )
        })
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .unzip()
}

impl TrajectorySet {
    /// Skill score of `other` against this set, one value per trajectory
    ///
    /// Both sets must hold the same trajectories sampled at the same steps,
    /// typically after gridding both to a common time axis.
    pub fn skill(&self, other: &TrajectorySet, method: &str) -> Result<Array1<f64>> {
        self.skill_with(other, method.parse()?, &SkillOptions::default())
    }

    /// Skill score with an explicit method and options
    pub fn skill_with(
        &self,
        other: &TrajectorySet,
        method: SkillMethod,
        options: &SkillOptions,
    ) -> Result<Array1<f64>> {
        if self.dims() != other.dims() {
            return Err(Error::Shape(format!(
                "skill requires matching shapes, got {:?} and {:?}",
                self.dims(),
                other.dims()
            )));
        }
        if !(options.tolerance_threshold > 0.0) {
            return Err(Error::Configuration(format!(
                "tolerance_threshold must be positive, got {}",
                options.tolerance_threshold
            )));
        }

        let georeferenced = self.crs().is_georeferenced();
        let metric: Metric = if georeferenced { geodesic } else { euclidean };
        let ((x, y), (ox, oy)) = if georeferenced {
            (self.geographic("skill")?, other.geographic("skill")?)
        } else {
            ((self.x.clone(), self.y.clone()), (other.x.clone(), other.y.clone()))
        };

        let scores = (0..self.n_trajectories())
            .map(|t| {
                let (obs, model) = overlapping(&x, &y, &ox, &oy, t);
                match method {
                    SkillMethod::LiuWeissberg => {
                        liu_weissberg(&obs, &model, metric, options.tolerance_threshold)
                    }
                }
            })
            .collect();

        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::{CoordinateFieldNames, Layout};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn drifters() -> TrajectorySet {
        TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[20.0, 20.1, 20.2, 20.3], [25.0, 25.0, 25.0, f64::NAN]],
            array![[75.0, 75.1, 75.2, 75.3], [76.0, 76.1, 76.2, f64::NAN]],
            Layout::untimed(),
        )
        .unwrap()
    }

    #[test]
    fn test_identical_sets_score_one() {
        let set = drifters();
        let skill = set.skill(&set.clone(), "liu-weissberg").unwrap();
        assert_eq!(skill, array![1.0, 1.0]);
    }

    #[test]
    fn test_unknown_method() {
        let set = drifters();
        assert!(matches!(set.skill(&set, "molcard"), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_no_overlap_is_nan() {
        let set = drifters();
        let other = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[20.0, 20.1, 20.2, 20.3], [f64::NAN, f64::NAN, f64::NAN, f64::NAN]],
            array![[75.0, 75.1, 75.2, 75.3], [f64::NAN, f64::NAN, f64::NAN, f64::NAN]],
            Layout::untimed(),
        )
        .unwrap();

        let skill = set.skill(&other, "liu-weissberg").unwrap();
        assert_eq!(skill[0], 1.0);
        assert!(skill[1].is_nan());
    }

    #[test]
    fn test_diverging_paths_score_lower() {
        let obs = TrajectorySet::new(
            CoordinateFieldNames::cartesian(),
            array![[0.0, 1.0, 2.0, 3.0]],
            array![[0.0, 0.0, 0.0, 0.0]],
            Layout::untimed(),
        )
        .unwrap();
        let model = TrajectorySet::new(
            CoordinateFieldNames::cartesian(),
            array![[0.0, 1.0, 2.0, 3.0]],
            array![[0.0, 0.5, 1.0, 1.5]],
            Layout::untimed(),
        )
        .unwrap();

        // separations 0.5 + 1.0 + 1.5 over cumulative lengths 1 + 2 + 3
        let skill = obs.skill(&model, "liu-weissberg").unwrap();
        assert_abs_diff_eq!(skill[0], 0.5, epsilon = 1e-12);

        let strict = obs
            .skill_with(
                &model,
                SkillMethod::LiuWeissberg,
                &SkillOptions { tolerance_threshold: 0.25 },
            )
            .unwrap();
        assert_eq!(strict[0], 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let set = drifters();
        let other = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[20.0, 20.1]],
            array![[75.0, 75.1]],
            Layout::untimed(),
        )
        .unwrap();
        assert!(matches!(set.skill(&other, "liu-weissberg"), Err(Error::Shape(_))));
    }

    #[test]
    fn test_options_from_json() {
        let options: SkillOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.tolerance_threshold, 1.0);
        assert_eq!(SkillMethod::default().name(), "liu-weissberg");
    }
}
