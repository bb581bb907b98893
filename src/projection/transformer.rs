use ndarray::{Array2, Zip};
use proj::Proj;

use crate::error::{Error, Result};
use crate::projection::coordinate::Coordinate;
use crate::projection::crs::CoordinateSystem;

/// Transforms coordinates between two coordinate systems
///
/// Positions are (x, y) / (lon, lat) in degrees regardless of the PROJ axis
/// order of the underlying CRS. Missing input (NaN) and points PROJ cannot
/// transform come out as NaN rather than as an error.
pub struct Transformer {
    forward: Option<Proj>,
    inverse: Option<Proj>,
}

impl Transformer {
    /// Creates a new transformer from source to target coordinate system
    pub fn new(from: &CoordinateSystem, to: &CoordinateSystem) -> Result<Self> {
        if from == to {
            return Ok(Self {
                forward: None,
                inverse: None,
            });
        }

        match (from.crs_definition(), to.crs_definition()) {
            (Some(src), Some(dst)) => Ok(Self {
                forward: Some(known_crs(&src, &dst)?),
                inverse: Some(known_crs(&dst, &src)?),
            }),
            _ => Err(Error::UndefinedOperation(
                "cannot transform between Cartesian and georeferenced coordinates".to_string(),
            )),
        }
    }

    /// Transforms paired x/y arrays from source to target, preserving their shape
    pub fn transform_arrays(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        apply_arrays(self.forward.as_ref(), x, y)
    }

    /// Inverse of [`Transformer::transform_arrays`]
    pub fn transform_arrays_inverse(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        apply_arrays(self.inverse.as_ref(), x, y)
    }
}

fn apply_arrays(
    proj: Option<&Proj>,
    x: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    if x.dim() != y.dim() {
        return Err(Error::Shape(format!(
            "x and y arrays differ in shape: {:?} vs {:?}",
            x.dim(),
            y.dim()
        )));
    }

    let mut xo = Array2::from_elem(x.dim(), f64::NAN);
    let mut yo = Array2::from_elem(y.dim(), f64::NAN);

    Zip::from(&mut xo)
        .and(&mut yo)
        .and(x)
        .and(y)
        .for_each(|xo, yo, &xi, &yi| {
            let c = convert(proj, Coordinate::new(xi, yi));
            *xo = c.x;
            *yo = c.y;
        });

    Ok((xo, yo))
}

fn known_crs(from: &str, to: &str) -> Result<Proj> {
    Proj::new_known_crs(from, to, None)
        .map_err(|e| {
            Error::Projection(format!("Failed to create transform {} -> {}: {}", from, to, e))
        })
}

fn convert(proj: Option<&Proj>, coord: Coordinate) -> Coordinate {
    if !coord.is_finite() {
        return Coordinate::nan();
    }

    match proj {
        None => coord,
        Some(proj) => match proj.convert((coord.x, coord.y)) {
            Ok((x, y)) if x.is_finite() && y.is_finite() => Coordinate::new(x, y),
            _ => Coordinate::nan(),
        },
    }
}
