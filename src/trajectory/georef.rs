//! Georeferencing of trajectory sets: geographic accessors and CRS replacement

use std::fmt;

use log::debug;
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::projection::{CoordinateSystem, Transformer};
use crate::trajectory::dataset::TrajectorySet;
use crate::trajectory::fields::CoordinateFieldNames;

/// Something `set_crs` changed beyond the grid mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrsWarning {
    /// Geographic position fields were renamed to x/y
    RenamedCoordinates { from: CoordinateFieldNames },
    /// A carried variable was replaced by a renamed position field
    OverwroteField(String),
}

impl fmt::Display for CrsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrsWarning::RenamedCoordinates { from } => {
                write!(f, "Renaming geographic ({}, {}) coordinates to x, y", from.x, from.y)
            }
            CrsWarning::OverwroteField(name) => {
                write!(f, "Overwriting existing variable '{}'", name)
            }
        }
    }
}

impl TrajectorySet {
    /// Transforms coordinates in this set's CRS to `to`
    pub fn transform(
        &self,
        to: &CoordinateSystem,
        x: &Array2<f64>,
        y: &Array2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        Transformer::new(&self.crs, to)?.transform_arrays(x, y)
    }

    /// Transforms coordinates in `from` to this set's CRS
    pub fn itransform(
        &self,
        from: &CoordinateSystem,
        x: &Array2<f64>,
        y: &Array2<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        Transformer::new(&self.crs, from)?.transform_arrays_inverse(x, y)
    }

    /// Longitude/latitude of every position
    ///
    /// Cartesian sets return their native x/y unchanged; interpreting those as
    /// degrees is the caller's responsibility.
    pub fn tlonlat(&self) -> Result<(Array2<f64>, Array2<f64>)> {
        match &self.crs {
            CoordinateSystem::Geographic | CoordinateSystem::Cartesian => {
                Ok((self.x.clone(), self.y.clone()))
            }
            CoordinateSystem::Projected(_) => {
                self.transform(&CoordinateSystem::Geographic, &self.x, &self.y)
            }
        }
    }

    /// Trajectory longitudes, see [`TrajectorySet::tlonlat`]
    pub fn tlon(&self) -> Result<Array2<f64>> {
        self.tlonlat().map(|(lon, _)| lon)
    }

    /// Trajectory latitudes, see [`TrajectorySet::tlonlat`]
    pub fn tlat(&self) -> Result<Array2<f64>> {
        self.tlonlat().map(|(_, lat)| lat)
    }

    /// Longitude/latitude for operations that are only defined on the ellipsoid
    pub(crate) fn geographic(&self, operation: &str) -> Result<(Array2<f64>, Array2<f64>)> {
        if !self.crs.is_georeferenced() {
            return Err(Error::UndefinedOperation(format!(
                "{} requires georeferenced positions, dataset is Cartesian",
                operation
            )));
        }
        self.tlonlat()
    }

    /// Returns a new set whose grid mapping describes `system`
    ///
    /// Coordinate values are not transformed. Setting `Cartesian` strips the
    /// grid mapping and renames lon/lat fields to x/y; the renames are
    /// reported in the returned warnings.
    pub fn set_crs(&self, system: &CoordinateSystem) -> Result<(TrajectorySet, Vec<CrsWarning>)> {
        let mut set = self.clone();
        let mut warnings = Vec::new();

        match system.to_grid_mapping() {
            Some(gm) => {
                set.grid_mapping = Some(gm);
            }
            None => {
                debug!("Removing CRS information, trajectories are now Cartesian");
                set.grid_mapping = None;

                if set.names.is_lonlat() {
                    warnings.push(CrsWarning::RenamedCoordinates { from: set.names.clone() });
                    for name in ["x", "y"] {
                        if set.variables.remove(name).is_some() {
                            warnings.push(CrsWarning::OverwroteField(name.to_string()));
                        }
                    }
                    set.names = CoordinateFieldNames::cartesian();
                }
            }
        }

        set.crs = system.clone();
        Ok((set, warnings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GridMapping;
    use crate::trajectory::layout::Layout;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn lonlat_set() -> TrajectorySet {
        TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[15.0, 15.5]],
            array![[60.0, 60.5]],
            Layout::untimed(),
        )
        .unwrap()
    }

    fn stere() -> GridMapping {
        GridMapping::new("polar_stereographic")
            .with("latitude_of_projection_origin", 90.0)
            .with("straight_vertical_longitude_from_pole", 0.0)
            .with("standard_parallel", 70.0)
    }

    #[test]
    fn test_tlon_geographic_is_native() {
        let set = lonlat_set();
        assert_eq!(set.tlon().unwrap(), set.tx().clone());
        assert_eq!(set.tlat().unwrap(), set.ty().clone());
    }

    #[test]
    fn test_tlon_projected_roundtrip() {
        let geo = lonlat_set();
        let stere = CoordinateSystem::from_grid_mapping(&stere()).unwrap();
        let (x, y) = geo.transform(&stere, geo.tx(), geo.ty()).unwrap();

        let names = CoordinateFieldNames::new("X", "Y");
        let projected = TrajectorySet::new(names, x, y, Layout::untimed())
            .unwrap()
            .with_grid_mapping(self::stere())
            .unwrap();

        let (lon, lat) = projected.tlonlat().unwrap();
        assert_abs_diff_eq!(lon[[0, 1]], 15.5, epsilon = 1e-8);
        assert_abs_diff_eq!(lat[[0, 1]], 60.5, epsilon = 1e-8);
    }

    #[test]
    fn test_itransform_inverts_transform() {
        let geo = lonlat_set();
        let stere = CoordinateSystem::from_grid_mapping(&stere()).unwrap();
        let (x, y) = geo.transform(&stere, geo.tx(), geo.ty()).unwrap();

        let (lon, lat) = geo.itransform(&stere, &x, &y).unwrap();
        assert_abs_diff_eq!(lon[[0, 0]], 15.0, epsilon = 1e-8);
        assert_abs_diff_eq!(lat[[0, 1]], 60.5, epsilon = 1e-8);
    }

    #[test]
    fn test_geographic_on_cartesian_fails() {
        let set = TrajectorySet::new(
            CoordinateFieldNames::cartesian(),
            array![[0.0, 1.0]],
            array![[0.0, 1.0]],
            Layout::untimed(),
        )
        .unwrap();

        assert!(matches!(set.geographic("distance"), Err(Error::UndefinedOperation(_))));
        assert_eq!(set.tlon().unwrap(), set.tx().clone());
    }

    #[test]
    fn test_set_crs_cartesian_renames() {
        let set = lonlat_set().with_variable("x", array![[1.0, 2.0]]).unwrap();
        let (cartesian, warnings) = set.set_crs(&CoordinateSystem::Cartesian).unwrap();

        assert_eq!(cartesian.names(), &CoordinateFieldNames::cartesian());
        assert_eq!(cartesian.crs(), &CoordinateSystem::Cartesian);
        assert!(cartesian.grid_mapping().is_none());
        assert!(cartesian.variable("x").is_none());
        assert_eq!(cartesian.tx(), set.tx());
        assert_eq!(
            warnings,
            vec![
                CrsWarning::RenamedCoordinates { from: CoordinateFieldNames::lonlat() },
                CrsWarning::OverwroteField("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_set_crs_projected_keeps_values() {
        let set = lonlat_set();
        let stere = CoordinateSystem::from_grid_mapping(&stere()).unwrap();
        let (projected, warnings) = set.set_crs(&stere).unwrap();

        assert!(warnings.is_empty());
        assert_eq!(projected.grid_mapping(), Some(&self::stere()));
        assert_eq!(projected.tx(), set.tx());
        assert_eq!(projected.crs(), &stere);
        // input untouched
        assert!(set.grid_mapping().is_none());
    }
}
