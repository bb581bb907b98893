//! Convex hull of trajectory swarms and its area

use geo::{Area, ConvexHull as _, Intersects, MultiPoint, Point, Polygon};
use log::debug;
use proj::Proj;

use crate::error::{Error, Result};
use crate::projection::{Coordinate, CoordinateSystem};
use crate::trajectory::TrajectorySet;

/// Fewest valid positions a hull is computed from
const MIN_HULL_POINTS: usize = 4;

/// Convex polygon around a set of points
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    polygon: Polygon<f64>,
}

impl ConvexHull {
    /// Hull of the finite points; `None` when they span no area
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let points: MultiPoint<f64> = points
            .iter()
            .filter(|p| p.is_finite())
            .map(|p| Point::new(p.x, p.y))
            .collect();

        let polygon = points.convex_hull();

        // identical or collinear input collapses to a point or a segment
        if polygon.exterior().0.len() < 4 || polygon.unsigned_area() == 0.0 {
            return None;
        }

        Some(Self { polygon })
    }

    /// Hull vertices, counter-clockwise, without repeating the first one
    pub fn vertices(&self) -> Vec<Coordinate> {
        let ring = &self.polygon.exterior().0;
        ring[..ring.len() - 1]
            .iter()
            .map(|c| Coordinate::new(c.x, c.y))
            .collect()
    }

    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Planar area in squared native units
    pub fn area(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// True when (x, y) lies inside or on the boundary of the hull
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.is_finite() && y.is_finite() && self.polygon.intersects(&Point::new(x, y))
    }
}

impl TrajectorySet {
    /// Active, finite positions in geographic (or native Cartesian) coordinates
    fn hull_points(&self) -> Result<Vec<Coordinate>> {
        let (lon, lat) = self.tlonlat()?;
        let active = self.active_positions();

        Ok(lon
            .iter()
            .zip(lat.iter())
            .zip(active.iter())
            .filter(|(_, active)| **active)
            .map(|((&x, &y), _)| Coordinate::new(x, y))
            .filter(Coordinate::is_finite)
            .collect())
    }

    /// Convex hull of all active positions across trajectories
    ///
    /// `None` for fewer than four active positions or when they are all
    /// identical or collinear.
    pub fn convex_hull(&self) -> Result<Option<ConvexHull>> {
        let points = self.hull_points()?;
        if points.len() < MIN_HULL_POINTS {
            return Ok(None);
        }
        Ok(ConvexHull::from_points(&points))
    }

    /// Whether the convex hull contains the given lon/lat (or x/y) position
    pub fn convex_hull_contains_point(&self, lon: f64, lat: f64) -> Result<bool> {
        Ok(self
            .convex_hull()?
            .map(|hull| hull.contains(lon, lat))
            .unwrap_or(false))
    }

    /// Area [m²] of the convex hull spanned by all active positions
    ///
    /// Georeferenced positions are projected to an equal-area projection
    /// centered on the data first. Cartesian positions use their native units.
    pub fn hull_area(&self) -> Result<f64> {
        let Some(hull) = self.convex_hull()? else {
            return Ok(0.0);
        };

        if let CoordinateSystem::Cartesian = self.crs() {
            return Ok(hull.area());
        }

        let points = equal_area(&self.hull_points()?)?;
        Ok(ConvexHull::from_points(&points).map(|h| h.area()).unwrap_or(0.0))
    }
}

/// Projects lon/lat points to an equal-area projection centered on their mean
fn equal_area(points: &[Coordinate]) -> Result<Vec<Coordinate>> {
    let n = points.len() as f64;
    let lon_0 = points.iter().map(|p| p.x).sum::<f64>() / n;
    let lat_0 = points.iter().map(|p| p.y).sum::<f64>() / n;
    let lat_1 = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let lat_2 = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    // Albers is undefined for parallels symmetric about the equator
    let definition = if (lat_1 + lat_2).abs() > 1e-9 {
        format!(
            "+proj=aea +lat_0={} +lat_1={} +lat_2={} +lon_0={} \
             +x_0=0 +y_0=0 +ellps=WGS84 +units=m +no_defs",
            lat_0, lat_1, lat_2, lon_0
        )
    } else {
        format!(
            "+proj=laea +lat_0={} +lon_0={} +x_0=0 +y_0=0 +ellps=WGS84 +units=m +no_defs",
            lat_0, lon_0
        )
    };
    debug!("Equal-area projection for hull area: {}", definition);

    let proj = Proj::new(&definition)
        .map_err(|e| Error::Projection(format!("Failed to create equal-area projection: {}", e)))?;

    Ok(points
        .iter()
        .map(|p| match proj.project((p.x.to_radians(), p.y.to_radians()), false) {
            Ok((x, y)) => Coordinate::new(x, y),
            Err(_) => Coordinate::nan(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::dataset::tests::projected;
    use crate::trajectory::{CoordinateFieldNames, Layout};
    use approx::assert_relative_eq;
    use ndarray::{array, Array2};

    fn square(names: CoordinateFieldNames) -> TrajectorySet {
        TrajectorySet::new(
            names,
            array![[0.0, 1.0, 1.0], [0.0, 0.5, f64::NAN]],
            array![[0.0, 0.0, 1.0], [1.0, 0.5, f64::NAN]],
            Layout::untimed(),
        )
        .unwrap()
    }

    #[test]
    fn test_hull_from_points() {
        let pts = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(2.0, 2.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(1.0, 1.0),
        ];
        let hull = ConvexHull::from_points(&pts).unwrap();

        assert_eq!(hull.vertices().len(), 4);
        assert_eq!(hull.area(), 4.0);
        assert!(hull.contains(1.0, 1.0));
        assert!(hull.contains(2.0, 1.0));
        assert!(!hull.contains(2.1, 1.0));
    }

    #[test]
    fn test_collinear_is_none() {
        let pts: Vec<Coordinate> = (0..5)
            .map(|i| Coordinate::new(i as f64, 2.0 * i as f64))
            .collect();
        assert!(ConvexHull::from_points(&pts).is_none());
    }

    #[test]
    fn test_convex_hull_of_set() {
        let set = square(CoordinateFieldNames::lonlat());
        let hull = set.convex_hull().unwrap().unwrap();

        assert_eq!(hull.vertices().len(), 4);
        assert!(set.convex_hull_contains_point(0.5, 0.5).unwrap());
        assert!(!set.convex_hull_contains_point(1.5, 0.5).unwrap());
    }

    #[test]
    fn test_too_few_points() {
        let set = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[0.0, 1.0, 1.0]],
            array![[0.0, 0.0, 1.0]],
            Layout::untimed(),
        )
        .unwrap();

        assert!(set.convex_hull().unwrap().is_none());
        assert_eq!(set.hull_area().unwrap(), 0.0);
        assert!(!set.convex_hull_contains_point(0.5, 0.2).unwrap());
    }

    #[test]
    fn test_identical_points_area_is_zero() {
        let set = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            Array2::from_elem((2, 3), 10.0),
            Array2::from_elem((2, 3), 60.0),
            Layout::untimed(),
        )
        .unwrap();

        assert!(set.convex_hull().unwrap().is_none());
        assert_eq!(set.hull_area().unwrap(), 0.0);
    }

    #[test]
    fn test_status_excludes_positions() {
        let set = square(CoordinateFieldNames::lonlat())
            .with_status(array![[Some(0), Some(0), Some(0)], [Some(1), Some(0), None]])
            .unwrap();

        // (0, 1) is inactive, (0.5, 0.5) falls on the diagonal
        let hull = set.convex_hull().unwrap().unwrap();
        assert_eq!(hull.vertices().len(), 3);
        assert!(!hull.contains(0.1, 0.9));
    }

    #[test]
    fn test_points_on_a_parallel_have_no_area() {
        let set = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[0.0, 1.0, 2.0, 3.0]],
            array![[60.0, 60.0, 60.0, 60.0]],
            Layout::untimed(),
        )
        .unwrap();

        assert!(set.convex_hull().unwrap().is_none());
        assert!(!set.convex_hull_contains_point(1.5, 60.0).unwrap());
        assert_eq!(set.hull_area().unwrap(), 0.0);
    }

    #[test]
    fn test_projected_hull_matches_lonlat() {
        let lonlat = TrajectorySet::new(
            CoordinateFieldNames::lonlat(),
            array![[10.0, 11.0, 11.0], [10.0, 10.5, f64::NAN]],
            array![[70.0, 70.0, 71.0], [71.0, 70.5, f64::NAN]],
            Layout::untimed(),
        )
        .unwrap();
        let stere = projected(&lonlat);

        assert!(stere.convex_hull_contains_point(10.5, 70.5).unwrap());
        assert!(!stere.convex_hull_contains_point(11.5, 70.5).unwrap());
        assert_eq!(
            stere.convex_hull().unwrap().unwrap().vertices().len(),
            lonlat.convex_hull().unwrap().unwrap().vertices().len()
        );
        assert_relative_eq!(
            stere.hull_area().unwrap(),
            lonlat.hull_area().unwrap(),
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_cartesian_area_is_planar() {
        let set = square(CoordinateFieldNames::cartesian());
        assert_eq!(set.hull_area().unwrap(), 1.0);
    }

    #[test]
    fn test_geographic_area() {
        let set = square(CoordinateFieldNames::lonlat());
        let area = set.hull_area().unwrap();

        // one degree square on the equator, roughly 111.3 km x 110.6 km
        assert_relative_eq!(area, 111_319.5 * 110_574.0, max_relative = 0.01);
    }
}
