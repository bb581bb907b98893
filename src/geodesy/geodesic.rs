//! Inverse geodesic problem on the WGS84 ellipsoid
//!
//! Backed by Karney's algorithm through `geo`, which converges for every pair
//! of points, nearly antipodal ones included.

use geo::{Bearing, Distance, Geodesic, Point};

/// Solution of the inverse problem between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inverse {
    /// Distance along the geodesic [m]
    pub distance: f64,
    /// Forward azimuth at the first point [deg, clockwise from north]
    pub az_fwd: f64,
    /// Back azimuth at the second point, pointing back to the first [deg]
    pub az_bwd: f64,
}

impl Inverse {
    pub fn nan() -> Self {
        Self {
            distance: f64::NAN,
            az_fwd: f64::NAN,
            az_bwd: f64::NAN,
        }
    }

    /// A zero-length step
    pub fn zero() -> Self {
        Self {
            distance: 0.0,
            az_fwd: 0.0,
            az_bwd: 0.0,
        }
    }
}

/// Wraps an angle in degrees to (-180, 180]
pub fn normalize_azimuth(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r > 180.0 {
        r - 360.0
    } else {
        r
    }
}

/// Distance and azimuths from (lon1, lat1) to (lon2, lat2), all in degrees
///
/// Missing input gives NaN. Coincident points give a zero distance with
/// forward azimuth 0 and back azimuth 180.
pub fn inverse(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> Inverse {
    if !(lon1.is_finite() && lat1.is_finite() && lon2.is_finite() && lat2.is_finite()) {
        return Inverse::nan();
    }
    if lon1 == lon2 && lat1 == lat2 {
        return Inverse {
            distance: 0.0,
            az_fwd: 0.0,
            az_bwd: 180.0,
        };
    }

    let origin = Point::new(lon1, lat1);
    let destination = Point::new(lon2, lat2);

    Inverse {
        distance: Geodesic::distance(origin, destination),
        az_fwd: normalize_azimuth(Geodesic::bearing(origin, destination)),
        az_bwd: normalize_azimuth(Geodesic::bearing(destination, origin)),
    }
}
