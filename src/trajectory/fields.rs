//! Canonical names of the position fields

use crate::error::{Error, Result};

/// Accepted names for the x coordinate, in order of preference
pub const X_NAMES: [&str; 4] = ["lon", "longitude", "x", "X"];

/// Accepted names for the y coordinate, in order of preference
pub const Y_NAMES: [&str; 4] = ["lat", "latitude", "y", "Y"];

/// Names of the x/y position fields, resolved once per trajectory set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinateFieldNames {
    pub x: String,
    pub y: String,
}

impl CoordinateFieldNames {
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    /// `lon`/`lat`
    pub fn lonlat() -> Self {
        Self::new("lon", "lat")
    }

    /// `x`/`y`
    pub fn cartesian() -> Self {
        Self::new("x", "y")
    }

    /// Picks the position fields out of the field names a dataset offers
    pub fn detect<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fields: Vec<&str> = fields.into_iter().collect();
        let pick = |candidates: &[&str], axis: &str| {
            candidates
                .iter()
                .find(|c| fields.contains(c))
                .map(|c| c.to_string())
                .ok_or_else(|| {
                    Error::Configuration(format!("Could not determine {} variable", axis))
                })
        };

        Ok(Self {
            x: pick(&X_NAMES, "x / lon")?,
            y: pick(&Y_NAMES, "y / lat")?,
        })
    }

    /// True when the x field is named as a longitude
    pub fn is_lonlat(&self) -> bool {
        self.x == "lon" || self.x == "longitude"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_prefers_lonlat() {
        let names = CoordinateFieldNames::detect(["time", "x", "lon", "lat", "y"]).unwrap();
        assert_eq!(names, CoordinateFieldNames::lonlat());
        assert!(names.is_lonlat());
    }

    #[test]
    fn test_detect_long_names() {
        let names = CoordinateFieldNames::detect(["longitude", "latitude"]).unwrap();
        assert_eq!(names.x, "longitude");
        assert!(names.is_lonlat());
    }

    #[test]
    fn test_detect_upper_xy() {
        let names = CoordinateFieldNames::detect(["X", "Y", "status"]).unwrap();
        assert_eq!(names, CoordinateFieldNames::new("X", "Y"));
        assert!(!names.is_lonlat());
    }

    #[test]
    fn test_detect_missing() {
        let result = CoordinateFieldNames::detect(["lon", "depth"]);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }
}
