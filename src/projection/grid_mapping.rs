//! CF grid-mapping descriptors and their translation to PROJ definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Attribute name holding the CF grid-mapping name
pub const GRID_MAPPING_NAME: &str = "grid_mapping_name";

/// Value of a grid-mapping attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Numbers(Vec<f64>),
    Text(String),
}

impl AttrValue {
    /// First numeric value, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Numbers(v) => v.first().copied(),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// All numeric values
    pub fn as_f64s(&self) -> Vec<f64> {
        match self {
            AttrValue::Numbers(v) => v.clone(),
            other => other.as_f64().into_iter().collect(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::Numbers(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        AttrValue::Text(v.to_string())
    }
}

/// A CF grid-mapping variable: a name plus key/value attributes
///
/// The attributes follow the CF conventions (`grid_mapping_name`,
/// `latitude_of_projection_origin`, `standard_parallel`, ...). A `proj4`,
/// `proj4text` or `crs_wkt` attribute takes precedence over the CF parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMapping {
    pub name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
}

impl GridMapping {
    /// Creates a grid mapping named after its `grid_mapping_name`
    pub fn new(grid_mapping_name: &str) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert(GRID_MAPPING_NAME.to_string(), AttrValue::from(grid_mapping_name));

        Self {
            name: grid_mapping_name.to_string(),
            attributes,
        }
    }

    /// The WGS84 longitude/latitude grid mapping
    pub fn latitude_longitude() -> Self {
        Self::new("latitude_longitude")
            .with("semi_major_axis", 6378137.0)
            .with("inverse_flattening", 298.257223563)
    }

    /// A grid mapping carrying a verbatim PROJ definition
    pub fn from_proj4(definition: &str) -> Self {
        let mut gm = Self {
            name: "crs".to_string(),
            attributes: BTreeMap::new(),
        };
        gm.attributes.insert("proj4".to_string(), AttrValue::from(definition));
        gm
    }

    /// Adds or replaces an attribute
    pub fn with(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// Parses a grid mapping from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("Invalid grid mapping: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            Error::Configuration(format!("Failed to serialize grid mapping: {}", e))
        })
    }

    /// The CF `grid_mapping_name`, if declared
    pub fn grid_mapping_name(&self) -> Option<&str> {
        self.get(GRID_MAPPING_NAME).and_then(AttrValue::as_str)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(AttrValue::as_f64)
    }

    fn required(&self, key: &str) -> Result<f64> {
        self.number(key).ok_or_else(|| {
            Error::Configuration(format!(
                "grid mapping '{}' is missing numeric attribute '{}'",
                self.name, key
            ))
        })
    }

    fn verbatim_definition(&self) -> Option<&str> {
        ["proj4", "proj4text", "proj4_params", "crs_wkt", "spatial_ref"]
            .iter()
            .find_map(|key| self.get(key).and_then(AttrValue::as_str))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Translates the grid mapping into a PROJ definition string
    pub fn to_proj_string(&self) -> Result<String> {
        if let Some(definition) = self.verbatim_definition() {
            return Ok(definition.to_string());
        }

        let name = self.grid_mapping_name().ok_or_else(|| {
            Error::Configuration(format!(
                "grid mapping '{}' has neither a grid_mapping_name nor a PROJ definition",
                self.name
            ))
        })?;

        let builder = ProjectionBuilder::new();
        let builder = match name {
            "latitude_longitude" => builder.projection_type("longlat"),
            "polar_stereographic" => {
                let builder = builder
                    .projection_type("stere")
                    .latitude_of_origin(self.required("latitude_of_projection_origin")?)
                    .central_meridian(
                        self.number("straight_vertical_longitude_from_pole")
                            .or_else(|| self.number("longitude_of_projection_origin"))
                            .unwrap_or(0.0),
                    );
                let lat_ts = self.number("standard_parallel");
                match (lat_ts, self.number("scale_factor_at_projection_origin")) {
                    (Some(lat_ts), _) => builder.parameter("lat_ts", &lat_ts.to_string()),
                    (None, Some(k)) => builder.scale_factor(k),
                    (None, None) => builder,
                }
            }
            "stereographic" => builder
                .projection_type("stere")
                .latitude_of_origin(self.required("latitude_of_projection_origin")?)
                .central_meridian(self.required("longitude_of_projection_origin")?)
                .scale_factor(self.number("scale_factor_at_projection_origin").unwrap_or(1.0)),
            "transverse_mercator" => builder
                .projection_type("tmerc")
                .latitude_of_origin(self.number("latitude_of_projection_origin").unwrap_or(0.0))
                .central_meridian(self.required("longitude_of_central_meridian")?)
                .scale_factor(self.number("scale_factor_at_central_meridian").unwrap_or(1.0)),
            "mercator" => {
                let builder = builder
                    .projection_type("merc")
                    .central_meridian(self.number("longitude_of_projection_origin").unwrap_or(0.0));
                let lat_ts = self.number("standard_parallel");
                match (lat_ts, self.number("scale_factor_at_projection_origin")) {
                    (Some(lat_ts), _) => builder.parameter("lat_ts", &lat_ts.to_string()),
                    (None, Some(k)) => builder.scale_factor(k),
                    (None, None) => builder,
                }
            }
            "lambert_conformal_conic" | "albers_conical_equal_area" => {
                let proj_type = if name == "lambert_conformal_conic" { "lcc" } else { "aea" };
                let parallels = self
                    .get("standard_parallel")
                    .map(AttrValue::as_f64s)
                    .unwrap_or_default();
                let (lat_1, lat_2) = match parallels.as_slice() {
                    [one] => (*one, *one),
                    [one, two, ..] => (*one, *two),
                    [] => {
                        return Err(Error::Configuration(format!(
                            "grid mapping '{}' requires standard_parallel",
                            self.name
                        )))
                    }
                };
                builder
                    .projection_type(proj_type)
                    .latitude_of_origin(self.required("latitude_of_projection_origin")?)
                    .central_meridian(self.required("longitude_of_central_meridian")?)
                    .parameter("lat_1", &lat_1.to_string())
                    .parameter("lat_2", &lat_2.to_string())
            }
            "lambert_azimuthal_equal_area" | "orthographic" => builder
                .projection_type(if name == "orthographic" { "ortho" } else { "laea" })
                .latitude_of_origin(self.required("latitude_of_projection_origin")?)
                .central_meridian(self.required("longitude_of_projection_origin")?),
            other => {
                return Err(Error::Configuration(format!(
                    "unsupported grid_mapping_name '{}'",
                    other
                )))
            }
        };

        let builder = if name == "latitude_longitude" {
            builder
        } else {
            builder
                .false_easting(self.number("false_easting").unwrap_or(0.0))
                .false_northing(self.number("false_northing").unwrap_or(0.0))
        };

        self.with_figure_of_earth(builder).units("m").build()
    }

    fn with_figure_of_earth(&self, builder: ProjectionBuilder) -> ProjectionBuilder {
        if let Some(r) = self.number("earth_radius") {
            return builder.parameter("R", &r.to_string());
        }

        match (
            self.number("semi_major_axis"),
            self.number("semi_minor_axis"),
            self.number("inverse_flattening"),
        ) {
            (Some(a), Some(b), _) => builder
                .parameter("a", &a.to_string())
                .parameter("b", &b.to_string()),
            (Some(a), None, Some(rf)) => builder
                .parameter("a", &a.to_string())
                .parameter("rf", &rf.to_string()),
            (Some(a), None, None) => builder.parameter("R", &a.to_string()),
            _ => builder.ellipsoid("WGS84"),
        }
    }
}

/// Builder for PROJ definition strings
pub struct ProjectionBuilder {
    proj_type: Option<String>,
    ellipsoid: Option<String>,
    parameters: Vec<(String, String)>,
}

impl ProjectionBuilder {
    /// Creates a new projection builder
    pub fn new() -> Self {
        Self {
            proj_type: None,
            ellipsoid: None,
            parameters: Vec::new(),
        }
    }

    /// Sets the projection type (e.g., "stere", "tmerc", "lcc")
    pub fn projection_type(mut self, proj_type: &str) -> Self {
        self.proj_type = Some(proj_type.to_string());
        self
    }

    /// Sets the ellipsoid (e.g., "WGS84", "GRS80")
    pub fn ellipsoid(mut self, ellipsoid: &str) -> Self {
        self.ellipsoid = Some(ellipsoid.to_string());
        self
    }

    /// Adds a custom parameter
    pub fn parameter(mut self, key: &str, value: &str) -> Self {
        self.parameters.push((key.to_string(), value.to_string()));
        self
    }

    pub fn latitude_of_origin(self, lat: f64) -> Self {
        self.parameter("lat_0", &lat.to_string())
    }

    pub fn central_meridian(self, lon: f64) -> Self {
        self.parameter("lon_0", &lon.to_string())
    }

    pub fn scale_factor(self, k: f64) -> Self {
        self.parameter("k_0", &k.to_string())
    }

    pub fn false_easting(self, x: f64) -> Self {
        self.parameter("x_0", &x.to_string())
    }

    pub fn false_northing(self, y: f64) -> Self {
        self.parameter("y_0", &y.to_string())
    }

    /// Sets the units (e.g., "m", "km"); ignored for longlat
    pub fn units(self, units: &str) -> Self {
        if self.proj_type.as_deref() == Some("longlat") {
            return self;
        }
        self.parameter("units", units)
    }

    /// Builds the PROJ definition string
    pub fn build(self) -> Result<String> {
        let proj_type = self
            .proj_type
            .ok_or_else(|| Error::Configuration("Projection type is required".to_string()))?;

        let mut parts = vec![format!("+proj={}", proj_type)];

        for (key, value) in self.parameters {
            parts.push(format!("+{}={}", key, value));
        }

        if let Some(ellipsoid) = self.ellipsoid {
            parts.push(format!("+ellps={}", ellipsoid));
        }

        parts.push("+no_defs".to_string());
        Ok(parts.join(" "))
    }
}

impl Default for ProjectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_builder_no_type() {
        let result = ProjectionBuilder::new().build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_projection_builder_transverse_mercator() {
        let definition = ProjectionBuilder::new()
            .projection_type("tmerc")
            .latitude_of_origin(0.0)
            .central_meridian(15.0)
            .scale_factor(0.9996)
            .false_easting(500000.0)
            .ellipsoid("WGS84")
            .build()
            .unwrap();

        assert!(definition.starts_with("+proj=tmerc"));
        assert!(definition.contains("+lon_0=15"));
        assert!(definition.contains("+x_0=500000"));
        assert!(definition.contains("+ellps=WGS84"));
    }

    #[test]
    fn test_polar_stereographic() {
        let gm = GridMapping::new("polar_stereographic")
            .with("latitude_of_projection_origin", 90.0)
            .with("straight_vertical_longitude_from_pole", -45.0)
            .with("standard_parallel", 70.0)
            .with("false_easting", 0.0)
            .with("false_northing", 0.0);

        let definition = gm.to_proj_string().unwrap();
        assert!(definition.contains("+proj=stere"));
        assert!(definition.contains("+lat_0=90"));
        assert!(definition.contains("+lon_0=-45"));
        assert!(definition.contains("+lat_ts=70"));
        assert!(definition.contains("+ellps=WGS84"));
    }

    #[test]
    fn test_lambert_conformal_two_parallels() {
        let gm = GridMapping::new("lambert_conformal_conic")
            .with("standard_parallel", vec![63.3, 63.3])
            .with("longitude_of_central_meridian", 15.0)
            .with("latitude_of_projection_origin", 63.3)
            .with("earth_radius", 6371000.0);

        let definition = gm.to_proj_string().unwrap();
        assert!(definition.contains("+proj=lcc"));
        assert!(definition.contains("+lat_1=63.3"));
        assert!(definition.contains("+lat_2=63.3"));
        assert!(definition.contains("+R=6371000"));
    }

    #[test]
    fn test_verbatim_definition_wins() {
        let gm = GridMapping::new("mercator").with("proj4", "+proj=merc +datum=WGS84");
        assert_eq!(gm.to_proj_string().unwrap(), "+proj=merc +datum=WGS84");
    }

    #[test]
    fn test_missing_parameter() {
        let gm = GridMapping::new("stereographic").with("latitude_of_projection_origin", 60.0);
        assert!(matches!(gm.to_proj_string(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_unsupported_name() {
        let gm = GridMapping::new("vertical_perspective");
        assert!(matches!(gm.to_proj_string(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_grid_mapping_from_json() {
        let gm = GridMapping::from_json(
            r#"{
                "name": "projection_stere",
                "attributes": {
                    "grid_mapping_name": "polar_stereographic",
                    "latitude_of_projection_origin": 90.0,
                    "standard_parallel": [60.0]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(gm.grid_mapping_name(), Some("polar_stereographic"));
        assert_eq!(gm.get("standard_parallel").unwrap().as_f64(), Some(60.0));

        let again = GridMapping::from_json(&gm.to_json().unwrap()).unwrap();
        assert_eq!(again, gm);
        assert!(matches!(GridMapping::from_json("{\"name\": 3}"), Err(Error::Configuration(_))));
    }
}
