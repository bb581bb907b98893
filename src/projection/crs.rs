//! Coordinate reference systems of trajectory sets

use log::debug;
use proj::Proj;

use crate::error::{Error, Result};
use crate::projection::grid_mapping::GridMapping;
use crate::trajectory::fields::CoordinateFieldNames;

/// PROJ definition of WGS84 longitude/latitude in degrees
pub const WGS84_DEFINITION: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// A projected CRS: the PROJ definition plus the grid mapping it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    definition: String,
    grid_mapping: GridMapping,
}

impl Projection {
    /// Builds a projection from a grid mapping, validating it against PROJ
    pub fn from_grid_mapping(grid_mapping: &GridMapping) -> Result<Self> {
        let definition = grid_mapping.to_proj_string()?;

        Proj::new(&definition).map_err(|e| {
            Error::Configuration(format!(
                "grid mapping '{}' is not a valid projection ({}): {}",
                grid_mapping.name, definition, e
            ))
        })?;

        Ok(Self {
            definition,
            grid_mapping: grid_mapping.clone(),
        })
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn grid_mapping(&self) -> &GridMapping {
        &self.grid_mapping
    }
}

/// How trajectory positions map to the Earth
#[derive(Debug, Clone, PartialEq)]
pub enum CoordinateSystem {
    /// WGS84 longitude/latitude in degrees
    Geographic,
    /// Projected coordinates described by a grid mapping
    Projected(Projection),
    /// Plain x/y without georeferencing
    Cartesian,
}

impl CoordinateSystem {
    /// Resolves the coordinate system of a dataset from its grid mapping and
    /// the names of its coordinate fields
    pub fn resolve(
        grid_mapping: Option<&GridMapping>,
        names: &CoordinateFieldNames,
    ) -> Result<Self> {
        match grid_mapping {
            Some(gm) => {
                debug!("Constructing CRS from grid_mapping: {}", gm.name);
                Self::from_grid_mapping(gm)
            }
            None if names.is_lonlat() => {
                debug!("No grid-mapping specified, coordinates '{}' are lon/lat", names.x);
                Ok(CoordinateSystem::Geographic)
            }
            None => {
                debug!("Assuming trajectories are in Cartesian coordinates");
                Ok(CoordinateSystem::Cartesian)
            }
        }
    }

    /// Builds the coordinate system a grid mapping describes
    pub fn from_grid_mapping(grid_mapping: &GridMapping) -> Result<Self> {
        if grid_mapping.grid_mapping_name() == Some("latitude_longitude") {
            return Ok(CoordinateSystem::Geographic);
        }

        Projection::from_grid_mapping(grid_mapping).map(CoordinateSystem::Projected)
    }

    /// Projected coordinate system from a PROJ definition string
    pub fn projected(definition: &str) -> Result<Self> {
        Self::from_grid_mapping(&GridMapping::from_proj4(definition))
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, CoordinateSystem::Geographic)
    }

    /// True for every system except `Cartesian`
    pub fn is_georeferenced(&self) -> bool {
        !matches!(self, CoordinateSystem::Cartesian)
    }

    /// PROJ definition usable as a CRS in crs-to-crs transforms
    pub fn crs_definition(&self) -> Option<String> {
        match self {
            CoordinateSystem::Geographic => Some(as_crs(WGS84_DEFINITION)),
            CoordinateSystem::Projected(p) => Some(as_crs(p.definition())),
            CoordinateSystem::Cartesian => None,
        }
    }

    /// The CF grid mapping describing this system, `None` for `Cartesian`
    pub fn to_grid_mapping(&self) -> Option<GridMapping> {
        match self {
            CoordinateSystem::Geographic => Some(GridMapping::latitude_longitude()),
            CoordinateSystem::Projected(p) => Some(p.grid_mapping().clone()),
            CoordinateSystem::Cartesian => None,
        }
    }
}

// PROJ only treats "+proj=" strings as CRS objects when tagged with +type=crs.
fn as_crs(definition: &str) -> String {
    if definition.starts_with('+') && !definition.contains("+type=crs") {
        format!("{} +type=crs", definition)
    } else {
        definition.to_string()
    }
}
