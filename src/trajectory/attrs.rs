//! CF global attributes for trajectory datasets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::trajectory::dataset::TrajectorySet;

/// Optional descriptive attributes for [`TrajectorySet::assign_cf_attrs`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfAttributes {
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub creator_email: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

fn nan_extent<'a>(values: impl Iterator<Item = &'a f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

impl TrajectorySet {
    /// Returns a new set with CF-standard attributes (Conventions,
    /// featureType, geospatial extent, time coverage) and the given
    /// descriptive attributes set
    pub fn assign_cf_attrs(&self, cf: &CfAttributes) -> Result<TrajectorySet> {
        let mut set = self.clone();
        let (lon, lat) = self.tlonlat()?;

        let mut attrs: BTreeMap<String, String> = BTreeMap::new();
        attrs.insert("Conventions".into(), "CF-1.10".into());
        attrs.insert("featureType".into(), "trajectory".into());

        if let Some((min, max)) = nan_extent(lat.iter()) {
            attrs.insert("geospatial_lat_min".into(), min.to_string());
            attrs.insert("geospatial_lat_max".into(), max.to_string());
        }
        if let Some((min, max)) = nan_extent(lon.iter()) {
            attrs.insert("geospatial_lon_min".into(), min.to_string());
            attrs.insert("geospatial_lon_max".into(), max.to_string());
        }

        let times = self.times();
        if let (Some(start), Some(end)) = (times.iter().min(), times.iter().max()) {
            attrs.insert("time_coverage_start".into(), start.to_rfc3339());
            attrs.insert("time_coverage_end".into(), end.to_rfc3339());
        }

        let descriptive = [
            ("creator_name", &cf.creator_name),
            ("creator_email", &cf.creator_email),
            ("title", &cf.title),
            ("summary", &cf.summary),
        ];
        for (key, value) in descriptive {
            if let Some(value) = value {
                attrs.insert(key.into(), value.clone());
            }
        }
        attrs.extend(cf.extra.clone());

        set.attributes.extend(attrs);
        Ok(set)
    }
}
