use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Branch,
    Hotspot,
}

#[derive(Debug, Display, PartialEq)]
pub enum ZoneError {
    #[display(fmt = "zone '{}' has non-positive radius {}", _0, _1)]
    InvalidRadius(String, f64),
    #[display(fmt = "zone '{}' has coordinates out of range", _0)]
    InvalidCenter(String),
}

impl std::error::Error for ZoneError {}

/// Circular permitted region. Radius is in meters and always positive.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoZone {
    name: String,
    kind: ZoneKind,
    center: GeoPoint,
    radius_m: f64,
}

impl GeoZone {
    pub fn new(
        name: impl Into<String>,
        kind: ZoneKind,
        center: GeoPoint,
        radius_m: f64,
    ) -> Result<Self, ZoneError> {
        let name = name.into();
        // NaN fails this comparison too
        if !(radius_m > 0.0) {
            return Err(ZoneError::InvalidRadius(name, radius_m));
        }
        if !center.is_valid() {
            return Err(ZoneError::InvalidCenter(name));
        }
        Ok(Self {
            name,
            kind,
            center,
            radius_m,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ZoneKind {
        self.kind
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }
}

/// Outcome of checking one point against a set of zones.
#[derive(Debug, Clone, PartialEq)]
pub struct GeofenceResult {
    pub contained: bool,
    /// Distance to the closest zone center; infinite when there were no zones.
    pub distance_m: f64,
    pub nearest_zone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_radius() {
        let center = GeoPoint::new(23.8103, 90.4125);
        assert!(matches!(
            GeoZone::new("HQ", ZoneKind::Branch, center, 0.0),
            Err(ZoneError::InvalidRadius(_, _))
        ));
        assert!(GeoZone::new("HQ", ZoneKind::Branch, center, f64::NAN).is_err());
        assert!(GeoZone::new("HQ", ZoneKind::Branch, center, 50.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_center() {
        let center = GeoPoint::new(123.0, 90.0);
        assert_eq!(
            GeoZone::new("Gate", ZoneKind::Hotspot, center, 10.0),
            Err(ZoneError::InvalidCenter("Gate".into()))
        );
    }
}
