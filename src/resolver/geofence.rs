use crate::model::geo_zone::{GeoPoint, GeoZone, GeofenceResult};
use crate::resolver::distance::haversine_m;

/// Checks `point` against every zone. A point exactly on a zone's radius is
/// inside it. With no zones the result is not contained at infinite distance,
/// which callers must treat as "cannot validate".
pub fn validate(point: GeoPoint, zones: &[GeoZone]) -> GeofenceResult {
    let mut contained = false;
    let mut distance_m = f64::INFINITY;
    let mut nearest_zone = None;

    for zone in zones {
        let dist = haversine_m(point, zone.center());
        if dist <= zone.radius_m() {
            contained = true;
        }
        if dist < distance_m {
            distance_m = dist;
            nearest_zone = Some(zone.name().to_string());
        }
    }

    GeofenceResult {
        contained,
        distance_m,
        nearest_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geo_zone::ZoneKind;
    use crate::resolver::distance::EARTH_RADIUS_M;

    const DHAKA: GeoPoint = GeoPoint {
        latitude: 23.8103,
        longitude: 90.4125,
    };

    /// Point `meters` due north of `origin`.
    fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
        GeoPoint::new(
            origin.latitude + (meters / EARTH_RADIUS_M).to_degrees(),
            origin.longitude,
        )
    }

    fn branch(radius: f64) -> GeoZone {
        GeoZone::new("Head office", ZoneKind::Branch, DHAKA, radius).unwrap()
    }

    #[test]
    fn no_zones_cannot_validate() {
        let result = validate(DHAKA, &[]);
        assert!(!result.contained);
        assert!(result.distance_m.is_infinite());
        assert_eq!(result.nearest_zone, None);
    }

    #[test]
    fn hundred_meter_radius_boundary() {
        let zones = [branch(100.0)];

        let at_100 = north_of(DHAKA, 100.0);
        assert!((haversine_m(DHAKA, at_100) - 100.0).abs() < 1e-6);

        let inside = validate(north_of(DHAKA, 99.99), &zones);
        assert!(inside.contained);

        let outside = validate(north_of(DHAKA, 100.01), &zones);
        assert!(!outside.contained);
        assert!((outside.distance_m - 100.01).abs() < 1e-6);
    }

    #[test]
    fn hundred_meters_away_with_hundred_meter_radius() {
        let result = validate(north_of(DHAKA, 100.0), &[branch(100.0)]);
        assert!(result.contained);
        assert!(result.distance_m <= 100.0);
        assert_eq!(result.nearest_zone.as_deref(), Some("Head office"));
    }

    #[test]
    fn point_exactly_on_radius_is_contained() {
        let point = north_of(DHAKA, 100.0);
        let exact = haversine_m(DHAKA, point);
        let result = validate(point, &[branch(exact)]);
        assert!(result.contained);
        assert_eq!(result.distance_m, exact);
    }

    #[test]
    fn hotspot_can_contain_when_branch_does_not() {
        let far = north_of(DHAKA, 5_000.0);
        let hotspot = GeoZone::new("Warehouse", ZoneKind::Hotspot, far, 250.0).unwrap();
        let point = north_of(far, 100.0);

        let result = validate(point, &[branch(100.0), hotspot]);
        assert!(result.contained);
        assert_eq!(result.nearest_zone.as_deref(), Some("Warehouse"));
        assert!((result.distance_m - 100.0).abs() < 1e-3);
    }

    #[test]
    fn distance_is_minimum_even_when_outside() {
        let far = north_of(DHAKA, 2_000.0);
        let hotspot = GeoZone::new("Depot", ZoneKind::Hotspot, far, 50.0).unwrap();
        let point = north_of(DHAKA, 440.0);

        let result = validate(point, &[hotspot, branch(100.0)]);
        assert!(!result.contained);
        assert!((result.distance_m - 440.0).abs() < 1e-3);
        assert_eq!(result.nearest_zone.as_deref(), Some("Head office"));
    }

    #[test]
    fn contained_iff_within_some_radius() {
        let zones = [
            branch(100.0),
            GeoZone::new("Annex", ZoneKind::Hotspot, north_of(DHAKA, 300.0), 80.0).unwrap(),
        ];
        for meters in [0.0, 50.0, 150.0, 230.0, 250.0, 390.0, 500.0] {
            let point = north_of(DHAKA, meters);
            let result = validate(point, &zones);
            let expected = zones
                .iter()
                .any(|z| haversine_m(point, z.center()) <= z.radius_m());
            assert_eq!(result.contained, expected, "at {meters} m");
            assert!(result.distance_m >= 0.0);
        }
    }
}
