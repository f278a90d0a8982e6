use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

pub struct GeoHelper;

impl GeoHelper {
    /// Great-circle distance in meters (haversine).
    pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
        let d_lat = (b.lat - a.lat).to_radians();
        let d_lon = (b.lon - a.lon).to_radians();
        let s = (d_lat / 2.0).sin().powi(2)
            + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * s.sqrt().min(1.0).asin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = GeoHelper::haversine_m(GeoPoint::new(35.0, 139.0), GeoPoint::new(36.0, 139.0));
        assert!((d - 111_195.0).abs() < 100.0, "distance {d}");
    }

    #[test]
    fn equator_offset_of_a_kilometer() {
        let d = GeoHelper::haversine_m(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 0.008993));
        assert!((d - 1000.0).abs() < 1.0, "distance {d}");
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let p = GeoPoint::new(51.66, -2.06);
        assert_eq!(GeoHelper::haversine_m(p, p), 0.0);
    }
}
