const EARTH_RADIUS_KM: f64 = 6371.0088;
const KM_PER_DEGREE_LAT: f64 = 111.32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Box that contains every point within `radius_km` of the centre. Longitude widens to the full
/// range near the poles or across the antimeridian.
pub fn bounding_box(lat: f64, lng: f64, radius_km: f64) -> BoundingBox {
    let d_lat = radius_km / KM_PER_DEGREE_LAT;
    let min_lat = (lat - d_lat).max(-90.0);
    let max_lat = (lat + d_lat).min(90.0);

    let cos_lat = lat.to_radians().cos();
    let (min_lng, max_lng) = if min_lat <= -90.0 || max_lat >= 90.0 || cos_lat < 1e-6 {
        (-180.0, 180.0)
    } else {
        let d_lng = radius_km / (KM_PER_DEGREE_LAT * cos_lat);
        if lng - d_lng < -180.0 || lng + d_lng > 180.0 {
            (-180.0, 180.0)
        } else {
            (lng - d_lng, lng + d_lng)
        }
    };

    BoundingBox {
        min_lat,
        max_lat,
        min_lng,
        max_lng,
    }
}

pub fn map_url(lat: f64, lng: f64) -> String {
    format!("https://www.google.com/maps/search/?api=1&query={lat},{lng}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_matches_known_distance() {
        // Mumbai CST to Pune station, roughly 120 km apart.
        let d = haversine_km(18.9398, 72.8355, 18.5286, 73.8743);
        assert!((d - 119.0).abs() < 3.0, "distance was {d}");
        assert!(haversine_km(12.97, 77.59, 12.97, 77.59) < 1e-9);
    }

    #[test]
    fn bounding_box_contains_radius() {
        let bbox = bounding_box(12.9716, 77.5946, 5.0);

        assert!(bbox.min_lat < 12.9716 && bbox.max_lat > 12.9716);
        assert!(bbox.min_lng < 77.5946 && bbox.max_lng > 77.5946);

        let north_edge = haversine_km(12.9716, 77.5946, bbox.max_lat, 77.5946);
        let east_edge = haversine_km(12.9716, 77.5946, 12.9716, bbox.max_lng);
        assert!(north_edge >= 4.9);
        assert!(east_edge >= 4.9);
    }

    #[test]
    fn bounding_box_widens_across_antimeridian() {
        let bbox = bounding_box(0.0, 179.99, 10.0);
        assert_eq!((bbox.min_lng, bbox.max_lng), (-180.0, 180.0));
    }

    #[test]
    fn map_url_embeds_coordinates() {
        assert_eq!(
            map_url(12.5, 77.25),
            "https://www.google.com/maps/search/?api=1&query=12.5,77.25"
        );
    }
}
